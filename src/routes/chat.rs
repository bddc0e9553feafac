use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::debug;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    // unparseable bodies are treated the same as a missing message
    let Json(payload) = payload.map_err(|rejection| {
        debug!(%rejection, "rejecting chat request body");
        AppError::InvalidRequest
    })?;

    let message = payload.validated_message().ok_or(AppError::InvalidRequest)?;

    let messages = state.template.assemble(message);
    let reply = state
        .client
        .complete(&messages, &state.template.sampling)
        .await?;

    Ok(Json(ChatResponse { reply }))
}
