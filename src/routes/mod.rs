// src/routes/mod.rs
pub mod chat;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::{services::rate_limiter::Decision, state::SharedState};
use axum::{
    Router,
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chat::chat_handler;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub const LIVENESS_MESSAGE: &str = "Backend is live!";
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again after a minute.";

static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

pub fn create_router(state: SharedState) -> Router {
    let api_routes = Router::new()
        .route("/api/chat", post(chat_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware));

    Router::new()
        .route("/", get(|| async { LIVENESS_MESSAGE }))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn rate_limit_middleware(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Response {
    // no peer address (e.g. in-process callers) means one shared bucket
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let limit = HeaderValue::from(state.limiter.max_requests());

    match state.limiter.check(client) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(req).await;
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_LIMIT.clone(), limit);
            headers.insert(X_RATELIMIT_REMAINING.clone(), HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after } => {
            warn!(%client, "rate limit exceeded");
            let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    (header::RETRY_AFTER, HeaderValue::from(retry_secs)),
                    (X_RATELIMIT_LIMIT.clone(), limit),
                    (X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32)),
                ],
                RATE_LIMIT_MESSAGE,
            )
                .into_response()
        }
    }
}
