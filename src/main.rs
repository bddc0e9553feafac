use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use chat_proxy::{
    config::Config,
    routes,
    services::{completion::OpenAiClient, rate_limiter::RateLimiter},
    state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // a missing .env file is fine, the environment may already be set
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Error: {err}");
            std::process::exit(1);
        }
    };

    let client = OpenAiClient::new(config.api_key.as_str())
        .with_base_url(config.base_url.as_str())
        .with_model(config.model.as_str());

    info!(
        model = %client.model(),
        max_tokens = config.template.sampling.max_tokens,
        temperature = config.template.sampling.temperature,
        "configuration loaded"
    );

    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit.max_requests,
        config.rate_limit.window,
    ));
    tokio::spawn(Arc::clone(&limiter).run_purge_task());

    let state = Arc::new(AppState::new(Arc::new(client), config.template, limiter));
    let app = routes::create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Server is running on port {}", config.port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
