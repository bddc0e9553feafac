// src/state.rs
use std::sync::Arc;

use crate::services::{
    completion::CompletionClient, prompt::PromptTemplate, rate_limiter::RateLimiter,
};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub client: Arc<dyn CompletionClient>,
    pub template: PromptTemplate,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        template: PromptTemplate,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self { client, template, limiter }
    }
}
