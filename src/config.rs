// src/config.rs
use std::{path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use crate::services::{
    completion::{DEFAULT_BASE_URL, DEFAULT_MODEL},
    prompt::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, PromptTemplate},
    rate_limiter::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW},
};

pub const DEFAULT_PORT: u16 = 5000;

/// Fatal problems found while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot read system prompt from {path}: {source}")]
    PromptFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub port: u16,
    pub base_url: String,
    pub model: String,
    pub template: PromptTemplate,
    pub rate_limit: RateLimitConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("template", &self.template.sampling)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // empty strings behave like unset variables
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY").ok_or(ConfigError::MissingApiKey)?;

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let base_url = get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt = match (get("SYSTEM_PROMPT"), get("SYSTEM_PROMPT_FILE")) {
            (Some(inline), _) => Some(inline),
            (None, Some(path)) => {
                let path = PathBuf::from(path);
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::PromptFile { path, source })?;
                Some(text)
            }
            (None, None) => None,
        };

        let max_tokens: u32 = parse_or(get("CHAT_MAX_TOKENS"), "CHAT_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(invalid("CHAT_MAX_TOKENS", "0", "must be positive"));
        }

        let temperature: f32 =
            parse_or(get("CHAT_TEMPERATURE"), "CHAT_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid(
                "CHAT_TEMPERATURE",
                &temperature.to_string(),
                "must be between 0 and 2",
            ));
        }

        let mut template = PromptTemplate::default();
        if let Some(prompt) = system_prompt {
            template.system_prompt = prompt.trim().to_string();
        }
        template.sampling.max_tokens = max_tokens;
        template.sampling.temperature = temperature;

        let max_requests: u32 =
            parse_or(get("RATE_LIMIT_MAX"), "RATE_LIMIT_MAX", DEFAULT_MAX_REQUESTS)?;
        if max_requests == 0 {
            return Err(invalid("RATE_LIMIT_MAX", "0", "must be positive"));
        }
        let window_secs: u64 = parse_or(
            get("RATE_LIMIT_WINDOW_SECS"),
            "RATE_LIMIT_WINDOW_SECS",
            DEFAULT_WINDOW.as_secs(),
        )?;
        if window_secs == 0 {
            return Err(invalid("RATE_LIMIT_WINDOW_SECS", "0", "must be positive"));
        }

        Ok(Self {
            api_key,
            port,
            base_url,
            model,
            template,
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(key, &value, &e.to_string())),
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
