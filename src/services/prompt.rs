// src/services/prompt.rs
use serde::{Deserialize, Serialize};

/// Persona prompt used when no override is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("prompts/virtual_twin.txt");
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Sampling knobs forwarded verbatim to the completion API.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Fixed for the lifetime of the process and shared read-only between requests.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptTemplate {
    pub system_prompt: String,
    pub sampling: SamplingParams,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.trim().to_string(),
            sampling: SamplingParams {
                max_tokens: DEFAULT_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
            },
        }
    }
}

impl PromptTemplate {
    pub fn new(system_prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            sampling: SamplingParams { max_tokens, temperature },
        }
    }

    /// Build the two-turn exchange: system entry first, the user's message second.
    pub fn assemble(&self, user_message: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(user_message),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_puts_system_first() {
        let template = PromptTemplate::new("be brief", 50, 0.2);
        let messages = template.assemble("  hello  ");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system("be brief"));
        // user text goes through untouched
        assert_eq!(messages[1], ChatMessage::user("  hello  "));
    }

    #[test]
    fn default_template_uses_persona_prompt() {
        let template = PromptTemplate::default();
        assert!(template.system_prompt.starts_with("You are Moayyad's Virtual Twin"));
        assert_eq!(template.sampling.max_tokens, 200);
        assert_eq!(template.sampling.temperature, 0.8);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "hi" }));
    }
}
