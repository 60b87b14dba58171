use serde::{
    Deserialize,
    Serialize,
};

use crate::core::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub language: Option<String>,
}

impl ChatRequest {
    pub fn new(message: &str, language: Language) -> Self {
        Self { message: message.to_string(), language: Some(language.name().to_string()) }
    }

    /// Unknown or missing languages fall back to English.
    pub fn language(&self) -> Language {
        match self.language.as_deref().map(str::parse::<Language>) {
            Some(Ok(language)) => language,
            Some(Err(e)) => {
                tracing::warn!("{}, answering in English", e);
                Language::English
            }
            None => Language::English,
        }
    }
}

/// Wire body of the chat endpoint: `{reply, success}` or `{error, success: false}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

impl ChatResponse {
    pub fn reply(reply: String) -> Self {
        Self { reply: Some(reply), error: None, success: true }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self { reply: None, error: Some(error.into()), success: false }
    }
}

// Upstream chat-completion wire types

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<CompletionMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CompletionMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: CompletionMessage,
}
