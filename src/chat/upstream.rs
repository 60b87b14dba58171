use async_trait::async_trait;
use reqwest::Client;

use super::types::{
    CompletionMessage,
    CompletionRequest,
    CompletionResponse,
};
use crate::core::{
    http::{
        ensure_success,
        http_client,
    },
    AppConfig,
    FarmError,
    Language,
};

/// Something that can answer a farmer's question.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, message: &str, language: Language) -> Result<String, FarmError>;
}

pub fn system_prompt(language: Language) -> String {
    let answer_in = match language {
        Language::English => "English",
        Language::Hindi => "Hindi, written in Devanagari script",
        Language::Bengali => "Bengali, written in Bengali script",
    };

    format!(
        "You are a helpful veterinary and farm-management assistant for livestock farmers in India. \
         You help with animal health, antimicrobial usage (AMU) records, drug withdrawal periods, \
         maximum residue limits (MRL), food safety and regulatory compliance. \
         Give practical, concise answers and recommend consulting a veterinarian for diagnosis or \
         prescriptions. Always respond in {answer_in}."
    )
}

/// OpenAI-compatible chat-completion endpoint.
pub struct CompletionBackend {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl CompletionBackend {
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Result<Self, FarmError> {
        if api_key.trim().is_empty() {
            return Err(FarmError::Config(
                "chat API key is missing (FARMGUARD_CHAT_API_KEY or OPENAI_API_KEY)".to_string(),
            ));
        }

        Ok(Self {
            client: http_client()?,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FarmError> {
        Self::new(&config.chat_api_url, &config.chat_api_key, &config.chat_model)
    }
}

#[async_trait]
impl ChatBackend for CompletionBackend {
    async fn complete(&self, message: &str, language: Language) -> Result<String, FarmError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: vec![
                CompletionMessage { role: "system".to_string(), content: system_prompt(language) },
                CompletionMessage { role: "user".to_string(), content: message.to_string() },
            ],
            temperature: 0.7,
            max_tokens: 500,
        };

        tracing::debug!("Sending chat completion ({}, {} chars)", language, message.len());

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let completion: CompletionResponse = ensure_success(response).await?.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|reply| !reply.is_empty())
            .ok_or_else(|| FarmError::Chat("Empty response from chat completion API".to_string()))
    }
}
