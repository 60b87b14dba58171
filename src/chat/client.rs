use reqwest::Client;

use super::types::{
    ChatRequest,
    ChatResponse,
};
use crate::core::{
    http::http_client,
    FarmError,
    Language,
};

/// Dashboard side of the chat proxy.
pub struct ChatClient {
    client: Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl ChatClient {
    pub fn new(endpoint: &str) -> Result<Self, FarmError> {
        if endpoint.trim().is_empty() {
            return Err(FarmError::Config("chat endpoint is not configured".to_string()));
        }

        Ok(Self { client: http_client()?, endpoint: endpoint.to_string(), auth_token: None })
    }

    /// Bearer token sent with every request, e.g. the database anon key when
    /// the proxy runs as a hosted function.
    pub fn with_auth_token(mut self, token: &str) -> Self {
        if !token.is_empty() {
            self.auth_token = Some(token.to_string());
        }
        self
    }

    pub async fn ask(&self, message: &str, language: Language) -> Result<String, FarmError> {
        let mut request = self.client.post(&self.endpoint).json(&ChatRequest::new(message, language));
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error bodies carry the same envelope, so parse before checking status
        match serde_json::from_str::<ChatResponse>(&body) {
            Ok(ChatResponse { success: true, reply: Some(reply), .. }) => Ok(reply),
            Ok(ChatResponse { error: Some(error), .. }) => Err(FarmError::Chat(error)),
            Ok(_) if status.is_success() => {
                Err(FarmError::Chat("Chat response contained no reply".to_string()))
            }
            _ => Err(FarmError::Http { status: status.as_u16(), body }),
        }
    }
}
