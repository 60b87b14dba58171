use std::time::Duration;

use reqwest::{
    header::{
        HeaderMap,
        HeaderValue,
        USER_AGENT,
    },
    Client,
    Response,
};

use crate::core::FarmError;

const USER_AGENT_VALUE: &str = concat!("farmguard/", env!("CARGO_PKG_VERSION"), " (+reqwest)");

pub fn http_client() -> Result<Client, FarmError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    Client::builder()
        .timeout(Duration::from_secs(60))
        .default_headers(headers)
        .build()
        .map_err(|e| FarmError::Custom(format!("HTTP client build failed: {e}")))
}

/// Turns a non-2xx response into `FarmError::Http`, keeping the body for the message.
pub async fn ensure_success(resp: Response) -> Result<Response, FarmError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    tracing::warn!("HTTP error {} : {}", status, body);
    Err(FarmError::Http { status: status.as_u16(), body })
}
