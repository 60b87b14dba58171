use thiserror::Error;
use tokio::sync::mpsc::error::SendError;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tungstenite::Error>),

    #[error("WebSocket send error: {0}")]
    WebSocketSend(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("Speech synthesis failed: {0}")]
    Speech(#[from] crate::speech::SpeechError),

    #[error("Chat assistant error: {0}")]
    Chat(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("FarmError: {0}")]
    Custom(String),
}

impl<T> From<SendError<T>> for FarmError {
    fn from(error: SendError<T>) -> Self {
        FarmError::WebSocketSend(error.to_string())
    }
}

impl From<std::io::Error> for FarmError {
    fn from(error: std::io::Error) -> Self {
        FarmError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for FarmError {
    fn from(error: reqwest::Error) -> Self {
        FarmError::Reqwest(Box::new(error))
    }
}

impl From<tungstenite::Error> for FarmError {
    fn from(error: tungstenite::Error) -> Self {
        FarmError::WebSocket(Box::new(error))
    }
}
