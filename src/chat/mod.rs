//! Farm assistant chat: the HTTP proxy in front of a chat-completion API and
//! the client the dashboard uses to reach it.

pub mod client;
pub mod server;
pub mod types;
pub mod upstream;

pub use client::ChatClient;
pub use server::{
    create_router,
    serve,
};
pub use types::{
    ChatRequest,
    ChatResponse,
};
pub use upstream::{
    ChatBackend,
    CompletionBackend,
};
