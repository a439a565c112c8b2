pub mod client;
pub mod error;
pub mod types;

pub use client::ChatClient;
pub use error::ApiError;
pub use types::{ChatMessage, ChatRequest, ChatResponse};

/// Anything that can answer a chat completion request.
///
/// Implemented by [`ChatClient`] for real calls and by mocks in tests.
pub trait ChatSender {
    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, ApiError>;
}
