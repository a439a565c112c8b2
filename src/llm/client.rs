use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::ChatSender;
use super::error::ApiError;
use super::types::{ChatRequest, ChatResponse};
use crate::config::HanhuaConfig;

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// Owns the connection pool for the whole run; the pool is released when the
/// client is dropped.
pub struct ChatClient {
    api_key: String,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ChatClient {
    /// Build a client from the run configuration. The idle pool per host is
    /// sized to the concurrency limit.
    pub fn from_config(config: &HanhuaConfig) -> Result<Self, ApiError> {
        Self::with_base_url(
            config.api_key.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_seconds),
            config.max_concurrent,
        )
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(
        api_key: String,
        base_url: String,
        timeout: Duration,
        pool_size: usize,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .pool_max_idle_per_host(pool_size)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl ChatSender for ChatClient {
    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, ApiError> {
        let seconds = self.timeout.as_secs();
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, seconds))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Request {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(e, seconds))?;
        serde_json::from_str::<ChatResponse>(&body).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}
