//! Model gateway
//!
//! The single request/response exchange with the hosted language model.
//! No retries, no timeout, no streaming.

mod gemini;

pub use gemini::GeminiGateway;

/// Connection settings for the model backend
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

/// One completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Ask the backend for `application/json` output
    pub json_output: bool,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// No credential; nothing was sent
    #[error("model API credential is not configured")]
    Configuration,

    /// The backend rejected the credential
    #[error("model API rejected the credential")]
    Auth,

    /// Any other backend or network failure
    #[error("{0}")]
    Upstream(String),
}

#[axum::async_trait]
pub trait ModelGateway: Send + Sync {
    /// Whether a credential is present. Not validated until first use.
    fn is_configured(&self) -> bool;

    /// Send the prompt and return the raw reply text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}
