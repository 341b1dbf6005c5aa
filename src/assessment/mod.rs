//! Fraud assessment pipeline
//!
//! ```text
//! TransactionInput ─▶ prompt ─▶ gateway ─▶ parser ─▶ FraudVerdict ─▶ render
//!                                  │
//!                          Gemini generateContent
//! ```
//!
//! The reply convention decides both the prompt wording and the parser.
//! JSON replies are validated strictly; labeled-line replies are parsed
//! best-effort and never fail.

pub mod prompt;
pub mod parser;
pub mod gateway;
pub mod service;
pub mod desk;
pub mod render;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub use gateway::{CompletionRequest, GatewayError, ModelGateway};
pub use parser::ResponseParser;
pub use service::Assessor;

/// Sampling temperature requested for JSON replies
pub const JSON_TEMPERATURE: f32 = 0.3;

/// Reply shape agreed with the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    /// A bare JSON object, validated strictly
    #[default]
    Json,
    /// `Assessment:` / `Reason:` / `Confidence:` lines, parsed best-effort
    Labeled,
}

impl Convention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Convention::Json => "json",
            Convention::Labeled => "labeled",
        }
    }

    /// Parser strategy for this convention
    pub fn parser(&self) -> &'static dyn ResponseParser {
        match self {
            Convention::Json => &parser::JsonParser,
            Convention::Labeled => &parser::LabeledLineParser,
        }
    }

    /// Backend request for an already rendered prompt
    pub fn request(&self, prompt: String) -> CompletionRequest {
        match self {
            Convention::Json => CompletionRequest {
                prompt,
                json_output: true,
                temperature: Some(JSON_TEMPERATURE),
            },
            Convention::Labeled => CompletionRequest {
                prompt,
                json_output: false,
                temperature: None,
            },
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Convention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Convention::Json),
            "labeled" | "labelled" | "text" => Ok(Convention::Labeled),
            other => Err(format!("unknown response convention: {}", other)),
        }
    }
}

/// Reasons a submission produced no verdict
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessError {
    #[error("API key is not configured. Please set the API_KEY environment variable.")]
    Configuration,

    #[error("Invalid Gemini API key. Please check your configuration.")]
    Auth,

    #[error("AI API error: {0}")]
    Upstream(String),

    #[error("Received malformed JSON response from AI model: {0}")]
    MalformedResponse(String),
}

impl AssessError {
    /// Message shown in the error panel
    pub fn user_message(&self) -> String {
        match self {
            AssessError::Configuration => self.to_string(),
            other => format!("Failed to get fraud assessment: {}", other),
        }
    }
}

impl From<GatewayError> for AssessError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Configuration => AssessError::Configuration,
            GatewayError::Auth => AssessError::Auth,
            GatewayError::Upstream(message) => AssessError::Upstream(message),
        }
    }
}
