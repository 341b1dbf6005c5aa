//! Gemini `generateContent` client

use serde::{Deserialize, Serialize};

use super::{CompletionRequest, GatewayConfig, GatewayError, ModelGateway};

/// Substring the backend puts in its message for a bad key.
/// Only consulted when the structured reason is missing; brittle.
const INVALID_KEY_MARKER: &str = "API key not valid";

/// `google.rpc.ErrorInfo` reason for a bad key
const INVALID_KEY_REASON: &str = "API_KEY_INVALID";

pub struct GeminiGateway {
    config: GatewayConfig,
    http_client: reqwest::Client,
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated
    fn into_text(self) -> Result<String, GatewayError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(GatewayError::Upstream(format!("prompt blocked: {}", reason)));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Upstream("response contained no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
            return Err(GatewayError::Upstream(format!("empty reply (finish reason: {})", reason)));
        }
        Ok(text)
    }
}

impl GeminiGateway {
    /// Create new gateway
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("fraud-lens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, http_client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[axum::async_trait]
impl ModelGateway for GeminiGateway {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GatewayError::Configuration)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &request.prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: request.json_output.then_some("application/json"),
                temperature: request.temperature,
            },
        };

        tracing::debug!("Calling model {} ({} prompt bytes)", self.config.model, request.prompt.len());

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Upstream(e.to_string()))?;

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), &text);
            tracing::error!("Model call failed ({}): {}", status, err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::Upstream(format!("unexpected response body: {}", e)))?;

        parsed.into_text()
    }
}

/// Map a non-2xx reply to a gateway error
fn classify_failure(status: u16, body: &str) -> GatewayError {
    let api_error = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);

    let key_rejected = api_error
        .as_ref()
        .map(|e| {
            e.details
                .iter()
                .any(|d| d.reason.as_deref() == Some(INVALID_KEY_REASON))
        })
        .unwrap_or(false);

    if key_rejected || status == 401 {
        return GatewayError::Auth;
    }

    let message = match api_error {
        Some(e) if !e.message.is_empty() => e.message,
        _ => format!("HTTP {}: {}", status, body.trim()),
    };

    if message.contains(INVALID_KEY_MARKER) {
        return GatewayError::Auth;
    }

    GatewayError::Upstream(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    #[derive(Debug, Clone)]
    struct SeenRequest {
        call: String,
        api_key: Option<String>,
        body: Value,
    }

    #[derive(Clone)]
    struct FakeBackend {
        status: StatusCode,
        reply: Value,
        seen: Arc<Mutex<Vec<SeenRequest>>>,
    }

    async fn generate(
        State(backend): State<FakeBackend>,
        Path(call): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        backend.seen.lock().push(SeenRequest {
            call,
            api_key: headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
        (backend.status, Json(backend.reply.clone()))
    }

    async fn spawn_backend(status: StatusCode, reply: Value) -> (String, FakeBackend) {
        let backend = FakeBackend {
            status,
            reply,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/v1beta/models/:call", post(generate))
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), backend)
    }

    fn gateway(base_url: &str, api_key: Option<&str>) -> GeminiGateway {
        GeminiGateway::new(GatewayConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-test".to_string(),
            base_url: base_url.to_string(),
        })
        .unwrap()
    }

    fn json_request() -> CompletionRequest {
        CompletionRequest {
            prompt: "Assess this".to_string(),
            json_output: true,
            temperature: Some(0.3),
        }
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        // Nothing listens on port 1; a network attempt would surface as Upstream
        let gw = gateway("http://127.0.0.1:1", None);
        assert!(!gw.is_configured());
        assert_eq!(gw.complete(&json_request()).await, Err(GatewayError::Configuration));
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let reply = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"isFraudulent\":"}, {"text": "false}"}]},
                "finishReason": "STOP"
            }]
        });
        let (url, backend) = spawn_backend(StatusCode::OK, reply).await;

        let text = gateway(&url, Some("secret")).complete(&json_request()).await.unwrap();
        assert_eq!(text, "{\"isFraudulent\":false}");

        let seen = backend.seen.lock().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].call, "gemini-test:generateContent");
        assert_eq!(seen[0].api_key.as_deref(), Some("secret"));
        assert_eq!(seen[0].body["contents"][0]["parts"][0]["text"], "Assess this");
        assert_eq!(seen[0].body["generationConfig"]["responseMimeType"], "application/json");
        assert!((seen[0].body["generationConfig"]["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_text_request_omits_json_settings() {
        let reply = json!({"candidates": [{"content": {"parts": [{"text": "Assessment: Legitimate"}]}}]});
        let (url, backend) = spawn_backend(StatusCode::OK, reply).await;

        let request = CompletionRequest {
            prompt: "Assess this".to_string(),
            json_output: false,
            temperature: None,
        };
        let text = gateway(&url, Some("secret")).complete(&request).await.unwrap();
        assert_eq!(text, "Assessment: Legitimate");

        let seen = backend.seen.lock().clone();
        assert_eq!(seen[0].body["generationConfig"], json!({}));
    }

    #[tokio::test]
    async fn test_invalid_key_structured() {
        let reply = json!({
            "error": {
                "code": 400,
                "message": "Bad key.",
                "status": "INVALID_ARGUMENT",
                "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID"}]
            }
        });
        let (url, _) = spawn_backend(StatusCode::BAD_REQUEST, reply).await;
        assert_eq!(
            gateway(&url, Some("wrong")).complete(&json_request()).await,
            Err(GatewayError::Auth)
        );
    }

    #[tokio::test]
    async fn test_other_backend_failure_is_upstream() {
        let reply = json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}});
        let (url, _) = spawn_backend(StatusCode::TOO_MANY_REQUESTS, reply).await;
        assert_eq!(
            gateway(&url, Some("key")).complete(&json_request()).await,
            Err(GatewayError::Upstream("Resource has been exhausted".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_upstream() {
        let result = gateway("http://127.0.0.1:1", Some("key")).complete(&json_request()).await;
        assert!(matches!(result, Err(GatewayError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_upstream() {
        let reply = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let (url, _) = spawn_backend(StatusCode::OK, reply).await;
        assert_eq!(
            gateway(&url, Some("key")).complete(&json_request()).await,
            Err(GatewayError::Upstream("prompt blocked: SAFETY".to_string()))
        );
    }

    #[test]
    fn test_classify_failure_message_shim() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key."}}"#;
        assert_eq!(classify_failure(400, body), GatewayError::Auth);
        assert_eq!(classify_failure(401, "nope"), GatewayError::Auth);
        assert_eq!(
            classify_failure(500, "boom"),
            GatewayError::Upstream("HTTP 500: boom".to_string())
        );
    }

    #[test]
    fn test_permission_denied_is_upstream() {
        let body = r#"{"error":{"code":403,"message":"Generative Language API has not been used in project 123 before or it is disabled.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(
            classify_failure(403, body),
            GatewayError::Upstream(
                "Generative Language API has not been used in project 123 before or it is disabled.".to_string()
            )
        );

        let body = r#"{"error":{"code":403,"message":"API key not valid. Please pass a valid API key.","status":"PERMISSION_DENIED"}}"#;
        assert_eq!(classify_failure(403, body), GatewayError::Auth);
    }
}
