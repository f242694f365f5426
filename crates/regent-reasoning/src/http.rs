//! # HTTP Reasoning Client
//!
//! reqwest-backed [`ReasoningService`] for a messages-style generative
//! API: `POST /v1/messages` with a system prompt, a single user turn
//! carrying the serialized context, and a model/max-tokens envelope.
//! The response carries content blocks and token usage.
//!
//! No retry or deadline logic lives here — the orchestrator owns both,
//! so every service implementation shares the same semantics.

use std::time::Duration;

use serde::Deserialize;

use crate::service::{
    ReasoningRequest, ReasoningResponse, ReasoningService, ReasoningUsage, TransportError,
};

/// Configuration for the HTTP reasoning client.
#[derive(Debug, Clone)]
pub struct ReasoningServiceConfig {
    /// Base URL of the reasoning API.
    pub base_url: String,
    /// API key, sent as the `x-api-key` header.
    pub api_key: String,
    /// Model identifier to request.
    pub model: String,
    /// Response token ceiling (default: 4096).
    pub max_tokens: u32,
    /// Socket-level timeout in seconds; the orchestrator's deadline is
    /// expected to be tighter (default: 60).
    pub timeout_secs: u64,
}

impl ReasoningServiceConfig {
    /// Create a configuration with default token ceiling and timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 4096,
            timeout_secs: 60,
        }
    }
}

/// HTTP client for the generative reasoning service.
#[derive(Debug)]
pub struct HttpReasoningService {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Debug, Deserialize)]
struct UsageWire {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<UsageWire>,
}

impl HttpReasoningService {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// `TransportError::Unavailable` if the HTTP client cannot be built.
    pub fn new(config: ReasoningServiceConfig) -> Result<Self, TransportError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-api-key",
            reqwest::header::HeaderValue::from_str(&config.api_key).map_err(|_| {
                TransportError::Unavailable {
                    reason: "invalid API key characters".into(),
                }
            })?,
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::Unavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            max_tokens: config.max_tokens,
        })
    }

    async fn send(&self, request: &ReasoningRequest) -> Result<ReasoningResponse, TransportError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": request.instructions,
            "messages": [{"role": "user", "content": request.context}],
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout { elapsed_ms: 0 }
                } else {
                    TransportError::Unavailable {
                        reason: format!("generate: {e}"),
                    }
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let excerpt = resp.text().await.unwrap_or_default();
            return Err(TransportError::Unavailable {
                reason: format!("generate: HTTP {status} — {excerpt}"),
            });
        }

        let parsed: MessagesResponse =
            resp.json().await.map_err(|e| TransportError::Unavailable {
                reason: format!("response deserialization failed: {e}"),
            })?;

        let content = parsed
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(ReasoningResponse {
            content,
            usage: parsed.usage.map(|u| ReasoningUsage {
                input_tokens: u.input_tokens,
                output_tokens: u.output_tokens,
            }),
        })
    }
}

impl ReasoningService for HttpReasoningService {
    fn generate(
        &self,
        request: &ReasoningRequest,
    ) -> impl std::future::Future<Output = Result<ReasoningResponse, TransportError>> + Send {
        self.send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ReasoningRequest {
        ReasoningRequest {
            instructions: "analyze".into(),
            context: "EVIDENCE CONTEXT".into(),
        }
    }

    #[tokio::test]
    async fn sends_messages_envelope_and_joins_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "key"))
            .and(body_partial_json(serde_json::json!({"model": "advisor-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"text": "{\"gaps\""}, {"text": ": []}"}],
                "usage": {"input_tokens": 120, "output_tokens": 8}
            })))
            .mount(&server)
            .await;

        let service = HttpReasoningService::new(ReasoningServiceConfig::new(
            server.uri(),
            "key",
            "advisor-1",
        ))
        .unwrap();

        let response = service.generate(&request()).await.unwrap();
        assert_eq!(response.content, r#"{"gaps": []}"#);
        assert_eq!(response.usage.unwrap().input_tokens, 120);
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let service = HttpReasoningService::new(ReasoningServiceConfig::new(
            server.uri(),
            "key",
            "advisor-1",
        ))
        .unwrap();

        let err = service.generate(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_unavailable() {
        let service = HttpReasoningService::new(ReasoningServiceConfig::new(
            "http://127.0.0.1:1",
            "key",
            "advisor-1",
        ))
        .unwrap();
        let err = service.generate(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Unavailable { .. }));
    }
}
