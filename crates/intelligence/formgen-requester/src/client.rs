//! Completion service seam and the OpenAI-compatible HTTP client

use async_trait::async_trait;
use formgen_config::{CompletionConfig, ConfigError};
use formgen_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anything that turns one instruction into one completion text
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Model identifier requests are sent with
    fn model(&self) -> &str;

    /// Submit `prompt` as a single user message and return the first
    /// choice's text, untrimmed
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Chat completion body. Sampling parameters are left to the service
/// defaults.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for `POST {api_base}/chat/completions`
pub struct OpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// Build from config, reading the API key from the environment.
    /// Fails fast when the key is missing.
    pub fn from_config(config: &CompletionConfig) -> std::result::Result<Self, ConfigError> {
        let api_key = config.api_key()?;
        Self::with_key(config, &api_key)
    }

    /// Build with an explicit key
    pub fn with_key(
        config: &CompletionConfig,
        api_key: &str,
    ) -> std::result::Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "completion.timeout_secs",
                value: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message::user(prompt)],
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending completion request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(Error::Transport(format!("API error {}: {}", status, detail)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("Parse error: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Transport("No choices in completion response".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| Error::MalformedOutput("completion had no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// Serve `reply` from a local stub and record what the client sent
    async fn stub(status: StatusCode, reply: Value) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let recorder = recorder.clone();
                let reply = reply.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    recorder.lock().unwrap().push((auth, body));
                    (status, Json(reply))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/v1", addr), seen)
    }

    fn client_for(base: &str) -> OpenAiClient {
        let config = CompletionConfig {
            api_base: base.to_string(),
            ..CompletionConfig::default()
        };
        OpenAiClient::with_key(&config, "sk-test").unwrap()
    }

    #[test]
    fn endpoint_joins_base() {
        let config = CompletionConfig {
            api_base: "http://localhost:1234/v1/".into(),
            ..CompletionConfig::default()
        };
        let client = OpenAiClient::with_key(&config, "k").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(client.model(), "gpt-4");
    }

    #[tokio::test]
    async fn sends_single_user_message() {
        let (base, seen) = stub(
            StatusCode::OK,
            json!({"choices": [{"message": {"role": "assistant", "content": "  [] \n"}}]}),
        )
        .await;

        let text = client_for(&base).complete("build me a form").await.unwrap();
        assert_eq!(text, "  [] \n");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(
            body,
            &json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "build me a form"}]
            })
        );
    }

    #[tokio::test]
    async fn unauthorized_is_transport_error() {
        let (base, _) = stub(
            StatusCode::UNAUTHORIZED,
            json!({"error": {"message": "Incorrect API key provided"}}),
        )
        .await;

        let err = client_for(&base).complete("x").await.unwrap_err();
        match err {
            Error::Transport(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Incorrect API key provided"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_choices_is_transport_error() {
        let (base, _) = stub(StatusCode::OK, json!({"choices": []})).await;
        let err = client_for(&base).complete("x").await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn null_content_is_malformed() {
        let (base, _) = stub(
            StatusCode::OK,
            json!({"choices": [{"message": {"role": "assistant", "content": null}}]}),
        )
        .await;
        let err = client_for(&base).complete("x").await.unwrap_err();
        assert!(matches!(err, Error::MalformedOutput(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client_for(&format!("http://{}/v1", addr))
            .complete("x")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }
}
