//! OpenRouter chat-completions client.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use studybuddy_shared::{AppConfig, OpenRouterConfig, Result, StudyBuddyError, api_key};

use crate::TextGenerator;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("StudyBuddy/", env!("CARGO_PKG_VERSION"));

const COMPLETIONS_PATH: &str = "chat/completions";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    /// OpenRouter reports some upstream failures with HTTP 200 and this body.
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u16>,
    message: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Chat-completions client bound to one model and one API key.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    /// Build a client from the `[openrouter]` config section and an API key.
    pub fn new(config: &OpenRouterConfig, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = completions_url(&config.base_url()?)?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| StudyBuddyError::Network(format!("failed to build HTTP client: {e}")))?;

        debug!(%endpoint, model = %config.default_model, "model client ready");

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
            model: config.default_model.clone(),
        })
    }

    /// Build a client from the full app config, reading the key from the
    /// environment variable it names.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let key = api_key(config)?;
        Self::new(&config.openrouter, key)
    }

    /// Use a different model than the configured default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[instrument(skip_all, fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let started = Instant::now();
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| StudyBuddyError::Network(format!("{}: {e}", self.endpoint)))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            StudyBuddyError::Network(format!("{}: failed to read body: {e}", self.endpoint))
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "model API request failed");
            return Err(StudyBuddyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| StudyBuddyError::malformed(e, body.as_str()))?;

        if let Some(err) = parsed.error {
            warn!(code = ?err.code, "model API reported an error");
            return Err(StudyBuddyError::Api {
                status: err.code.unwrap_or(status.as_u16()),
                body: err.message,
            });
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| StudyBuddyError::EmptyResponse {
                model: self.model.clone(),
            })?;

        info!(
            latency_ms = started.elapsed().as_millis() as u64,
            reply_chars = content.len(),
            "completion received"
        );
        Ok(content)
    }
}

impl TextGenerator for OpenRouterClient {
    fn model(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        self.complete(prompt)
    }
}

/// `{base}/chat/completions`, keeping any path prefix on the base URL.
fn completions_url(base: &Url) -> Result<Url> {
    let joined = format!("{}/{COMPLETIONS_PATH}", base.as_str().trim_end_matches('/'));
    Url::parse(&joined)
        .map_err(|e| StudyBuddyError::config(format!("invalid completions URL '{joined}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> OpenRouterConfig {
        OpenRouterConfig {
            base_url: server.uri(),
            ..OpenRouterConfig::default()
        }
    }

    fn reply(content: &str) -> serde_json::Value {
        json!({
            "id": "gen-1",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
    }

    #[test]
    fn completions_url_keeps_base_path() {
        let base = Url::parse("https://openrouter.ai/api/v1").unwrap();
        assert_eq!(
            completions_url(&base).unwrap().as_str(),
            "https://openrouter.ai/api/v1/chat/completions"
        );

        let base = Url::parse("http://localhost:8080/v1/").unwrap();
        assert_eq!(
            completions_url(&base).unwrap().as_str(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = OpenRouterConfig {
            base_url: "ftp://example.com".into(),
            ..OpenRouterConfig::default()
        };
        let err = OpenRouterClient::new(&config, "key").unwrap_err();
        assert!(matches!(err, StudyBuddyError::Config { .. }));
    }

    #[test]
    fn with_model_overrides_default() {
        let client = OpenRouterClient::new(&OpenRouterConfig::default(), "key")
            .unwrap()
            .with_model("openai/gpt-4o-mini");
        assert_eq!(client.model(), "openai/gpt-4o-mini");
    }

    #[tokio::test]
    async fn sends_single_user_message_with_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(header("user-agent", USER_AGENT))
            .and(body_partial_json(json!({
                "model": "google/gemini-2.0-flash-001",
                "messages": [{ "role": "user", "content": "Hello?" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("Hi there.\n")))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&config_for(&server), "test-key").unwrap();
        let text = client.generate("Hello?").await.unwrap();

        // Returned verbatim, trailing newline included.
        assert_eq!(text, "Hi there.\n");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("No auth credentials found"))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&config_for(&server), "bad").unwrap();
        let err = client.generate("Hello?").await.unwrap_err();

        match err {
            StudyBuddyError::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "No auth credentials found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_envelope_with_ok_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": { "code": 502, "message": "upstream provider unavailable" }
            })))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&config_for(&server), "key").unwrap();
        let err = client.generate("Hello?").await.unwrap_err();

        assert!(matches!(err, StudyBuddyError::Api { status: 502, .. }));
        assert!(err.to_string().contains("upstream provider unavailable"));
    }

    #[tokio::test]
    async fn missing_content_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": null } }]
            })))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&config_for(&server), "key").unwrap();
        let err = client.generate("Hello?").await.unwrap_err();
        assert!(matches!(err, StudyBuddyError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&config_for(&server), "key").unwrap();
        let err = client.generate("Hello?").await.unwrap_err();
        assert!(matches!(err, StudyBuddyError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn undecodable_body_keeps_raw_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = OpenRouterClient::new(&config_for(&server), "key").unwrap();
        let err = client.generate("Hello?").await.unwrap_err();

        match err {
            StudyBuddyError::MalformedResponse { raw, .. } => {
                assert_eq!(raw, "<html>gateway</html>");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn configured_timeout_is_enforced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(reply("late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = OpenRouterConfig {
            timeout_secs: Some(1),
            ..config_for(&server)
        };
        let client = OpenRouterClient::new(&config, "key").unwrap();
        let err = client.generate("Hello?").await.unwrap_err();
        assert!(matches!(err, StudyBuddyError::Network(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let config = OpenRouterConfig {
            base_url: "http://127.0.0.1:1".into(),
            ..OpenRouterConfig::default()
        };
        let client = OpenRouterClient::new(&config, "key").unwrap();
        let err = client.generate("Hello?").await.unwrap_err();
        assert!(matches!(err, StudyBuddyError::Network(_)));
    }
}
