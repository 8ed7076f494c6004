//! HTTP transport for the completion endpoint.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use tracing::{debug, error, info, warn};

use friendbot_core::{CompletionOutcome, Credential, Message};

use crate::client::CompletionClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Completion client speaking the OpenAI-compatible chat completions API.
pub struct HttpCompletionClient {
    inner: reqwest::Client,
    config: ClientConfig,
}

impl HttpCompletionClient {
    /// Create a new client.
    ///
    /// Attribution headers are validated here so a bad value fails at
    /// startup instead of on every call.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(referer) = &config.referer {
            headers.insert(
                HeaderName::from_static("http-referer"),
                header_value("referer", referer)?,
            );
        }
        if let Some(title) = &config.title {
            headers.insert(
                HeaderName::from_static("x-title"),
                header_value("title", title)?,
            );
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: builder.build()?,
            config,
        })
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value)
        .map_err(|e| ClientError::InvalidConfig(format!("{}: {}", field, e)))
}

/// `Authorization: Bearer <credential>`, or `None` if the credential holds
/// bytes a header cannot carry.
fn bearer_header(credential: &Credential) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", credential.expose())).ok()?;
    value.set_sensitive(true);
    Some(value)
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        user_text: &str,
        history: &[Message],
        credential: &Credential,
    ) -> CompletionOutcome {
        if let Some(prefix) = &self.config.credential_prefix {
            if !credential.has_prefix(prefix) {
                warn!(
                    credential = %credential.masked(),
                    expected_prefix = %prefix,
                    "Credential has unexpected shape, not sending request"
                );
                return CompletionOutcome::MalformedCredential {
                    expected_prefix: prefix.clone(),
                };
            }
        }

        let Some(authorization) = bearer_header(credential) else {
            warn!(
                credential = %credential.masked(),
                "Credential contains characters not allowed in a header, not sending request"
            );
            return CompletionOutcome::MalformedCredential {
                expected_prefix: self.config.credential_prefix.clone().unwrap_or_default(),
            };
        };

        let request = self.config.request_for(user_text, history);
        let body = ChatCompletionRequest::from(&request);

        info!(
            endpoint = %self.config.endpoint,
            model = %request.model_id,
            prior_turns = request.prior_turns.len(),
            "Requesting completion"
        );

        let response = match self
            .inner
            .post(&self.config.endpoint)
            .header(AUTHORIZATION, authorization)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Completion request failed");
                return CompletionOutcome::NetworkError(e.to_string());
            }
        };

        let status = response.status();
        debug!(status = status.as_u16(), "Completion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Completion endpoint returned an error");
            return CompletionOutcome::HttpError {
                status: status.as_u16(),
                body,
            };
        }

        match response.json::<ChatCompletionResponse>().await {
            Ok(parsed) => {
                let content = parsed.into_content();
                if content.is_empty() {
                    warn!("Completion response had no content");
                }
                CompletionOutcome::Success(content)
            }
            Err(e) => {
                error!(error = %e, "Failed to read completion response");
                CompletionOutcome::NetworkError(format!("invalid response body: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{http::HeaderMap as AxumHeaders, http::StatusCode, routing::post, Json, Router};
    use friendbot_core::Conversation;
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use crate::config::DEFAULT_SYSTEM_PROMPT;

    const KEY: &str = "sk-or-v1-test-key";

    /// What the fake endpoint saw.
    #[derive(Clone, Default)]
    struct Recorded {
        hits: Arc<AtomicUsize>,
        body: Arc<Mutex<Option<Value>>>,
        headers: Arc<Mutex<Option<AxumHeaders>>>,
    }

    impl Recorded {
        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }

        fn body(&self) -> Value {
            self.body.lock().unwrap().clone().expect("no request recorded")
        }

        fn header(&self, name: &str) -> Option<String> {
            self.headers
                .lock()
                .unwrap()
                .as_ref()
                .and_then(|h| h.get(name))
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        }
    }

    /// Start a fake completion endpoint answering with `status` and `reply`.
    async fn serve(status: StatusCode, reply: String, delay: Duration) -> (String, Recorded) {
        let recorded = Recorded::default();
        let state = recorded.clone();

        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: AxumHeaders, Json(body): Json<Value>| {
                let state = state.clone();
                let reply = reply.clone();
                async move {
                    state.hits.fetch_add(1, Ordering::SeqCst);
                    *state.body.lock().unwrap() = Some(body);
                    *state.headers.lock().unwrap() = Some(headers);
                    tokio::time::sleep(delay).await;
                    (status, reply)
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v1/chat/completions", addr), recorded)
    }

    async fn serve_json(status: StatusCode, reply: Value) -> (String, Recorded) {
        serve(status, reply.to_string(), Duration::ZERO).await
    }

    fn client(endpoint: &str) -> HttpCompletionClient {
        HttpCompletionClient::new(ClientConfig::default().with_endpoint(endpoint)).unwrap()
    }

    fn key() -> Credential {
        Credential::parse(KEY).unwrap()
    }

    fn success_body(content: &str) -> Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[tokio::test]
    async fn test_success_returns_content() {
        let (url, recorded) = serve_json(StatusCode::OK, success_body("Kya baat hai! 😄")).await;

        let outcome = client(&url).complete("hello", &[], &key()).await;

        assert_eq!(outcome, CompletionOutcome::Success("Kya baat hai! 😄".to_string()));
        assert_eq!(recorded.hits(), 1);
    }

    #[tokio::test]
    async fn test_request_payload_and_headers() {
        let (url, recorded) = serve_json(StatusCode::OK, success_body("ok")).await;

        client(&url).complete("kaise ho", &[], &key()).await;

        let body = recorded.body();
        assert_eq!(body["model"], "openai/gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 300);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], DEFAULT_SYSTEM_PROMPT);
        assert_eq!(messages[1], json!({"role": "user", "content": "kaise ho"}));

        assert_eq!(recorded.header("authorization").as_deref(), Some("Bearer sk-or-v1-test-key"));
        assert_eq!(recorded.header("x-title").as_deref(), Some("Friendly Bot"));
        assert_eq!(recorded.header("http-referer"), None);
    }

    #[tokio::test]
    async fn test_sends_only_last_six_history_entries() {
        let (url, recorded) = serve_json(StatusCode::OK, success_body("ok")).await;

        let mut conversation = Conversation::empty();
        for i in 1..=7 {
            if i % 2 == 0 {
                conversation.push_bot(format!("m{}", i));
            } else {
                conversation.push_user(format!("m{}", i)).unwrap();
            }
        }

        client(&url)
            .complete("latest", conversation.messages(), &key())
            .await;

        let body = recorded.body();
        let messages = body["messages"].as_array().unwrap();
        let sent: Vec<(String, String)> = messages
            .iter()
            .map(|m| {
                (
                    m["role"].as_str().unwrap().to_string(),
                    m["content"].as_str().unwrap().to_string(),
                )
            })
            .collect();

        assert_eq!(sent.len(), 8);
        assert_eq!(sent[0].0, "system");
        let expected = [
            ("assistant", "m2"),
            ("user", "m3"),
            ("assistant", "m4"),
            ("user", "m5"),
            ("assistant", "m6"),
            ("user", "m7"),
            ("user", "latest"),
        ];
        for (got, (role, content)) in sent[1..].iter().zip(expected) {
            assert_eq!(got.0, role);
            assert_eq!(got.1, content);
        }
    }

    #[tokio::test]
    async fn test_failure_status_returns_http_error() {
        for status in [401u16, 402, 429, 500, 503] {
            let (url, recorded) = serve(
                StatusCode::from_u16(status).unwrap(),
                r#"{"error":{"message":"nope"}}"#.to_string(),
                Duration::ZERO,
            )
            .await;

            let outcome = client(&url).complete("hi", &[], &key()).await;

            assert_eq!(
                outcome,
                CompletionOutcome::HttpError {
                    status,
                    body: r#"{"error":{"message":"nope"}}"#.to_string(),
                }
            );
            // No retries.
            assert_eq!(recorded.hits(), 1);
        }
    }

    #[tokio::test]
    async fn test_empty_content_is_empty_success() {
        let (url, _) = serve_json(StatusCode::OK, json!({"choices": []})).await;

        let outcome = client(&url).complete("hi", &[], &key()).await;

        assert_eq!(outcome, CompletionOutcome::Success(String::new()));
    }

    #[tokio::test]
    async fn test_malformed_body_is_network_error() {
        let (url, _) = serve(StatusCode::OK, "<html>oops</html>".to_string(), Duration::ZERO).await;

        let outcome = client(&url).complete("hi", &[], &key()).await;

        assert!(matches!(outcome, CompletionOutcome::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let outcome = client(&format!("http://{}/v1/chat/completions", addr))
            .complete("hi", &[], &key())
            .await;

        assert!(matches!(outcome, CompletionOutcome::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let (url, _) = serve(
            StatusCode::OK,
            success_body("late").to_string(),
            Duration::from_secs(5),
        )
        .await;
        let config = ClientConfig::default()
            .with_endpoint(url)
            .with_request_timeout(Some(Duration::from_millis(200)));

        let outcome = HttpCompletionClient::new(config)
            .unwrap()
            .complete("hi", &[], &key())
            .await;

        assert!(matches!(outcome, CompletionOutcome::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_wrong_prefix_short_circuits() {
        let (url, recorded) = serve_json(StatusCode::OK, success_body("ok")).await;

        let outcome = client(&url)
            .complete("hi", &[], &Credential::parse("sk-proj-abc").unwrap())
            .await;

        assert_eq!(
            outcome,
            CompletionOutcome::MalformedCredential {
                expected_prefix: "sk-or-v1-".to_string()
            }
        );
        assert_eq!(recorded.hits(), 0);
    }

    #[tokio::test]
    async fn test_prefix_check_can_be_disabled() {
        let (url, recorded) = serve_json(StatusCode::OK, success_body("ok")).await;
        let config = ClientConfig::default()
            .with_endpoint(url)
            .with_credential_prefix(None)
            .with_referer("http://localhost:8080");

        let outcome = HttpCompletionClient::new(config)
            .unwrap()
            .complete("hi", &[], &Credential::parse("sk-proj-abc").unwrap())
            .await;

        assert_eq!(outcome, CompletionOutcome::Success("ok".to_string()));
        assert_eq!(recorded.header("http-referer").as_deref(), Some("http://localhost:8080"));
    }

    #[tokio::test]
    async fn test_key_with_control_characters_is_malformed() {
        let (url, recorded) = serve_json(StatusCode::OK, success_body("ok")).await;

        let outcome = client(&url)
            .complete("hi", &[], &Credential::parse("sk-or-v1-abc\ndef").unwrap())
            .await;

        assert_eq!(
            outcome,
            CompletionOutcome::MalformedCredential {
                expected_prefix: "sk-or-v1-".to_string()
            }
        );
        assert_eq!(recorded.hits(), 0);
    }

    #[test]
    fn test_invalid_header_rejected_at_construction() {
        let config = ClientConfig::default().with_title(Some("bad\nvalue".to_string()));
        assert!(matches!(
            HttpCompletionClient::new(config),
            Err(ClientError::InvalidConfig(_))
        ));
    }
}
