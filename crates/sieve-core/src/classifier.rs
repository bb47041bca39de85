//! LLM content classifier.
//!
//! Sends page content to a chat-completion endpoint with a fixed evaluator
//! prompt and turns the reply into a [`Verdict`]. Any failure of the API call
//! fails closed: the content is reported as inappropriate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::model::Verdict;
use crate::config::ClassifierConfig;
use crate::error::{SieveError, SieveResult};

/// Instruction sent as the system turn of every classification request.
pub const SYSTEM_PROMPT: &str = "You are a content evaluator. Respond with either \"appropriate\" or \"inappropriate\" depending on whether the content is suitable. If inappropriate, provide a brief reason why.";

const INAPPROPRIATE: &str = "inappropriate";
const INAPPROPRIATE_PREFIX: &str = "inappropriate:";

/// Classifies raw page content. Never fails: errors become a fail-closed verdict.
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    async fn classify(&self, content: &str) -> Verdict;
}

/// Turn a model reply into a verdict.
///
/// Only a reply starting with "inappropriate" flags the content; anything
/// else, including unrecognised replies, counts as appropriate.
pub fn parse_reply(reply: &str) -> Verdict {
    let decision = reply.trim().to_lowercase();

    if decision.starts_with(INAPPROPRIATE) {
        let reason = decision
            .strip_prefix(INAPPROPRIATE_PREFIX)
            .unwrap_or(&decision)
            .trim();
        return Verdict::inappropriate(reason);
    }

    Verdict::appropriate()
}

/// OpenAI-compatible chat-completion client.
#[derive(Clone)]
pub struct OpenAiClassifier {
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClassifier {
    pub fn new(config: &ClassifierConfig) -> SieveResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            client,
        })
    }

    /// Ask the model about `content` and return its raw reply.
    pub async fn complete(&self, content: &str) -> SieveResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content,
                },
            ],
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, bytes = content.len(), "Sending content for classification");
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SieveError::ClassifierApi {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response.json().await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(SieveError::EmptyCompletion)
    }
}

#[async_trait]
impl ContentClassifier for OpenAiClassifier {
    async fn classify(&self, content: &str) -> Verdict {
        match self.complete(content).await {
            Ok(reply) => {
                let verdict = parse_reply(&reply);
                if verdict.is_appropriate {
                    debug!("Content marked as appropriate");
                } else {
                    debug!(reason = %verdict.reason, "Content flagged as inappropriate");
                }
                verdict
            }
            Err(e) => {
                warn!(error = %e, "Classification failed, marking content inappropriate");
                Verdict::analysis_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::{ANALYSIS_ERROR_REASON, APPROPRIATE_REASON};
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_reason_extraction() {
        let verdict = parse_reply("Inappropriate: graphic violence");
        assert!(!verdict.is_appropriate);
        assert_eq!(verdict.reason, "graphic violence");
    }

    #[test]
    fn test_appropriate_reason_is_fixed() {
        assert_eq!(parse_reply("Appropriate"), Verdict::appropriate());
        let verdict = parse_reply("  appropriate. The page is a cooking blog.");
        assert!(verdict.is_appropriate);
        assert_eq!(verdict.reason, APPROPRIATE_REASON);
    }

    #[test]
    fn test_missing_colon_keeps_whole_reply() {
        let verdict = parse_reply("INAPPROPRIATE - contains gambling ads");
        assert!(!verdict.is_appropriate);
        assert_eq!(verdict.reason, "inappropriate - contains gambling ads");
    }

    #[test]
    fn test_bare_inappropriate_has_empty_reason() {
        let verdict = parse_reply("Inappropriate:");
        assert!(!verdict.is_appropriate);
        assert_eq!(verdict.reason, "");
    }

    #[test]
    fn test_unrecognised_reply_defaults_to_appropriate() {
        let verdict = parse_reply("I cannot evaluate this content.");
        assert!(verdict.is_appropriate);
    }

    #[derive(Clone)]
    struct Stub {
        status: StatusCode,
        body: Value,
        seen: Arc<Mutex<Option<(HeaderMap, Value)>>>,
    }

    async fn completions(
        State(stub): State<Stub>,
        headers: HeaderMap,
        Json(payload): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        *stub.seen.lock().unwrap() = Some((headers, payload));
        (stub.status, Json(stub.body.clone()))
    }

    async fn spawn_llm(stub: Stub) -> String {
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/chat/completions", addr)
    }

    fn classifier(api_url: String) -> OpenAiClassifier {
        OpenAiClassifier::new(&ClassifierConfig {
            api_key: "sk-test".to_string(),
            api_url,
            model: "gpt-4".to_string(),
            max_tokens: 50,
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn reply(content: &str) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
    }

    #[tokio::test]
    async fn test_request_shape() {
        let seen = Arc::new(Mutex::new(None));
        let url = spawn_llm(Stub {
            status: StatusCode::OK,
            body: reply("appropriate"),
            seen: seen.clone(),
        })
        .await;

        let verdict = classifier(url).classify("<p>recipes</p>").await;
        assert_eq!(verdict, Verdict::appropriate());

        let (headers, payload) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(headers["authorization"], "Bearer sk-test");
        assert_eq!(payload["model"], "gpt-4");
        assert_eq!(payload["max_tokens"], 50);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "<p>recipes</p>");
    }

    #[tokio::test]
    async fn test_flagged_reply() {
        let url = spawn_llm(Stub {
            status: StatusCode::OK,
            body: reply("Inappropriate: graphic violence"),
            seen: Arc::new(Mutex::new(None)),
        })
        .await;

        let verdict = classifier(url).classify("...").await;
        assert_eq!(verdict, Verdict::inappropriate("graphic violence"));
    }

    #[tokio::test]
    async fn test_api_error_fails_closed() {
        let url = spawn_llm(Stub {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: json!({ "error": { "message": "rate limited" } }),
            seen: Arc::new(Mutex::new(None)),
        })
        .await;

        let c = classifier(url);
        let err = c.complete("...").await.unwrap_err();
        assert!(matches!(err, SieveError::ClassifierApi { status: 429, .. }));

        let verdict = c.classify("...").await;
        assert!(!verdict.is_appropriate);
        assert_eq!(verdict.reason, ANALYSIS_ERROR_REASON);
    }

    #[tokio::test]
    async fn test_empty_choices_fails_closed() {
        let url = spawn_llm(Stub {
            status: StatusCode::OK,
            body: json!({ "choices": [] }),
            seen: Arc::new(Mutex::new(None)),
        })
        .await;

        let verdict = classifier(url).classify("...").await;
        assert_eq!(verdict, Verdict::analysis_error());
    }

    #[tokio::test]
    async fn test_malformed_body_fails_closed() {
        let url = spawn_llm(Stub {
            status: StatusCode::OK,
            body: json!({ "unexpected": true }),
            seen: Arc::new(Mutex::new(None)),
        })
        .await;

        let verdict = classifier(url).classify("...").await;
        assert_eq!(verdict, Verdict::analysis_error());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_fails_closed() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let verdict = classifier(format!("http://{}/v1/chat/completions", addr))
            .classify("...")
            .await;
        assert_eq!(verdict, Verdict::analysis_error());
    }

    #[tokio::test]
    async fn test_timeout_fails_closed() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(reply("appropriate"))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let c = OpenAiClassifier::new(&ClassifierConfig {
            api_key: "sk-test".to_string(),
            api_url: format!("http://{}/v1/chat/completions", addr),
            model: "gpt-4".to_string(),
            max_tokens: 50,
            timeout: Duration::from_millis(200),
        })
        .unwrap();

        match c.complete("...").await.unwrap_err() {
            SieveError::Http(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert_eq!(c.classify("...").await, Verdict::analysis_error());
    }
}
