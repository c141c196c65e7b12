//! Grounded answer generation via an OpenAI-compatible chat endpoint.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RagError;
use crate::retry::{is_transient, retry_backoff, should_retry};

/// Produces an answer from a system instruction and the raw user query.
pub trait Generator: Send + Sync {
    fn generate(
        &self,
        system: &str,
        user: &str,
    ) -> impl Future<Output = Result<String, RagError>> + Send;
}

/// Async chat-completions client. The system instruction and the user query
/// are the only two messages sent.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
    max_retries: usize,
}

#[bon::bon]
impl OpenAiGenerator {
    #[builder]
    pub fn new(
        #[builder(into)] base_url: String,
        #[builder(into)] api_key: String,
        #[builder(into)] model: String,
        #[builder(default = Duration::from_secs(60))] timeout: Duration,
        #[builder(default = 3)] max_retries: usize,
    ) -> Self {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
            timeout,
            max_retries: max_retries.max(1),
        }
    }
}

impl Generator for OpenAiGenerator {
    async fn generate(&self, system: &str, user: &str) -> Result<String, RagError> {
        let messages = [
            Message {
                role: "system",
                content: system,
            },
            Message {
                role: "user",
                content: user,
            },
        ];
        let request = CompletionRequest {
            model: &self.model,
            messages: &messages,
        };

        let mut attempt = 0usize;
        loop {
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .timeout(self.timeout)
                .json(&request)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        let parsed: CompletionResponse = resp.json().await.map_err(|e| {
                            RagError::GenerationUnavailable(format!(
                                "malformed completion response: {e}"
                            ))
                        })?;
                        let answer = parsed
                            .choices
                            .into_iter()
                            .next()
                            .map(|choice| choice.message.content)
                            .ok_or_else(|| {
                                RagError::GenerationUnavailable(
                                    "completion response contained no choices".to_string(),
                                )
                            })?;
                        return Ok(answer);
                    }

                    let body = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        debug!(%status, attempt, "retrying completion request");
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(RagError::GenerationUnavailable(format!(
                        "completion request failed ({status}): {body}"
                    )));
                }
                Err(err) => {
                    if is_transient(&err) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        debug!(error = %err, attempt, "retrying completion request");
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(RagError::GenerationUnavailable(format!(
                        "generation endpoint unreachable: {err}"
                    )));
                }
            }
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message<'a>],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}
