//! Query embedding via an OpenAI-compatible embeddings endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RagError;
use crate::retry::{is_transient, retry_backoff, should_retry};

/// Async embeddings client.
///
/// The model identifier is pinned per instance and must match the model used
/// when the documents were ingested; a mismatch silently degrades retrieval
/// relevance and cannot be detected here.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
    max_retries: usize,
}

#[bon::bon]
impl OpenAiEmbedder {
    #[builder]
    pub fn new(
        #[builder(into)] base_url: String,
        #[builder(into)] api_key: String,
        #[builder(into)] model: String,
        #[builder(default = Duration::from_secs(30))] timeout: Duration,
        #[builder(default = 3)] max_retries: usize,
    ) -> Self {
        let endpoint = format!("{}/embeddings", base_url.trim_end_matches('/'));
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
            timeout,
            max_retries: max_retries.max(1),
        }
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let inputs = [text];
        let request = EmbeddingRequest {
            model: &self.model,
            input: &inputs,
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
                        let parsed: EmbeddingResponse = resp.json().await.map_err(|e| {
                            RagError::RetrievalUnavailable(format!(
                                "malformed embedding response: {e}"
                            ))
                        })?;
                        let embedding = parsed
                            .data
                            .into_iter()
                            .next()
                            .map(|entry| entry.embedding)
                            .ok_or_else(|| {
                                RagError::RetrievalUnavailable(
                                    "embedding response contained no vectors".to_string(),
                                )
                            })?;
                        return Ok(embedding);
                    }

                    let body = resp
                        .text()
                        .await
                        .unwrap_or_else(|_| "<body unavailable>".to_string());
                    if should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        debug!(%status, attempt, "retrying embedding request");
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(RagError::RetrievalUnavailable(format!(
                        "embedding request failed ({status}): {body}"
                    )));
                }
                Err(err) => {
                    if is_transient(&err) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        debug!(error = %err, attempt, "retrying embedding request");
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(RagError::RetrievalUnavailable(format!(
                        "embedding endpoint unreachable: {err}"
                    )));
                }
            }
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
