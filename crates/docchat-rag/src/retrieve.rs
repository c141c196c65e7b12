//! Similarity search against the vector-store collection of PDF chunks.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embed::OpenAiEmbedder;
use crate::error::RagError;

/// One unit of previously indexed document text plus its provenance.
/// Read-only; lives for the duration of a single chat call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub text: String,
    pub source: String,
}

/// Turns a free-text query into the top matching chunks, best first.
pub trait Retriever: Send + Sync {
    fn retrieve(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<RetrievedChunk>, RagError>> + Send;
}

/// Retriever backed by a Qdrant collection.
///
/// The query is embedded with the same pinned model used at ingestion time,
/// then searched against the named collection. Results keep the store's
/// descending-similarity order; no re-ranking.
pub struct QdrantRetriever {
    client: reqwest::Client,
    search_url: String,
    api_key: String,
    embedder: OpenAiEmbedder,
    top_k: usize,
    timeout: Duration,
}

#[bon::bon]
impl QdrantRetriever {
    #[builder]
    pub fn new(
        #[builder(into)] endpoint: String,
        #[builder(into)] api_key: String,
        #[builder(into)] collection: String,
        embedder: OpenAiEmbedder,
        #[builder(default = 4)] top_k: usize,
        #[builder(default = Duration::from_secs(30))] timeout: Duration,
    ) -> Self {
        let search_url = format!(
            "{}/collections/{}/points/search",
            endpoint.trim_end_matches('/'),
            collection
        );
        Self {
            client: reqwest::Client::new(),
            search_url,
            api_key,
            embedder,
            top_k,
            timeout,
        }
    }
}

impl Retriever for QdrantRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>, RagError> {
        let vector = self.embedder.embed_query(query).await?;

        let request = SearchRequest {
            vector: &vector,
            limit: self.top_k,
            with_payload: true,
        };
        let response = self
            .client
            .post(&self.search_url)
            .header("api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                RagError::RetrievalUnavailable(format!("vector store unreachable: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(RagError::RetrievalUnavailable(format!(
                "vector search failed ({status}): {body}"
            )));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| {
            RagError::RetrievalUnavailable(format!("malformed search response: {e}"))
        })?;

        let chunks: Vec<RetrievedChunk> = parsed
            .result
            .into_iter()
            .filter_map(|hit| hit.payload)
            .map(|payload| RetrievedChunk {
                text: payload.text,
                source: payload.source.unwrap_or_default(),
            })
            .collect();
        debug!(count = chunks.len(), "retrieved context chunks");
        Ok(chunks)
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    payload: Option<ChunkPayload>,
}

/// Write contract with the ingestion pipeline: every indexed point carries
/// the chunk text and its source document in the payload.
#[derive(Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    text: String,
    #[serde(default)]
    source: Option<String>,
}
