use std::sync::Arc;
use std::time::Duration;

use docchat_auth::{IdentityClient, RequestGate, RequestThrottle};
use docchat_rag::{
    IngestClient, OpenAiEmbedder, OpenAiGenerator, QdrantRetriever, RagChatPipeline,
};

use crate::config::ServerConfig;

pub type ChatPipeline = RagChatPipeline<QdrantRetriever, OpenAiGenerator>;

/// Shared handles passed into every request handler. The gate owns the only
/// mutable state (the throttle); everything else is a stateless client.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<RequestGate<IdentityClient>>,
    pub pipeline: Arc<ChatPipeline>,
    pub ingest: Arc<IngestClient>,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let verifier =
            IdentityClient::new(&config.identity_url, &config.identity_project, timeout);
        let throttle = RequestThrottle::new(
            config.max_requests,
            Duration::from_secs(config.window_secs),
        );

        let embedder = OpenAiEmbedder::builder()
            .base_url(config.openai_base_url.clone())
            .api_key(config.openai_api_key.clone())
            .model(config.embedding_model.clone())
            .timeout(timeout)
            .max_retries(config.max_retries)
            .build();
        let retriever = QdrantRetriever::builder()
            .endpoint(config.qdrant_url.clone())
            .api_key(config.qdrant_api_key.clone())
            .collection(config.collection.clone())
            .embedder(embedder)
            .top_k(config.top_k)
            .timeout(timeout)
            .build();
        let generator = OpenAiGenerator::builder()
            .base_url(config.openai_base_url.clone())
            .api_key(config.openai_api_key.clone())
            .model(config.generation_model.clone())
            .timeout(timeout)
            .max_retries(config.max_retries)
            .build();

        Self {
            gate: Arc::new(RequestGate::new(verifier, throttle)),
            pipeline: Arc::new(RagChatPipeline::new(
                retriever,
                generator,
                config.max_context_chars,
            )),
            ingest: Arc::new(IngestClient::new(&config.ingest_url, timeout)),
        }
    }
}
