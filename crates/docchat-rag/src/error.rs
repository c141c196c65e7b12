#[derive(thiserror::Error, Debug)]
pub enum RagError {
    /// The vector store (or the embedding step in front of it) is
    /// unreachable or misconfigured. An empty result set is not an error.
    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),
    /// The generation model call failed or timed out.
    #[error("generation unavailable: {0}")]
    GenerationUnavailable(String),
}

#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// The external ingestion service reported or caused a failure;
    /// surfaced to the caller unchanged.
    #[error("ingestion failed: {0}")]
    IngestionFailed(String),
}
