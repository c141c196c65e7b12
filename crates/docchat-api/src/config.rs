use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "docchat-api",
    about = "RAG chat service answering questions over ingested PDF documents"
)]
pub struct ServerConfig {
    /// Address to bind the HTTP server to (host:port).
    #[arg(long, env = "DOCCHAT_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Identity provider base URL.
    #[arg(
        long,
        env = "DOCCHAT_IDENTITY_URL",
        default_value = "https://identitytoolkit.googleapis.com"
    )]
    pub identity_url: String,

    /// Identity provider project identifier.
    #[arg(long, env = "DOCCHAT_IDENTITY_PROJECT")]
    pub identity_project: String,

    /// Vector store endpoint (http(s)://host[:port]).
    #[arg(long, env = "QDRANT_URL")]
    pub qdrant_url: String,

    /// Vector store API key.
    #[arg(long, env = "QDRANT_API_KEY")]
    pub qdrant_api_key: String,

    /// Collection holding the ingested PDF chunks.
    #[arg(long, env = "DOCCHAT_COLLECTION", default_value = "learning_vectors")]
    pub collection: String,

    /// Base URL for OpenAI-compatible embedding and generation endpoints.
    #[arg(
        long,
        env = "DOCCHAT_OPENAI_BASE",
        default_value = "https://api.openai.com/v1"
    )]
    pub openai_base_url: String,

    /// API key for embedding and generation calls.
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: String,

    /// Embedding model; must match the model used at ingestion time.
    #[arg(
        long,
        env = "DOCCHAT_EMBED_MODEL",
        default_value = "text-embedding-3-large"
    )]
    pub embedding_model: String,

    /// Generation model.
    #[arg(long, env = "DOCCHAT_CHAT_MODEL", default_value = "gpt-4.1")]
    pub generation_model: String,

    /// Base URL of the ingestion service that parses and indexes PDFs.
    #[arg(long, env = "DOCCHAT_INGEST_URL")]
    pub ingest_url: String,

    /// Chunks fetched per retrieval.
    #[arg(long, default_value_t = 4)]
    pub top_k: usize,

    /// Character budget for the assembled context block.
    #[arg(long, default_value_t = 24_000)]
    pub max_context_chars: usize,

    /// Max requests per subject within the rate-limit window.
    #[arg(long, env = "DOCCHAT_RATE_LIMIT", default_value_t = 5)]
    pub max_requests: usize,

    /// Rate-limit window in seconds.
    #[arg(long, env = "DOCCHAT_RATE_WINDOW_SECS", default_value_t = 60)]
    pub window_secs: u64,

    /// Seconds before outbound requests time out.
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Retry attempts for transient embedding/generation errors.
    #[arg(long, default_value_t = 3)]
    pub max_retries: usize,
}
