pub mod embed;
pub mod error;
pub mod generate;
pub mod ingest;
pub mod pipeline;
pub mod prompt;
pub mod retrieve;

mod retry;

pub use embed::OpenAiEmbedder;
pub use error::{IngestError, RagError};
pub use generate::{Generator, OpenAiGenerator};
pub use ingest::IngestClient;
pub use pipeline::RagChatPipeline;
pub use prompt::NO_CONTEXT_ANSWER;
pub use retrieve::{QdrantRetriever, RetrievedChunk, Retriever};
