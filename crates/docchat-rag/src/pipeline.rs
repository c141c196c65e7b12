//! Retrieval → prompt assembly → generation.

use tracing::{debug, info};

use crate::error::RagError;
use crate::generate::Generator;
use crate::prompt::{NO_CONTEXT_ANSWER, context_block, system_prompt};
use crate::retrieve::Retriever;

/// Answers a free-text question grounded in retrieved document context.
///
/// Stateless across calls. Multi-turn history is an extension point, not
/// threaded through yet; each call sends only the latest query.
pub struct RagChatPipeline<R, G> {
    retriever: R,
    generator: G,
    context_chars: usize,
}

impl<R: Retriever, G: Generator> RagChatPipeline<R, G> {
    pub fn new(retriever: R, generator: G, context_chars: usize) -> Self {
        Self {
            retriever,
            generator,
            context_chars,
        }
    }

    /// Produce an answer for `query`.
    ///
    /// When retrieval yields nothing, the fixed refusal string is returned
    /// directly: there is no context to ground an answer in, so the model is
    /// not called at all.
    pub async fn answer(&self, query: &str) -> Result<String, RagError> {
        let chunks = self.retriever.retrieve(query).await?;
        if chunks.is_empty() {
            info!("no matching chunks for query; returning no-context answer");
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        let context = context_block(&chunks, self.context_chars);
        debug!(
            chunks = chunks.len(),
            context_chars = context.len(),
            "assembled context block"
        );
        let system = system_prompt(&context);
        self.generator.generate(&system, query).await
    }
}
