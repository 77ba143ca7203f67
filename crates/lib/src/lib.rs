//! # bookrag
//!
//! A retrieval-augmented chat library over a book catalog. An incoming query
//! is routed to either the summary tool agent (for "summarize this title"
//! requests) or the plain retrieval-augmented answering pipeline, with both
//! paths delegating to a configurable AI provider and vector store.

pub mod errors;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod rag;
pub mod summary;

pub use errors::ChatError;
pub use rag::Source;

use providers::{ai::AiProvider, vector::VectorStore};
use tracing::info;

/// A client bundling the two external gateways behind one chat entry point.
///
/// Both providers are injected at construction; the client holds no global
/// state and can be cloned cheaply across request handlers.
#[derive(Debug, Clone)]
pub struct ChatClient {
    pub ai_provider: Box<dyn AiProvider>,
    pub vector_store: Box<dyn VectorStore>,
}

impl ChatClient {
    /// Answers a chat query, routing on intent.
    ///
    /// Summary-intent queries run through the two-round tool agent and return
    /// an empty source list; everything else runs the retrieval-augmented
    /// pipeline with up to `k` context documents.
    pub async fn chat(
        &self,
        query: &str,
        k: usize,
        metadata_fields: Option<&[String]>,
    ) -> Result<(String, Vec<Source>), ChatError> {
        let query = query.trim();
        if is_summary_intent(query) {
            info!("Routing query to the summary tool agent");
            let answer = summary::run(self.ai_provider.as_ref(), self.vector_store.as_ref(), query)
                .await?;
            return Ok((answer, Vec::new()));
        }

        info!(k, "Routing query to retrieval-augmented answering");
        rag::answer(
            self.ai_provider.as_ref(),
            self.vector_store.as_ref(),
            query,
            k,
            metadata_fields,
        )
        .await
    }
}

/// A builder for creating `ChatClient` instances.
#[derive(Default)]
pub struct ChatClientBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    vector_store: Option<Box<dyn VectorStore>>,
}

impl ChatClientBuilder {
    /// Creates a new `ChatClientBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Sets the vector store.
    pub fn vector_store(mut self, store: Box<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Builds the `ChatClient`, failing if either gateway is missing.
    pub fn build(self) -> Result<ChatClient, ChatError> {
        let ai_provider = self.ai_provider.ok_or(ChatError::MissingAiProvider)?;
        let vector_store = self.vector_store.ok_or(ChatError::MissingVectorStore)?;
        Ok(ChatClient {
            ai_provider,
            vector_store,
        })
    }
}

/// Classifies a query as a summary request.
pub fn is_summary_intent(query: &str) -> bool {
    let lower = query.to_lowercase();
    lower.contains("summary") || lower.starts_with("summarize ") || lower.starts_with("summary:")
}
