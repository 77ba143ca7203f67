pub mod chroma;

use crate::errors::ChatError;
use crate::prompts::SUMMARY_COMPACT_MAX_CHARS;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use chroma::ChromaStore;
use serde_json::{Map, Value};
use std::fmt::Debug;
use tracing::{debug, warn};

/// A document retrieved from the vector store, with its ID and metadata.
#[derive(Debug, Clone, Default)]
pub struct RetrievedDocument {
    pub id: String,
    pub document: String,
    pub metadata: Map<String, Value>,
}

/// A trait for interacting with an external vector collection.
///
/// This is the narrow boundary the rest of the library depends on: nearest
/// neighbor retrieval by text, point lookup by metadata filter, idempotent
/// upserts keyed by caller-supplied IDs, and collection management.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug + DynClone {
    /// Returns up to `n_results` documents ranked by similarity to `text`.
    async fn query_by_text(
        &self,
        text: &str,
        n_results: usize,
    ) -> Result<Vec<RetrievedDocument>, ChatError>;

    /// Returns documents whose metadata matches the given filter exactly.
    async fn get_by_metadata(&self, filter: Value) -> Result<Vec<RetrievedDocument>, ChatError>;

    /// Inserts or updates documents by ID. All three slices must be the same length.
    async fn upsert(
        &self,
        ids: &[String],
        documents: &[String],
        metadatas: &[Map<String, Value>],
    ) -> Result<(), ChatError>;

    /// Returns the number of items in the collection.
    async fn count(&self) -> Result<usize, ChatError>;

    /// Drops the collection. Callers treat a missing collection as non-fatal.
    async fn delete_collection(&self) -> Result<(), ChatError>;
}

dyn_clone::clone_trait_object!(VectorStore);

/// Looks up the summary text for a stored title.
///
/// Attempt 1 is an exact metadata match on the `title` field; any error here is
/// logged and falls through to the fallback. Attempt 2 is a top-1 similarity
/// search using the title as the query. Both attempts prefer a stored `summary`
/// metadata field and otherwise derive a compacted form of the document text.
///
/// Returns `Ok(None)` when no matching item exists; a miss is a normal outcome
/// on this path, not an error.
pub async fn lookup_summary(
    store: &dyn VectorStore,
    title: &str,
) -> Result<Option<String>, ChatError> {
    let filter = serde_json::json!({ "title": { "$eq": title.trim() } });
    match store.get_by_metadata(filter).await {
        Ok(items) => {
            if let Some(item) = items.into_iter().next() {
                return Ok(Some(summary_from(&item)));
            }
        }
        Err(e) => {
            warn!("Exact title lookup failed, falling back to similarity: {e}");
        }
    }

    debug!("No exact title match for '{title}', trying similarity search");
    let items = store.query_by_text(title, 1).await?;
    Ok(items.into_iter().next().map(|item| summary_from(&item)))
}

/// Prefers a stored `summary` metadata field, otherwise compacts the document text.
fn summary_from(item: &RetrievedDocument) -> String {
    match item.metadata.get("summary").and_then(Value::as_str) {
        Some(summary) if !summary.is_empty() => summary.to_string(),
        _ => compact_text(&item.document, SUMMARY_COMPACT_MAX_CHARS),
    }
}

/// Collapses whitespace and truncates to `max_chars` with an ellipsis suffix.
pub(crate) fn compact_text(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{truncated}...")
}
