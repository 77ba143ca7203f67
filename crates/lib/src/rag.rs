//! # Retrieval-Augmented Answering
//!
//! Retrieves the top-k documents for a query, hands the full texts to the
//! model as numbered context blocks, and returns the answer together with
//! per-document source descriptors. The descriptors are informational only;
//! nothing about them feeds back into the answer after retrieval.

use crate::{
    errors::ChatError,
    prompts::{EMPTY_CONTEXT_SENTINEL, SOURCE_PREVIEW_MAX_CHARS, SYSTEM_BASE},
    providers::{
        ai::{AiProvider, ChatMessage},
        vector::VectorStore,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Describes one retrieved document backing an answer.
///
/// `fields` carries either the caller-requested metadata subset (missing keys
/// become JSON null) or the full metadata map, flattened into the serialized
/// object next to `id` and `preview`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Source {
    pub id: Option<String>,
    pub preview: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Answers a query with retrieved context.
///
/// Retrieves up to `k` documents; when nothing is retrieved the model is
/// still invoked, with an explicit empty-context marker, and the source list
/// is empty. Retrieval ranking order is preserved in the returned sources.
pub async fn answer(
    ai_provider: &dyn AiProvider,
    store: &dyn VectorStore,
    query: &str,
    k: usize,
    requested_fields: Option<&[String]>,
) -> Result<(String, Vec<Source>), ChatError> {
    let retrieved = store.query_by_text(query, k).await?;
    debug!(count = retrieved.len(), "Retrieved context documents");

    let mut sources = Vec::with_capacity(retrieved.len());
    let mut context_blocks = Vec::with_capacity(retrieved.len());
    for item in retrieved {
        let fields = match requested_fields {
            Some(keys) => keys
                .iter()
                .map(|key| {
                    let value = item.metadata.get(key).cloned().unwrap_or(Value::Null);
                    (key.clone(), value)
                })
                .collect(),
            None => item.metadata,
        };
        sources.push(Source {
            id: Some(item.id),
            preview: preview(&item.document),
            fields,
        });
        context_blocks.push(item.document);
    }

    let answer = answer_with_context(ai_provider, query, &context_blocks).await?;
    Ok((answer, sources))
}

/// Sends the query to the model with the given context blocks, numbered in
/// ranked order. An empty context list becomes the `<empty>` sentinel.
pub async fn answer_with_context(
    ai_provider: &dyn AiProvider,
    query: &str,
    context_blocks: &[String],
) -> Result<String, ChatError> {
    let context = if context_blocks.is_empty() {
        EMPTY_CONTEXT_SENTINEL.to_string()
    } else {
        context_blocks
            .iter()
            .enumerate()
            .map(|(i, block)| format!("[{}] {block}", i + 1))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let messages = [
        ChatMessage::new("system", SYSTEM_BASE),
        ChatMessage::new("assistant", format!("Context:\n{context}")),
        ChatMessage::new("user", query),
    ];
    ai_provider.complete(&messages, 0.1).await
}

/// Truncates a document to the display preview length.
fn preview(document: &str) -> String {
    if document.chars().count() > SOURCE_PREVIEW_MAX_CHARS {
        let truncated: String = document.chars().take(SOURCE_PREVIEW_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        document.to_string()
    }
}
