#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared mock providers for the library's integration tests: a scriptable
//! AI provider that records every call, and an in-memory vector store that
//! records upsert batches.

use async_trait::async_trait;
use bookrag::providers::ai::{AiProvider, ChatMessage, ChatOutcome, ToolDefinition};
use bookrag::providers::vector::{RetrievedDocument, VectorStore};
use bookrag::ChatError;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, Once, RwLock};

static INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}

/// One recorded AI call: the messages sent and whether tools were offered.
#[derive(Debug, Clone)]
pub struct RecordedAiCall {
    pub messages: Vec<ChatMessage>,
    pub with_tools: bool,
}

// --- Mock AI Provider ---

/// Returns scripted `ChatOutcome`s in order and records every call.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<RwLock<Vec<RecordedAiCall>>>,
    outcomes: Arc<RwLock<Vec<ChatOutcome>>>,
}

impl MockAiProvider {
    pub fn new(outcomes: Vec<ChatOutcome>) -> Self {
        Self {
            call_history: Arc::new(RwLock::new(Vec::new())),
            outcomes: Arc::new(RwLock::new(outcomes.into_iter().rev().collect())),
        }
    }

    /// Convenience constructor for plain-text responses with no tool calls.
    pub fn with_texts(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| ChatOutcome {
                    content: t.to_string(),
                    tool_calls: Vec::new(),
                })
                .collect(),
        )
    }

    pub fn calls(&self) -> Vec<RecordedAiCall> {
        self.call_history.read().unwrap().clone()
    }

    fn next_outcome(&self) -> ChatOutcome {
        self.outcomes
            .write()
            .unwrap()
            .pop()
            .unwrap_or_else(|| ChatOutcome {
                content: "Default mock response".to_string(),
                tool_calls: Vec::new(),
            })
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
    ) -> Result<String, ChatError> {
        self.call_history.write().unwrap().push(RecordedAiCall {
            messages: messages.to_vec(),
            with_tools: false,
        });
        Ok(self.next_outcome().content)
    }

    async fn complete_with_tools(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
        _temperature: f32,
    ) -> Result<ChatOutcome, ChatError> {
        self.call_history.write().unwrap().push(RecordedAiCall {
            messages: messages.to_vec(),
            with_tools: true,
        });
        Ok(self.next_outcome())
    }
}

// --- Mock Vector Store ---

/// An in-memory `VectorStore` with recorded upsert batches.
///
/// `query_by_text` returns the stored documents in insertion order, which
/// stands in for ranking; `get_by_metadata` supports the `{field: {"$eq": v}}`
/// filter shape used by the summary lookup.
#[derive(Clone, Debug, Default)]
pub struct MockVectorStore {
    pub items: Arc<Mutex<Vec<RetrievedDocument>>>,
    pub upsert_batches: Arc<Mutex<Vec<usize>>>,
    pub query_count: Arc<Mutex<usize>>,
    pub deleted: Arc<Mutex<bool>>,
    pub fail_upserts: Arc<Mutex<bool>>,
    pub fail_metadata_lookup: Arc<Mutex<bool>>,
}

impl MockVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<RetrievedDocument>) -> Self {
        let store = Self::default();
        *store.items.lock().unwrap() = items;
        store
    }

    pub fn upsert_batch_sizes(&self) -> Vec<usize> {
        self.upsert_batches.lock().unwrap().clone()
    }

    pub fn queries_issued(&self) -> usize {
        *self.query_count.lock().unwrap()
    }
}

#[async_trait]
impl VectorStore for MockVectorStore {
    async fn query_by_text(
        &self,
        _text: &str,
        n_results: usize,
    ) -> Result<Vec<RetrievedDocument>, ChatError> {
        *self.query_count.lock().unwrap() += 1;
        let items = self.items.lock().unwrap();
        Ok(items.iter().take(n_results).cloned().collect())
    }

    async fn get_by_metadata(&self, filter: Value) -> Result<Vec<RetrievedDocument>, ChatError> {
        if *self.fail_metadata_lookup.lock().unwrap() {
            return Err(ChatError::StoreApi("metadata lookup unavailable".to_string()));
        }
        let filter = filter.as_object().cloned().unwrap_or_default();
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|item| {
                filter.iter().all(|(key, condition)| {
                    let expected = condition.get("$eq").unwrap_or(condition);
                    item.metadata.get(key) == Some(expected)
                })
            })
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        ids: &[String],
        documents: &[String],
        metadatas: &[Map<String, Value>],
    ) -> Result<(), ChatError> {
        if *self.fail_upserts.lock().unwrap() {
            return Err(ChatError::StoreApi("upsert rejected".to_string()));
        }
        self.upsert_batches.lock().unwrap().push(ids.len());
        let mut items = self.items.lock().unwrap();
        for ((id, document), metadata) in ids.iter().zip(documents).zip(metadatas) {
            if let Some(existing) = items.iter_mut().find(|item| &item.id == id) {
                existing.document = document.clone();
                existing.metadata = metadata.clone();
            } else {
                items.push(RetrievedDocument {
                    id: id.clone(),
                    document: document.clone(),
                    metadata: metadata.clone(),
                });
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, ChatError> {
        Ok(self.items.lock().unwrap().len())
    }

    async fn delete_collection(&self) -> Result<(), ChatError> {
        self.items.lock().unwrap().clear();
        *self.deleted.lock().unwrap() = true;
        Ok(())
    }
}

/// Builds a retrieved document with `title`/`authors`/`categories` metadata.
pub fn stored_book(id: &str, title: &str, document: &str) -> RetrievedDocument {
    let mut metadata = Map::new();
    metadata.insert("title".to_string(), Value::String(title.to_string()));
    metadata.insert(
        "authors".to_string(),
        Value::String("Test Author".to_string()),
    );
    metadata.insert(
        "categories".to_string(),
        Value::String("Fiction".to_string()),
    );
    RetrievedDocument {
        id: id.to_string(),
        document: document.to_string(),
        metadata,
    }
}
