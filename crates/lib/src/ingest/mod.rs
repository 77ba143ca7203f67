//! # Catalog Ingestion
//!
//! This module provides the batched, idempotent pipeline that loads book
//! records into the vector store. Each record gets a content-addressed ID
//! derived from its canonical identity key, so re-ingesting the same input
//! upserts rather than duplicates.

pub mod books;

use crate::{
    errors::ChatError,
    providers::vector::VectorStore,
};
use serde_json::{Map, Value};
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

/// Errors for the ingestion pipeline.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Batch size must be greater than zero")]
    InvalidBatchSize,
    #[error("The input file could not be read: {0}")]
    SourceNotFound(String),
    #[error("Failed to parse the input records: {0}")]
    Parse(#[from] csv::Error),
    #[error("A vector store operation failed during ingestion: {0}")]
    Store(#[from] ChatError),
}

/// A single book record read from the catalog.
///
/// Records with an empty title or summary are dropped before they reach the
/// pipeline; see [`books::read_books`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub categories: Vec<String>,
}

impl BookRecord {
    /// Renders the record as the stored document blob plus its metadata map.
    ///
    /// The summary appears only inside the blob; it is deliberately not
    /// duplicated into metadata.
    pub fn to_document(&self) -> (String, Map<String, Value>) {
        let document = format!(
            "Title: {}\nAuthors: {}\nCategories: {}\nSummary: {}",
            self.title,
            self.authors.join(", "),
            self.categories.join(", "),
            self.summary
        );
        let mut metadata = Map::new();
        metadata.insert("title".to_string(), Value::String(self.title.clone()));
        metadata.insert(
            "authors".to_string(),
            Value::String(flatten(&self.authors)),
        );
        metadata.insert(
            "categories".to_string(),
            Value::String(flatten(&self.categories)),
        );
        (document, metadata)
    }
}

/// Joins non-empty, trimmed elements with ", " in their original order.
fn flatten(items: &[String]) -> String {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Derives the canonical identity key for a record.
///
/// Two records whose normalized (title, authors, categories) triples are
/// equal collapse to the same key, and the key is stable across runs.
pub fn canonical_key(record: &BookRecord) -> String {
    format!(
        "{}|{}|{}",
        record.title.trim().to_lowercase(),
        flatten(&record.authors).to_lowercase(),
        flatten(&record.categories).to_lowercase()
    )
}

/// Hashes a canonical key into the fixed-length stored item ID.
pub fn record_id(canonical_key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(canonical_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Summary of a completed ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Number of documents upserted into the collection.
    pub added: usize,
    /// Number of records skipped because their ID was already seen this run.
    pub skipped_duplicates: usize,
}

/// Ingests a stream of records into the vector store.
///
/// Skips the entire run when the collection is already populated and `force`
/// is false. With `force`, the collection is dropped and recreated first; a
/// failed drop (e.g. the collection does not exist yet) is non-fatal.
///
/// Records are streamed one at a time, deduplicated by stored item ID within
/// the run, and flushed in batches of `batch_size` with a final flush for the
/// remainder. A failed upsert aborts the run; batches already flushed stay
/// persisted, which is safe to rerun thanks to ID-based upsert idempotence.
pub async fn ingest_records(
    store: &dyn VectorStore,
    records: impl Iterator<Item = BookRecord>,
    batch_size: usize,
    force: bool,
) -> Result<IngestReport, IngestError> {
    if batch_size == 0 {
        return Err(IngestError::InvalidBatchSize);
    }

    if force {
        match store.delete_collection().await {
            Ok(()) => info!("Dropped existing collection before re-ingestion"),
            Err(e) => warn!("Delete collection failed or did not exist: {e}"),
        }
    } else {
        let count = store.count().await.map_err(IngestError::Store)?;
        if count > 0 {
            info!(count, "Collection is not empty. Skipping ingestion.");
            return Ok(IngestReport::default());
        }
    }

    let mut report = IngestReport::default();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut batch_ids: Vec<String> = Vec::with_capacity(batch_size);
    let mut batch_docs: Vec<String> = Vec::with_capacity(batch_size);
    let mut batch_metas: Vec<Map<String, Value>> = Vec::with_capacity(batch_size);

    for record in records {
        let id = record_id(&canonical_key(&record));
        if !seen_ids.insert(id.clone()) {
            report.skipped_duplicates += 1;
            continue;
        }

        let (document, metadata) = record.to_document();
        batch_ids.push(id);
        batch_docs.push(document);
        batch_metas.push(metadata);

        if batch_ids.len() >= batch_size {
            flush_batch(store, &mut batch_ids, &mut batch_docs, &mut batch_metas, &mut report)
                .await?;
        }
    }

    // Final flush for any remainder; a no-op when the batch is empty.
    flush_batch(store, &mut batch_ids, &mut batch_docs, &mut batch_metas, &mut report).await?;

    if report.skipped_duplicates > 0 {
        info!(
            skipped = report.skipped_duplicates,
            "Skipped duplicate records based on canonical ID"
        );
    }

    Ok(report)
}

async fn flush_batch(
    store: &dyn VectorStore,
    batch_ids: &mut Vec<String>,
    batch_docs: &mut Vec<String>,
    batch_metas: &mut Vec<Map<String, Value>>,
    report: &mut IngestReport,
) -> Result<(), IngestError> {
    if batch_ids.is_empty() {
        return Ok(());
    }
    store
        .upsert(batch_ids, batch_docs, batch_metas)
        .await
        .map_err(IngestError::Store)?;
    report.added += batch_ids.len();
    info!(
        flushed = batch_ids.len(),
        total = report.added,
        "Upserted batch into collection"
    );
    batch_ids.clear();
    batch_docs.clear();
    batch_metas.clear();
    Ok(())
}
