//! # Summary Lookup Tests
//!
//! Covers the two-attempt summary lookup: exact metadata match, the
//! similarity fallback, summary-vs-compacted-text derivation, and the
//! explicit not-found outcome.

mod common;

use bookrag::providers::vector::{lookup_summary, RetrievedDocument};
use common::{setup_tracing, stored_book, MockVectorStore};
use serde_json::Value;

/// Verifies the exact-match path prefers a stored `summary` metadata field.
#[tokio::test]
async fn test_exact_match_prefers_summary_field() {
    setup_tracing();
    let mut item = stored_book("id-1", "Dune", "Title: Dune\nSummary: Desert planet.");
    item.metadata.insert(
        "summary".to_string(),
        Value::String("A curated summary of Dune.".to_string()),
    );
    let store = MockVectorStore::with_items(vec![item]);

    let result = lookup_summary(&store, "Dune").await.unwrap();
    assert_eq!(result.as_deref(), Some("A curated summary of Dune."));
    // The exact match short-circuits; no similarity query is issued.
    assert_eq!(store.queries_issued(), 0);
}

/// Verifies the exact-match path compacts the document text when no summary
/// metadata is stored.
#[tokio::test]
async fn test_exact_match_compacts_document_text() {
    setup_tracing();
    let document = format!("Title: Dune\nSummary: {}", "word ".repeat(400));
    let store = MockVectorStore::with_items(vec![stored_book("id-1", "Dune", &document)]);

    let result = lookup_summary(&store, "Dune").await.unwrap().unwrap();
    assert!(result.chars().count() <= 800);
    assert!(result.ends_with("..."));
    assert!(!result.contains('\n'));
}

/// Verifies the similarity fallback kicks in when no exact title matches.
#[tokio::test]
async fn test_similarity_fallback() {
    setup_tracing();
    let store = MockVectorStore::with_items(vec![stored_book(
        "id-1",
        "The Hobbit",
        "Title: The Hobbit\nSummary: Bilbo's journey.",
    )]);

    // Title variant with no exact metadata match.
    let result = lookup_summary(&store, "the hobbit").await.unwrap();
    assert!(result.unwrap().contains("Bilbo's journey."));
    assert_eq!(store.queries_issued(), 1);
}

/// Verifies a metadata lookup failure is swallowed and the similarity
/// fallback still runs.
#[tokio::test]
async fn test_metadata_failure_falls_back_to_similarity() {
    setup_tracing();
    let store = MockVectorStore::with_items(vec![stored_book(
        "id-1",
        "Dune",
        "Title: Dune\nSummary: Desert planet.",
    )]);
    *store.fail_metadata_lookup.lock().unwrap() = true;

    let result = lookup_summary(&store, "Dune").await.unwrap();
    assert!(result.unwrap().contains("Desert planet."));
}

/// Verifies the lookup reports not-found when nothing matches any form of
/// the title.
#[tokio::test]
async fn test_not_found() {
    setup_tracing();
    let store = MockVectorStore::new();
    let result = lookup_summary(&store, "The Hobbit").await.unwrap();
    assert!(result.is_none());
}

/// Verifies the model-supplied title is trimmed before the exact match.
#[tokio::test]
async fn test_title_is_trimmed_for_exact_match() {
    setup_tracing();
    let item: RetrievedDocument =
        stored_book("id-1", "Dune", "Title: Dune\nSummary: Desert planet.");
    let store = MockVectorStore::with_items(vec![item]);

    let result = lookup_summary(&store, "  Dune  ").await.unwrap();
    assert!(result.unwrap().contains("Desert planet."));
    assert_eq!(store.queries_issued(), 0);
}
