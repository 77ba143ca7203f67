//! # Retrieval-Augmented Answering Tests
//!
//! Covers context assembly, the empty-retrieval sentinel, source descriptor
//! construction, and ranking-order preservation.

mod common;

use bookrag::prompts::EMPTY_CONTEXT_SENTINEL;
use bookrag::rag::answer;
use common::{setup_tracing, stored_book, MockAiProvider, MockVectorStore};
use serde_json::Value;

/// Verifies that zero retrieved documents still produce an answer, with the
/// explicit empty-context marker and an empty source list.
#[tokio::test]
async fn test_empty_retrieval_still_answers() {
    setup_tracing();
    let ai = MockAiProvider::with_texts(&["I don't have enough context to say."]);
    let store = MockVectorStore::new();

    let (answer_text, sources) = answer(&ai, &store, "Any books about whales?", 4, None)
        .await
        .unwrap();

    assert!(!answer_text.is_empty());
    assert!(sources.is_empty());

    let calls = ai.calls();
    assert_eq!(calls.len(), 1);
    let context_message = &calls[0].messages[1];
    assert_eq!(context_message.role, "assistant");
    assert!(context_message.content.contains(EMPTY_CONTEXT_SENTINEL));
}

/// Verifies that with k=4 and only 2 documents available, exactly 2 sources
/// come back, in retrieval order, with bounded previews.
#[tokio::test]
async fn test_sources_match_retrieval() {
    setup_tracing();
    let long_doc = format!("Title: Dune\nSummary: {}", "d".repeat(500));
    let store = MockVectorStore::with_items(vec![
        stored_book("id-1", "The Hobbit", "Title: The Hobbit\nSummary: A journey."),
        stored_book("id-2", "Dune", &long_doc),
    ]);
    let ai = MockAiProvider::with_texts(&["Two books match."]);

    let (_, sources) = answer(&ai, &store, "fantasy and sci-fi", 4, None)
        .await
        .unwrap();

    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].id.as_deref(), Some("id-1"));
    assert_eq!(sources[1].id.as_deref(), Some("id-2"));
    for source in &sources {
        assert!(source.preview.chars().count() <= 240 + 3);
    }
    assert!(sources[1].preview.ends_with("..."));
    // Full metadata map is flattened in when no subset was requested.
    assert_eq!(
        sources[0].fields.get("title"),
        Some(&Value::String("The Hobbit".to_string()))
    );
}

/// Verifies the model receives full, numbered context blocks even when the
/// previews are truncated.
#[tokio::test]
async fn test_context_blocks_are_numbered_and_untruncated() {
    setup_tracing();
    let long_doc = format!("Title: Dune\nSummary: {}", "d".repeat(500));
    let store = MockVectorStore::with_items(vec![
        stored_book("id-1", "The Hobbit", "Title: The Hobbit\nSummary: A journey."),
        stored_book("id-2", "Dune", &long_doc),
    ]);
    let ai = MockAiProvider::with_texts(&["ok"]);

    answer(&ai, &store, "desert planets", 2, None).await.unwrap();

    let calls = ai.calls();
    let context = &calls[0].messages[1].content;
    assert!(context.contains("[1] Title: The Hobbit"));
    assert!(context.contains("[2] Title: Dune"));
    // The untruncated text is what is sent to the model.
    assert!(context.contains(&"d".repeat(500)));
}

/// Verifies the requested metadata subset is honored, with missing keys
/// mapped to null.
#[tokio::test]
async fn test_requested_metadata_fields_subset() {
    setup_tracing();
    let store = MockVectorStore::with_items(vec![stored_book(
        "id-1",
        "The Hobbit",
        "Title: The Hobbit\nSummary: A journey.",
    )]);
    let ai = MockAiProvider::with_texts(&["ok"]);
    let fields = vec!["title".to_string(), "publisher".to_string()];

    let (_, sources) = answer(&ai, &store, "hobbits", 4, Some(&fields))
        .await
        .unwrap();

    assert_eq!(sources.len(), 1);
    let source = &sources[0];
    assert_eq!(
        source.fields.get("title"),
        Some(&Value::String("The Hobbit".to_string()))
    );
    assert_eq!(source.fields.get("publisher"), Some(&Value::Null));
    // Fields outside the requested subset are excluded.
    assert!(source.fields.get("authors").is_none());
}
