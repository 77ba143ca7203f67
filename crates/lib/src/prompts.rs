//! # Prompt and Protocol Constants
//!
//! Shared string constants for the answering pipelines: system prompts, the
//! summary tool definition, and the fixed lengths used when rendering
//! previews and compacted summaries.

/// Base system prompt for every answering path.
pub const SYSTEM_BASE: &str = "You are a concise, detail-oriented assistant. \
    Use supplied context faithfully; if insufficient, say so briefly.";

/// System instruction for the summary tool agent's offer round.
pub const SUMMARY_AGENT_SYSTEM: &str = "If the user asks for a summary of a specific title, \
    call the tool 'lookup_summary_for_title' with the title. Otherwise, answer normally.";

/// Name of the single tool offered to the model.
pub const SUMMARY_TOOL_NAME: &str = "lookup_summary_for_title";

/// Description of the summary tool, shown to the model.
pub const SUMMARY_TOOL_DESCRIPTION: &str =
    "Return a concise summary for a book/document identified by title.";

/// Tool result substituted when no stored item matches the requested title.
pub const NO_MATCHING_TITLE: &str = "No matching title found.";

/// Context marker sent to the model when retrieval returned nothing.
pub const EMPTY_CONTEXT_SENTINEL: &str = "<empty>";

/// Maximum length of the document preview attached to each source descriptor.
/// Display-only; the untruncated text is what the model sees.
pub const SOURCE_PREVIEW_MAX_CHARS: usize = 240;

/// Maximum length of a summary derived by compacting stored document text.
pub const SUMMARY_COMPACT_MAX_CHARS: usize = 800;
