//! # Summary Tool Agent
//!
//! A two-round tool-calling protocol for "summarize this title" requests.
//! Round one offers the model a single title-lookup tool. If the model
//! invokes it, the lookup runs locally against the vector store and the
//! result is fed back, with the assistant's tool-call message echoed
//! verbatim, for the model's final answer. The agent never loops beyond two
//! model invocations.

use crate::{
    errors::ChatError,
    prompts::{
        NO_MATCHING_TITLE, SUMMARY_AGENT_SYSTEM, SUMMARY_TOOL_DESCRIPTION, SUMMARY_TOOL_NAME,
        SYSTEM_BASE,
    },
    providers::{
        ai::{AiProvider, ChatMessage, FunctionDefinition, ToolDefinition},
        vector::{lookup_summary, VectorStore},
    },
};
use serde::Deserialize;
use tracing::{debug, warn};

/// The schema-validated argument payload of a summary tool call.
#[derive(Deserialize, Debug)]
struct SummaryToolArgs {
    #[serde(default)]
    title: String,
}

/// Builds the single tool definition offered to the model.
pub fn summary_tool() -> ToolDefinition {
    ToolDefinition {
        kind: "function".to_string(),
        function: FunctionDefinition {
            name: SUMMARY_TOOL_NAME.to_string(),
            description: SUMMARY_TOOL_DESCRIPTION.to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "Exact title or a close variant.",
                    }
                },
                "required": ["title"],
            }),
        },
    }
}

/// Runs the two-round summary agent for a query.
pub async fn run(
    ai_provider: &dyn AiProvider,
    store: &dyn VectorStore,
    query: &str,
) -> Result<String, ChatError> {
    let messages = vec![
        ChatMessage::new("system", SUMMARY_AGENT_SYSTEM),
        ChatMessage::new("user", query),
    ];
    let tools = [summary_tool()];

    // Round one: let the model decide whether to call the tool.
    let first = ai_provider
        .complete_with_tools(&messages, &tools, 0.0)
        .await?;

    // Only the first tool call in a multi-call response is honored.
    let Some(tool_call) = first.tool_calls.first() else {
        debug!("Model proposed no tool call, answering plainly");
        return plain_answer(ai_provider, query).await;
    };

    let title = match serde_json::from_str::<SummaryToolArgs>(&tool_call.function.arguments) {
        Ok(args) => args.title.trim().to_string(),
        Err(e) => {
            warn!("Failed to parse tool arguments, answering plainly: {e}");
            String::new()
        }
    };
    if title.is_empty() {
        return plain_answer(ai_provider, query).await;
    }

    // Local execution. Every outcome degrades to a string; nothing on this
    // path is allowed to escape as an error.
    let summary_text = match lookup_summary(store, &title).await {
        Ok(Some(summary)) => summary,
        Ok(None) => NO_MATCHING_TITLE.to_string(),
        Err(e) => format!("Summary lookup failed: {e}"),
    };

    // Round two: echo the assistant's tool-call message verbatim, then attach
    // the tool result keyed to the original call ID.
    let mut follow_messages = messages;
    follow_messages.push(ChatMessage {
        role: "assistant".to_string(),
        content: first.content.clone(),
        tool_calls: Some(first.tool_calls.clone()),
        tool_call_id: None,
    });
    follow_messages.push(ChatMessage {
        role: "tool".to_string(),
        content: summary_text,
        tool_calls: None,
        tool_call_id: Some(tool_call.id.clone()),
    });

    let second = ai_provider
        .complete_with_tools(&follow_messages, &tools, 0.0)
        .await?;
    Ok(second.content.trim().to_string())
}

/// Answers the query without grounding, for the no-tool and bad-arguments paths.
async fn plain_answer(ai_provider: &dyn AiProvider, query: &str) -> Result<String, ChatError> {
    let messages = [
        ChatMessage::new("system", SYSTEM_BASE),
        ChatMessage::new("user", query),
    ];
    ai_provider.complete(&messages, 0.2).await
}
