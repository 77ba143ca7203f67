pub mod embedding;
pub mod openai;

use crate::errors::ChatError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::EmbeddingClient;
pub use openai::OpenAiProvider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// A single message in a chat conversation, in the OpenAI-compatible wire shape.
///
/// The optional `tool_calls` and `tool_call_id` fields exist so that an assistant
/// message proposing a tool invocation can be echoed back verbatim in a follow-up
/// request, which the protocol requires before a `tool` role message is accepted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Convenience constructor for a plain message with no tool fields.
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

/// A tool invocation proposed by the model.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

/// The function half of a tool call: the name and a JSON-encoded argument string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// A function offered to the model, described with a JSON schema.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// The result of a chat completion that had tools on offer.
///
/// `tool_calls` is empty when the model chose to answer directly.
#[derive(Debug, Clone, Default)]
pub struct ChatOutcome {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

/// A trait for interacting with an AI provider.
///
/// This defines a common interface for chat completion against different
/// hosted or local language models.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a plain text response for the given conversation.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, ChatError>;

    /// Generates a response while offering the model a set of callable tools.
    ///
    /// The model may answer directly or propose one or more tool invocations;
    /// both are captured in the returned `ChatOutcome`.
    async fn complete_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        temperature: f32,
    ) -> Result<ChatOutcome, ChatError>;
}

dyn_clone::clone_trait_object!(AiProvider);
