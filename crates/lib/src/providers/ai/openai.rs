use crate::{
    errors::ChatError,
    providers::ai::{AiProvider, ChatMessage, ChatOutcome, ToolDefinition},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize, Debug)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<crate::providers::ai::ToolCall>>,
}

// --- OpenAI Provider implementation ---

/// A provider for interacting with the OpenAI API or any compatible endpoint.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider`.
    ///
    /// `api_url` is the base URL (e.g. `https://api.openai.com/v1`); the
    /// chat completions path is appended per request.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        model: String,
    ) -> Result<Self, ChatError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ChatError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }

    async fn request(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolDefinition]>,
        temperature: f32,
    ) -> Result<OpenAiMessage, ChatError> {
        let request_body = OpenAiRequest {
            model: &self.model,
            messages,
            temperature,
            tools,
            tool_choice: tools.map(|_| "auto"),
        };

        let url = format!("{}/chat/completions", self.api_url.trim_end_matches('/'));
        let mut request_builder = self.client.post(&url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(ChatError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::AiApi(error_text));
        }

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(ChatError::AiDeserialization)?;

        openai_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| ChatError::AiApi("Response contained no choices".to_string()))
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, ChatError> {
        let message = self.request(messages, None, temperature).await?;
        Ok(message.content.unwrap_or_default().trim().to_string())
    }

    async fn complete_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        temperature: f32,
    ) -> Result<ChatOutcome, ChatError> {
        let message = self.request(messages, Some(tools), temperature).await?;
        Ok(ChatOutcome {
            content: message.content.unwrap_or_default().trim().to_string(),
            tool_calls: message.tool_calls.unwrap_or_default(),
        })
    }
}
