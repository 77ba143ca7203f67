//! # Embeddings Provider
//!
//! This module provides functionality for generating vector embeddings by calling
//! an external, OpenAI-compatible embeddings API. The vector store gateway uses
//! these vectors for both document upserts and similarity queries; the vectors
//! themselves are opaque to the rest of the system.

use crate::errors::ChatError;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use tracing::debug;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// A client for an OpenAI-compatible embeddings endpoint.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl Debug for EmbeddingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl EmbeddingClient {
    /// Creates a new `EmbeddingClient`.
    ///
    /// `api_url` is the base URL (e.g. `https://api.openai.com/v1`); the
    /// embeddings path is appended per request.
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

    /// Generates one vector per input text, in input order.
    pub async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, ChatError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: inputs,
        };
        debug!(
            count = inputs.len(),
            model = %self.model,
            "--> Sending request to embeddings API"
        );

        let url = format!("{}/embeddings", self.api_url.trim_end_matches('/'));
        let mut request_builder = self.client.post(&url).json(&request_body);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder.send().await.map_err(ChatError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::AiApi(error_text));
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(ChatError::AiDeserialization)?;

        if embedding_response.data.len() != inputs.len() {
            return Err(ChatError::AiApi(format!(
                "Embeddings API returned {} vectors for {} inputs",
                embedding_response.data.len(),
                inputs.len()
            )));
        }

        Ok(embedding_response
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect())
    }

    /// Generates a single embedding vector for one text.
    pub async fn embed_one(&self, input: &str) -> Result<Vec<f32>, ChatError> {
        let inputs = [input.to_string()];
        let mut vectors = self.embed(&inputs).await?;
        vectors
            .pop()
            .ok_or_else(|| ChatError::AiApi("Embeddings API returned no vectors".to_string()))
    }
}
