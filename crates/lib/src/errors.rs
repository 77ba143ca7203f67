use thiserror::Error;

/// Custom error types for the library.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Request to AI provider failed: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("Request to vector store failed: {0}")]
    StoreRequest(reqwest::Error),
    #[error("Failed to deserialize vector store response: {0}")]
    StoreDeserialization(reqwest::Error),
    #[error("Vector store returned an error: {0}")]
    StoreApi(String),
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
    #[error("No AI provider configured")]
    MissingAiProvider,
    #[error("No vector store configured")]
    MissingVectorStore,
}
