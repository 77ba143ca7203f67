//! # Application Configuration
//!
//! This module defines the configuration for the `bookrag-server` and the
//! logic for loading it from environment variables. Every recognized option
//! has a default except the OpenAI API key, whose absence is a startup-fatal
//! condition.

use config::{Config as ConfigBuilder, Environment};
use serde::Deserialize;
use thiserror::Error;

/// A custom error type for configuration issues.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    General(#[from] config::ConfigError),
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

/// The resolved server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Vector store host. Loaded from `CHROMA_HOST`.
    #[serde(default = "default_chroma_host")]
    pub chroma_host: String,
    /// Vector store port. Loaded from `CHROMA_PORT`.
    #[serde(default = "default_chroma_port")]
    pub chroma_port: u16,
    /// Name of the vector collection. Loaded from `CHROMA_COLLECTION`.
    #[serde(default = "default_chroma_collection")]
    pub chroma_collection: String,
    /// Base URL of the OpenAI-compatible API. Loaded from `OPENAI_API_URL`.
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,
    /// API key for the OpenAI-compatible API. Loaded from `OPENAI_API_KEY`.
    #[serde(default)]
    pub openai_api_key: String,
    /// Chat model identifier. Loaded from `OPENAI_MODEL`.
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Embedding model identifier. Loaded from `OPENAI_EMBEDDING_MODEL`.
    #[serde(default = "default_openai_embedding_model")]
    pub openai_embedding_model: String,
}

fn default_port() -> u16 {
    8080
}
fn default_chroma_host() -> String {
    "127.0.0.1".to_string()
}
fn default_chroma_port() -> u16 {
    8000
}
fn default_chroma_collection() -> String {
    "books".to_string()
}
fn default_openai_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_openai_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

/// Loads the application configuration from environment variables.
pub fn get_config() -> Result<AppConfig, ConfigError> {
    let settings = ConfigBuilder::builder()
        .add_source(Environment::default())
        .build()?;
    let app_config: AppConfig = settings.try_deserialize()?;

    if app_config.openai_api_key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }

    Ok(app_config)
}
