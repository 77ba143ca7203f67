//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the
//! logic for building it at startup. Both gateways are constructed exactly
//! once here and injected into the components that need them; no part of the
//! application reaches for process-wide globals.

use crate::config::AppConfig;
use bookrag::{
    providers::{
        ai::{EmbeddingClient, OpenAiProvider},
        vector::{ChromaStore, VectorStore},
    },
    ChatClient, ChatClientBuilder,
};
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from the environment.
    pub config: Arc<AppConfig>,
    /// The routing chat client owning both gateway instances.
    pub chat_client: Arc<ChatClient>,
    /// A handle to the vector store for the readiness check.
    pub vector_store: Box<dyn VectorStore>,
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider = OpenAiProvider::new(
        config.openai_api_url.clone(),
        Some(config.openai_api_key.clone()),
        config.openai_model.clone(),
    )?;

    let embedder = EmbeddingClient::new(
        config.openai_api_url.clone(),
        Some(config.openai_api_key.clone()),
        config.openai_embedding_model.clone(),
    )?;
    let vector_store = ChromaStore::new(
        &config.chroma_host,
        config.chroma_port,
        config.chroma_collection.clone(),
        embedder,
    )?;

    let chat_client = ChatClientBuilder::new()
        .ai_provider(Box::new(ai_provider))
        .vector_store(Box::new(vector_store.clone()))
        .build()?;

    Ok(AppState {
        config: Arc::new(config),
        chat_client: Arc::new(chat_client),
        vector_store: Box::new(vector_store),
    })
}
