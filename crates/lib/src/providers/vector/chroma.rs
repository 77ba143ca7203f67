//! # Chroma Vector Store
//!
//! An HTTP client for a remote Chroma collection. Embeddings are generated
//! client-side through an [`EmbeddingClient`] because the Chroma HTTP API
//! exchanges raw vectors, not text.

use crate::{
    errors::ChatError,
    providers::{
        ai::EmbeddingClient,
        vector::{RetrievedDocument, VectorStore},
    },
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

// --- Chroma request and response structures ---

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    metadata: Value,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<Vec<f32>>,
    n_results: usize,
    include: &'a [&'a str],
}

/// Chroma nests query results one level deeper than get results: one inner
/// list per query embedding.
#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Vec<Vec<Option<String>>>,
    #[serde(default)]
    metadatas: Vec<Vec<Option<Map<String, Value>>>>,
}

#[derive(Serialize)]
struct GetRequest<'a> {
    #[serde(rename = "where")]
    filter: Value,
    include: &'a [&'a str],
}

#[derive(Deserialize)]
struct GetResponse {
    #[serde(default)]
    ids: Vec<String>,
    #[serde(default)]
    documents: Vec<Option<String>>,
    #[serde(default)]
    metadatas: Vec<Option<Map<String, Value>>>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    ids: &'a [String],
    embeddings: Vec<Vec<f32>>,
    documents: &'a [String],
    metadatas: &'a [Map<String, Value>],
}

// --- Chroma Store implementation ---

/// A `VectorStore` backed by a remote Chroma collection.
#[derive(Clone)]
pub struct ChromaStore {
    client: ReqwestClient,
    base_url: String,
    collection_name: String,
    embedder: EmbeddingClient,
    /// The collection ID, resolved once and shared across clones so concurrent
    /// first use performs a single acquisition. Cleared when the collection is
    /// dropped so the next call re-creates it.
    collection_id: Arc<Mutex<Option<String>>>,
}

impl Debug for ChromaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromaStore")
            .field("base_url", &self.base_url)
            .field("collection_name", &self.collection_name)
            .finish_non_exhaustive()
    }
}

impl ChromaStore {
    /// Creates a new `ChromaStore` for the collection at `host:port`.
    pub fn new(
        host: &str,
        port: u16,
        collection_name: String,
        embedder: EmbeddingClient,
    ) -> Result<Self, ChatError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ChatError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            base_url: format!("http://{host}:{port}/api/v1"),
            collection_name,
            embedder,
            collection_id: Arc::new(Mutex::new(None)),
        })
    }

    /// Resolves the collection ID, creating the collection on first use.
    async fn collection_id(&self) -> Result<String, ChatError> {
        let mut guard = self.collection_id.lock().await;
        if let Some(id) = guard.as_ref() {
            return Ok(id.clone());
        }

        let request_body = CreateCollectionRequest {
            name: &self.collection_name,
            metadata: serde_json::json!({ "hnsw:space": "cosine" }),
            get_or_create: true,
        };
        let response = self
            .client
            .post(format!("{}/collections", self.base_url))
            .json(&request_body)
            .send()
            .await
            .map_err(ChatError::StoreRequest)?;
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::StoreApi(error_text));
        }
        let collection: CollectionResponse = response
            .json()
            .await
            .map_err(ChatError::StoreDeserialization)?;
        info!(
            collection = %self.collection_name,
            id = %collection.id,
            "Connected to Chroma collection"
        );
        *guard = Some(collection.id.clone());
        Ok(collection.id)
    }

    async fn post_to_collection<B: Serialize>(
        &self,
        operation: &str,
        body: &B,
    ) -> Result<reqwest::Response, ChatError> {
        let collection_id = self.collection_id().await?;
        let url = format!("{}/collections/{collection_id}/{operation}", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(ChatError::StoreRequest)?;
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::StoreApi(error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl VectorStore for ChromaStore {
    async fn query_by_text(
        &self,
        text: &str,
        n_results: usize,
    ) -> Result<Vec<RetrievedDocument>, ChatError> {
        let query_vector = self.embedder.embed_one(text).await?;
        let request_body = QueryRequest {
            query_embeddings: vec![query_vector],
            n_results,
            include: &["documents", "metadatas"],
        };
        let response = self.post_to_collection("query", &request_body).await?;
        let results: QueryResponse = response
            .json()
            .await
            .map_err(ChatError::StoreDeserialization)?;

        let ids = results.ids.into_iter().next().unwrap_or_default();
        let mut documents = results
            .documents
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter();
        let mut metadatas = results
            .metadatas
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter();

        Ok(ids
            .into_iter()
            .map(|id| RetrievedDocument {
                id,
                document: documents.next().flatten().unwrap_or_default(),
                metadata: metadatas.next().flatten().unwrap_or_default(),
            })
            .collect())
    }

    async fn get_by_metadata(&self, filter: Value) -> Result<Vec<RetrievedDocument>, ChatError> {
        let request_body = GetRequest {
            filter,
            include: &["documents", "metadatas"],
        };
        let response = self.post_to_collection("get", &request_body).await?;
        let results: GetResponse = response
            .json()
            .await
            .map_err(ChatError::StoreDeserialization)?;

        let mut documents = results.documents.into_iter();
        let mut metadatas = results.metadatas.into_iter();
        Ok(results
            .ids
            .into_iter()
            .map(|id| RetrievedDocument {
                id,
                document: documents.next().flatten().unwrap_or_default(),
                metadata: metadatas.next().flatten().unwrap_or_default(),
            })
            .collect())
    }

    async fn upsert(
        &self,
        ids: &[String],
        documents: &[String],
        metadatas: &[Map<String, Value>],
    ) -> Result<(), ChatError> {
        let embeddings = self.embedder.embed(documents).await?;
        let request_body = UpsertRequest {
            ids,
            embeddings,
            documents,
            metadatas,
        };
        self.post_to_collection("upsert", &request_body).await?;
        Ok(())
    }

    async fn count(&self) -> Result<usize, ChatError> {
        let collection_id = self.collection_id().await?;
        let url = format!("{}/collections/{collection_id}/count", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ChatError::StoreRequest)?;
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::StoreApi(error_text));
        }
        response.json().await.map_err(ChatError::StoreDeserialization)
    }

    async fn delete_collection(&self) -> Result<(), ChatError> {
        let url = format!("{}/collections/{}", self.base_url, self.collection_name);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(ChatError::StoreRequest)?;
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::StoreApi(error_text));
        }
        // Forget the resolved ID so the next operation re-creates the collection.
        *self.collection_id.lock().await = None;
        Ok(())
    }
}
