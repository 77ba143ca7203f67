//! # bookrag-cli: Catalog Ingestion
//!
//! The offline batch job that loads a book catalog CSV into the vector
//! collection. Safe to rerun: the pipeline skips a populated collection
//! unless `--force` is given, and stored item IDs are content-addressed so a
//! forced rerun upserts rather than duplicates.

use anyhow::{bail, Result};
use bookrag::{
    ingest::{books::read_books, ingest_records},
    providers::{
        ai::EmbeddingClient,
        vector::{ChromaStore, VectorStore},
    },
};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the catalog CSV (Title, Authors, Description, Category)
    #[arg(long, env = "CSV_PATH")]
    input: PathBuf,

    /// Number of records per upsert batch
    #[arg(long, env = "INGEST_BATCH_SIZE", default_value_t = 128)]
    batch_size: usize,

    /// Drop and recreate the collection before ingesting
    #[arg(long, env = "FORCE_REINGEST")]
    force: bool,

    /// Vector store host
    #[arg(long, env = "CHROMA_HOST", default_value = "127.0.0.1")]
    chroma_host: String,

    /// Vector store port
    #[arg(long, env = "CHROMA_PORT", default_value_t = 8000)]
    chroma_port: u16,

    /// Name of the vector collection
    #[arg(long, env = "CHROMA_COLLECTION", default_value = "books")]
    collection: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_API_URL", default_value = "https://api.openai.com/v1")]
    openai_api_url: String,

    /// Embedding model identifier
    #[arg(long, env = "OPENAI_EMBEDDING_MODEL", default_value = "text-embedding-3-small")]
    embedding_model: String,
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
        bail!("OPENAI_API_KEY is not set.");
    };
    if api_key.is_empty() {
        bail!("OPENAI_API_KEY is not set.");
    }

    info!(
        host = %cli.chroma_host,
        port = cli.chroma_port,
        collection = %cli.collection,
        "Connecting to Chroma"
    );
    let embedder = EmbeddingClient::new(
        cli.openai_api_url.clone(),
        Some(api_key),
        cli.embedding_model.clone(),
    )?;
    let store = ChromaStore::new(
        &cli.chroma_host,
        cli.chroma_port,
        cli.collection.clone(),
        embedder,
    )?;

    info!(input = %cli.input.display(), "Starting ingestion from CSV");
    let records = read_books(&cli.input)?;
    let report = ingest_records(&store, records, cli.batch_size, cli.force).await?;

    let count = store.count().await?;
    info!(
        added = report.added,
        skipped_duplicates = report.skipped_duplicates,
        collection_count = count,
        "Ingestion finished"
    );
    println!(
        "Ingestion finished: {} added, {} duplicates skipped, collection now holds {} items.",
        report.added, report.skipped_duplicates, count
    );

    Ok(())
}
