//! RAG Server binary
//!
//! Run with: cargo run -p guardrail-rag --bin guardrail-rag-server -- --config rag.toml

use clap::Parser;
use std::path::PathBuf;

use guardrail_rag::{
    config::{RagConfig, VectorStoreKind},
    server::RagServer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "guardrail-rag-server", version, about = "Guard-railed RAG HTTP server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "RAG_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Keep vectors in process memory instead of Pinecone
    #[arg(long)]
    memory_store: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.memory_store {
        config.vector_store.provider = VectorStoreKind::Memory;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.openai.embedding_model);
    tracing::info!("  - Embedding dimensions: {}", config.openai.embedding_dimensions);
    tracing::info!("  - Chat model: {}", config.openai.chat_model);
    tracing::info!(
        "  - Chunk size: {} (overlap {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!(
        "  - Defaults: max_results {}, similarity_threshold {}",
        config.guard_rails.default_max_results,
        config.guard_rails.default_similarity_threshold
    );

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/documents/upload             - Upload a document");
    println!("  POST   /api/documents/query              - Ask a question");
    println!("  GET    /api/documents/vectors/stats      - Index statistics");
    println!("  DELETE /api/documents/vectors/delete-all - Wipe the index");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
