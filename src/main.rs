//! # Ansimbot — 안심 거래/이상거래 탐지 문의 챗봇
//!
//! Loads the `text,intent` FAQ corpus, builds the character n-gram TF-IDF
//! index, and serves the streaming chat gateway backed by an
//! OpenAI-compatible local model.
//!
//! Usage:
//!   ansimbot                             # Serve with defaults (port 5001)
//!   ansimbot --corpus ./fds_docs.csv     # Explicit corpus path
//!   ansimbot --port 8080 --verbose

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ansimbot_core::config::AnsimConfig;
use ansimbot_engine::{Engine, FileSink};
use ansimbot_relay::OpenAiCompatibleRelay;
use ansimbot_retrieval::{corpus, KoreanParticleFocus, LexicalIndex};

#[derive(Parser)]
#[command(
    name = "ansimbot",
    version,
    about = "🛡️ Ansimbot — streaming RAG chatbot for safe-trade and fraud-detection FAQ"
)]
struct Cli {
    /// Config file path (default: ~/.ansimbot/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Corpus CSV path (overrides config)
    #[arg(long)]
    corpus: Option<String>,

    /// Gateway port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "ansimbot=debug,tower_http=debug"
    } else {
        "ansimbot=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let mut c = AnsimConfig::load_from(std::path::Path::new(path))?;
            c.apply_env_overrides();
            c
        }
        None => AnsimConfig::load()?,
    };
    if let Some(corpus_path) = cli.corpus {
        config.corpus_path = corpus_path;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }

    // Corpus failure degrades the server instead of killing it; /chat
    // answers with the knowledge-base error until the CSV is fixed.
    let engine = match build_engine(&config) {
        Ok(engine) => {
            tracing::info!(
                "📚 Knowledge base ready: {} documents from {}",
                engine.document_count(),
                config.corpus_path
            );
            Some(Arc::new(engine))
        }
        Err(e) => {
            tracing::warn!("⚠️ Knowledge base initialization failed: {e}");
            None
        }
    };

    println!("🛡️ Ansimbot starting");
    println!("   Model:    {}", config.model);
    println!("   Endpoint: {}", config.endpoints.join(", "));
    println!("   Gateway:  http://{}:{}", config.gateway.host, config.gateway.port);

    ansimbot_gateway::start(&config, engine).await
}

fn build_engine(config: &AnsimConfig) -> ansimbot_core::Result<Engine> {
    let documents = corpus::load_documents(std::path::Path::new(&config.corpus_path))?;
    let index = Arc::new(LexicalIndex::build(documents)?);
    Ok(Engine::new(
        index,
        Box::new(OpenAiCompatibleRelay::new(config)),
        Arc::new(FileSink::new(&config.unanswered_path)),
        Box::new(KoreanParticleFocus),
        &config.retrieval,
    ))
}
