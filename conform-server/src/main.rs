//! Conform Server — schema-guided constrained decoding over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use conform_server::api::generate::{self, AppState};
use conform_server::tokenizer::ConformTokenizer;
use conform_server::upstream::UpstreamGateway;

#[derive(Parser)]
#[command(name = "conform-server", about = "Schema-guided constrained decoding server")]
struct Cli {
    /// Base URL of the upstream OpenAI-compatible inference server
    #[arg(long)]
    upstream_url: String,

    /// Model name passed through to the upstream server
    #[arg(long, default_value = "default")]
    model: String,

    /// Path to the tokenizer.json matching the upstream model
    #[arg(long)]
    tokenizer_path: PathBuf,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Token budget for the direct (unconstrained) first attempt
    #[arg(long, default_value = "256")]
    max_tokens: usize,

    /// Default sampling temperature for constrained generation
    #[arg(long, default_value = "1.0")]
    temperature: f32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let tokenizer = Arc::new(ConformTokenizer::from_file(&cli.tokenizer_path)?);
    info!("Tokenizer loaded from {}", cli.tokenizer_path.display());

    let gateway = Arc::new(UpstreamGateway::new(
        &cli.upstream_url,
        &cli.model,
        tokenizer.clone(),
    ));
    info!("Upstream gateway: {} (model '{}')", cli.upstream_url, cli.model);

    let state = Arc::new(AppState {
        gateway,
        tokenizer,
        max_tokens: cli.max_tokens,
        temperature: cli.temperature,
    });

    let app = Router::new()
        .route("/v1/generate", post(generate::generate))
        .route("/conform/v1/health", get(generate::health))
        .with_state(state);

    let addr = format!("0.0.0.0:{}", cli.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Conform serving on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
