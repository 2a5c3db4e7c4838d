//! PDF Merger Web - Web server for merging uploaded PDF documents.

mod helpers;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use pdf_merger_core::ServerConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "pdf-merger-web")]
#[command(author, version, about = "PDF Merger Web Server", long_about = None)]
struct Args {
    /// Host to bind to (overrides config file)
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum upload size in megabytes (overrides config file)
    #[arg(long)]
    max_upload_mb: Option<usize>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},lopdf=warn")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        ServerConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        ServerConfig::load()
    };

    // Override config with CLI arguments
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(max_upload_mb) = args.max_upload_mb {
        config.max_upload_mb = max_upload_mb;
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid bind address")?;

    let app = routes::router(Arc::new(AppState::new(config)));

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
