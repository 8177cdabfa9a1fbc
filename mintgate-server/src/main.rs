//! Minting service HTTP server.
//!
//! # Usage
//!
//! ```bash
//! # Run with default config (config.toml in current directory)
//! cargo run -p mintgate-server --release
//!
//! # Run with custom config path
//! CONFIG=/path/to/config.toml cargo run -p mintgate-server
//!
//! # Configure logging level
//! RUST_LOG=info cargo run -p mintgate-server
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` — Path to TOML configuration file (default: `config.toml`)
//! - `HOST` — Override bind address (default: `0.0.0.0`)
//! - `PORT` — Override port (default: `5175`)
//! - `RPC_URL` — Override ledger RPC endpoint (default: devnet)
//! - `RUST_LOG` — Log level filter (default: `info`)

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::http::Method;
use mintgate_svm::custodial::load_treasury_keypair;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use tower_http::cors;
use tracing_subscriber::EnvFilter;

use mintgate_server::config::ServerConfig;
use mintgate_server::handlers::{AppState, mint_router};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::load()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        rpc_url = %config.rpc_url,
        custodial = config.custodial.enabled,
        "Loaded configuration"
    );

    let treasury = if config.custodial.enabled {
        let path = config
            .custodial
            .keypair_path
            .as_deref()
            .ok_or("custodial.enabled requires custodial.keypair_path")?;
        let keypair = load_treasury_keypair(Path::new(path))?;
        tracing::info!("Custodial minting enabled");
        Some(keypair)
    } else {
        None
    };

    let rpc = RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed());
    let state = Arc::new(AppState {
        rpc: Arc::new(rpc),
        ipfs_gateway: config.ipfs_gateway.clone(),
        treasury,
    });

    let app = mint_router(state).layer(
        cors::CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(cors::Any),
    );

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Minting service listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

/// Waits for Ctrl-C or SIGTERM (Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down..."),
            _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down..."),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to listen for Ctrl-C");
        tracing::info!("Received Ctrl-C, shutting down...");
    }
}
