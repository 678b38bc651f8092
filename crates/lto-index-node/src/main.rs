//! LTO Indexer — entry point.
//!
//! Wires storage, the node client, and the indexing core together, then
//! serves the read API until shutdown.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use lto_index_core::IndexerConfig;
use lto_index_identity::{IdentityResolver, VerificationMethodService};
use lto_index_node::api::{self, AppState};
use lto_index_node::{HttpNodeClient, TxDispatcher};
use lto_index_storage::{RocksDbDriver, Storage};
use lto_index_trust::{AssociationIndexer, TrustNetwork};

/// LTO Indexer
#[derive(Parser, Debug)]
#[command(name = "lto-indexer", version, about = "LTO DID and trust-network indexer")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "indexer.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init {
        let config = IndexerConfig::default();
        config.save(&args.config)?;
        println!("wrote default config to {}", args.config.display());
        return Ok(());
    }

    let mut config = IndexerConfig::load(&args.config)?;
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(ref data_dir) = args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    tracing::info!("LTO Indexer v{}", env!("CARGO_PKG_VERSION"));

    let storage = Arc::new(Storage::new(Arc::new(RocksDbDriver::new(
        &config.storage.data_dir,
    ))));
    let node_client = Arc::new(HttpNodeClient::new(config.node.url.clone()));

    let trust = Arc::new(TrustNetwork::new(
        storage.clone(),
        node_client,
        config.trust.clone(),
    ));
    let associations = Arc::new(AssociationIndexer::new(storage.clone(), trust.clone()));
    let verification_methods = Arc::new(VerificationMethodService::new(storage.clone()));
    let resolver = Arc::new(IdentityResolver::new(storage.clone(), verification_methods));
    let dispatcher = Arc::new(TxDispatcher::new(
        storage.clone(),
        associations.clone(),
        trust.clone(),
        resolver.clone(),
        config.association.index_mode,
    ));

    let state = AppState {
        resolver,
        trust,
        associations,
        dispatcher,
    };

    let listen_addr: SocketAddr =
        format!("{}:{}", config.api.listen_addr, config.api.port).parse()?;
    api::start_api_server(listen_addr, state).await?;

    tracing::info!("shutting down, releasing storage");
    storage.close().await?;
    tracing::info!("indexer exited cleanly");
    Ok(())
}
