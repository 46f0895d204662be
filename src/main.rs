//! EmberKV - A Minimal In-Memory Key-Value Server
//!
//! This is the main entry point for the EmberKV server.
//! It sets up logging, the shared store and the TCP listener, then spawns
//! one task per accepted connection.

use clap::Parser;
use emberkv::commands::CommandHandler;
use emberkv::connection::{handle_connection, ConnectionStats};
use emberkv::storage::Store;
use emberkv::Config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::parse();

    // Set up logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("emberkv={}", config.log_level)))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        "Starting EmberKV v{} on {}",
        emberkv::VERSION,
        config.bind_address()
    );

    // Create the store (shared across all connections)
    let store = Arc::new(Store::new());
    let handler =
        CommandHandler::new(Arc::clone(&store)).with_integer_policy(config.integer_policy());
    info!(integer_policy = ?config.integer_policy(), "Store initialized");

    // Create connection statistics
    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping server...");
    };

    // Main accept loop
    tokio::select! {
        _ = accept_loop(listener, handler, Arc::clone(&stats), config.read_buffer_size) => {}
        _ = shutdown => {}
    }

    let store_stats = store.stats();
    info!(
        keys = store_stats.keys,
        gets = store_stats.get_ops,
        sets = store_stats.set_ops,
        connections = stats.connections_accepted.load(std::sync::atomic::Ordering::Relaxed),
        "Server shutdown complete"
    );
    Ok(())
}

/// Main loop that accepts incoming connections
async fn accept_loop(
    listener: TcpListener,
    handler: CommandHandler,
    stats: Arc<ConnectionStats>,
    read_buffer_size: usize,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                // Each connection gets its own handle to the shared store
                let handler = handler.clone();
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats, read_buffer_size).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
