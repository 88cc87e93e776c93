//! Room Chat Server - Entry Point
//!
//! Starts the TCP listener and ChatServer actor, accepting connections
//! until Ctrl-C.

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use room_chat::{serve, ChatServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=room_chat=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("room_chat=info")),
        )
        .init();

    let config = ServerConfig::from_env();

    let listener = TcpListener::bind(&config.addr).await?;
    info!("WebSocket Chat Server listening on {}", config.addr);

    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
    let server = tokio::spawn(ChatServer::new(cmd_rx).run());

    info!("ChatServer actor started");

    tokio::select! {
        _ = serve(listener, cmd_tx, config.outbound_buffer) => {}
        result = tokio::signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => error!("Failed to listen for shutdown signal: {}", e),
            }
        }
    }

    // Live handlers still hold command senders, so stop the actor directly
    server.abort();
    info!("Server stopped");

    Ok(())
}
