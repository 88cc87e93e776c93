//! WebSocket connection handler
//!
//! Handles individual client connections: WebSocket handshake, frame
//! forwarding, and bidirectional communication with the ChatServer.

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info};

use crate::error::AppError;
use crate::message::OutboundFrame;
use crate::server::ServerCommand;
use crate::types::ConnectionId;

/// How the read side of a connection ended
#[derive(Debug)]
enum ReadOutcome {
    /// Close frame, end of stream, or server gone
    Closed,
    /// Transport error
    Failed(String),
}

/// Accept connections forever, spawning a handler per client
pub async fn serve(
    listener: TcpListener,
    cmd_tx: mpsc::Sender<ServerCommand>,
    outbound_buffer: usize,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                info!("New connection from {}", addr);
                let cmd_tx = cmd_tx.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, cmd_tx, outbound_buffer).await {
                        error!("Connection handler error: {}", e);
                    }
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

/// Handle a new TCP connection
///
/// Performs the WebSocket handshake, registers with the ChatServer, and
/// reports exactly one `Close` or `Error` once the connection ends.
pub async fn handle_connection(
    stream: TcpStream,
    cmd_tx: mpsc::Sender<ServerCommand>,
    outbound_buffer: usize,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    debug!("New TCP connection from {}", peer_addr);

    // WebSocket handshake
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let connection_id = ConnectionId::new();
    debug!("Client {} upgraded from {}", connection_id, peer_addr);

    // Channel for hub -> client frames
    let (msg_tx, mut msg_rx) = mpsc::channel::<OutboundFrame>(outbound_buffer);

    if cmd_tx
        .send(ServerCommand::Connect {
            connection_id,
            sender: msg_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to register client {} - server closed", connection_id);
        return Err(AppError::ChannelSend);
    }

    let cmd_tx_read = cmd_tx.clone();

    // Read task (WebSocket -> ServerCommand)
    let mut read_task = tokio::spawn(async move {
        while let Some(msg_result) = ws_receiver.next().await {
            let (data, is_binary) = match msg_result {
                Ok(Message::Text(text)) => (text.as_bytes().to_vec(), false),
                Ok(Message::Binary(data)) => (data.to_vec(), true),
                Ok(Message::Close(_)) => {
                    debug!("Client {} sent close frame", connection_id);
                    return ReadOutcome::Closed;
                }
                Ok(Message::Ping(_)) => {
                    // Pong is handled automatically by tungstenite
                    debug!("Ping from {}", connection_id);
                    continue;
                }
                Ok(Message::Pong(_)) => {
                    debug!("Pong from {}", connection_id);
                    continue;
                }
                Ok(_) => continue,
                Err(e) => {
                    error!("WebSocket error for {}: {}", connection_id, e);
                    return ReadOutcome::Failed(e.to_string());
                }
            };

            let cmd = ServerCommand::Frame {
                connection_id,
                data,
                is_binary,
            };
            if cmd_tx_read.send(cmd).await.is_err() {
                debug!("Server closed, ending read task for {}", connection_id);
                return ReadOutcome::Closed;
            }
        }
        ReadOutcome::Closed
    });

    // Write task (OutboundFrame -> WebSocket)
    let mut write_task = tokio::spawn(async move {
        while let Some(frame) = msg_rx.recv().await {
            match frame.to_ws_message() {
                Ok(msg) => {
                    if ws_sender.send(msg).await.is_err() {
                        debug!("WebSocket send failed, ending write task");
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to serialize message: {}", e);
                }
            }
        }
        debug!("Write task ended for client");

        let _ = ws_sender.close().await;
    });

    let outcome = tokio::select! {
        outcome = &mut read_task => {
            outcome.unwrap_or_else(|e| ReadOutcome::Failed(e.to_string()))
        }
        _ = &mut write_task => {
            debug!("Write task completed for {}", connection_id);
            read_task.abort();
            ReadOutcome::Closed
        }
    };

    // Hub drops its sender on unregister, which ends the write task
    let cmd = match outcome {
        ReadOutcome::Closed => ServerCommand::Close { connection_id },
        ReadOutcome::Failed(reason) => ServerCommand::Error {
            connection_id,
            reason,
        },
    };
    let _ = cmd_tx.send(cmd).await;

    info!("Client {} from {} finished", connection_id, peer_addr);

    Ok(())
}
