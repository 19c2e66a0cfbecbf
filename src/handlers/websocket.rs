use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{error, info, warn};
use tokio::sync::mpsc;
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

use crate::core::gateway::SharedVoiceServer;
use crate::core::message::ClientMessage;
use crate::error::VoiceRelayError;

// Handle a WebSocket connection on the voice namespace
pub async fn handle_ws_client(
    ws: WebSocket,
    server: SharedVoiceServer,
    raw_token: Option<String>,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Spawn a task to forward messages from our channel to the WebSocket
    tokio::task::spawn(async move {
        let mut rx = rx;
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
    });

    // Generate a unique connection ID
    let connection_id = Uuid::new_v4().to_string();

    // Authentication happens exactly once, before registration; failure
    // closes the transport and the connection never becomes visible.
    let user_id = match server.authenticate(raw_token.as_deref()) {
        Ok(user_id) => user_id,
        Err(e) => {
            warn!("Client connection rejected ({}): {}", connection_id, e);
            // Dropping tx ends the forward task, which closes the socket
            return;
        }
    };

    server
        .register_connection(&connection_id, &user_id, tx)
        .await;

    info!(
        "Client connected: {} (userId={})",
        connection_id, user_id
    );
    info!("Current connections: {}", server.connection_count().await);

    // Handle incoming messages, strictly in order per connection
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                // Only process text messages
                if msg.is_text() {
                    process_message(msg, &connection_id, &server).await;
                }
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    // Client disconnected: one pass removes presence everywhere,
    // broadcasts departures, then drops the identity mapping
    server.disconnect(&connection_id).await;
    info!("Client disconnected: {}", connection_id);
}

// Process an incoming WebSocket message
async fn process_message(msg: Message, connection_id: &str, server: &SharedVoiceServer) {
    let msg_str = match msg.to_str() {
        Ok(s) => s,
        Err(_) => {
            warn!("Failed to extract text from message");
            return;
        }
    };

    let client_msg = match serde_json::from_str::<ClientMessage>(msg_str) {
        Ok(m) => m,
        Err(e) => {
            warn!("Failed to parse message from {}: {}", connection_id, e);
            server
                .send_error(
                    connection_id,
                    &VoiceRelayError::MessageParseError(e.to_string()),
                )
                .await;
            return;
        }
    };

    let outcome = match client_msg {
        ClientMessage::JoinChannel { channel_id } => {
            server.join_channel(connection_id, &channel_id).await
        }
        ClientMessage::LeaveChannel { channel_id } => {
            server.leave_channel(connection_id, &channel_id).await;
            Ok(())
        }
        ClientMessage::Signal {
            target_connection_id,
            kind,
            data,
        } => {
            server
                .signal(connection_id, &target_connection_id, kind, data)
                .await
        }
    };

    // Rejections surface to the requester only; the connection and its
    // other state are untouched
    if let Err(e) = outcome {
        warn!("Request from {} rejected: {}", connection_id, e);
        server.send_error(connection_id, &e).await;
    }
}
