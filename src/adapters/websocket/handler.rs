//! WebSocket upgrade handler for real-time negotiation connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Authenticate the handshake (`auth_middleware` + `RequireAuth`)
//! 2. Upgrade to WebSocket
//! 3. Register with the gateway
//! 4. Send/receive messages until disconnect
//! 5. Clean up room membership

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    middleware,
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};

use crate::adapters::http::middleware::{auth_middleware, AuthState, RequireAuth};
use crate::domain::foundation::AuthenticatedUser;

use super::gateway::Gateway;
use super::messages::ServerMessage;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub gateway: Arc<Gateway>,
}

impl WebSocketState {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

/// Router exposing `GET /ws`.
///
/// Connections without a valid credential are refused with 401 before the
/// upgrade.
pub fn websocket_router(state: WebSocketState, validator: AuthState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
        .layer(middleware::from_fn_with_state(validator, auth_middleware))
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws?token=<token>`
pub async fn ws_handler(
    RequireAuth(user): RequireAuth,
    State(state): State<WebSocketState>,
    ws: WebSocketUpgrade,
) -> Response {
    tracing::debug!(user_id = %user.id, "Upgrading WebSocket connection");
    ws.on_upgrade(move |socket| handle_socket(socket, user, state.gateway))
}

/// Handle an established WebSocket connection.
///
/// Frames from one connection are dispatched one at a time, in arrival order.
async fn handle_socket(socket: WebSocket, user: AuthenticatedUser, gateway: Arc<Gateway>) {
    let (mut sender, mut receiver) = socket.split();
    let (connection, mut outbound) = gateway.connect(user).await;

    // Forward queued messages to the client
    let mut send_task = {
        let client_id = connection.id;
        tokio::spawn(async move {
            while let Some(message) = outbound.recv().await {
                if let Err(e) = send_message(&mut sender, &message).await {
                    tracing::debug!(client_id = %client_id, "Send error, closing connection: {}", e);
                    break;
                }
            }
        })
    };

    // Handle incoming frames
    let mut recv_task = {
        let gateway = gateway.clone();
        let connection = connection.clone();
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        // Awaited to keep one connection's frames in order.
                        if let Err(e) = gateway.spawn_text(&connection, text).await {
                            tracing::error!(client_id = %connection.id, "Command task failed: {}", e);
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(
                            client_id = %connection.id,
                            "Received unsupported binary message"
                        );
                    }
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                        // Protocol-level keepalive, answered by axum
                    }
                    Ok(Message::Close(_)) => {
                        tracing::debug!(client_id = %connection.id, "Client sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(client_id = %connection.id, "Receive error: {}", e);
                        break;
                    }
                }
            }
        })
    };

    // Aborting the reader never cancels a command in flight; each one
    // runs on its own task.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    gateway.disconnect(&connection).await;
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    match message.to_json() {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::error!(event = message.event_name(), "Failed to serialize message: {}", e);
            Ok(())
        }
    }
}
