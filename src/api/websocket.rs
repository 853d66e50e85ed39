//! Event feed — forwards store change notifications to connected UIs.
//!
//! Reactive bindings subscribe here instead of being handed mutation
//! access: every store change arrives as one tagged JSON message. Incoming
//! client messages are ignored except for close.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

/// `GET /ws/events` — upgrade and stream store events.
pub async fn ws_upgrade(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let mut events = state.subscribe();
    let (mut sink, mut stream) = socket.split();

    tracing::debug!("Event subscriber connected");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize store event");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event subscriber lagged, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            },
        }
    }

    tracing::debug!("Event subscriber disconnected");
}
