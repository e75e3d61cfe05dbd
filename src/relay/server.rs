// Relay HTTP/WebSocket server
// GET /health and GET /v1/room/:code (WebSocket upgrade)

use std::sync::atomic::{AtomicU64, Ordering};

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::room::{ConnectionId, JoinOutcome, Outbound, RoomRegistry};
use crate::network::protocol::{is_valid_room_code, RelayMessage};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

pub fn router(registry: RoomRegistry) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/v1/room/:code", get(room_handler))
        .with_state(registry)
}

/// Serve until the listener fails
pub async fn serve(listener: TcpListener, registry: RoomRegistry) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Relay listening on {}", addr);
    }
    axum::serve(listener, router(registry)).await
}

async fn room_handler(
    ws: WebSocketUpgrade,
    Path(code): Path<String>,
    State(registry): State<RoomRegistry>,
) -> Response {
    if !is_valid_room_code(&code) {
        return (StatusCode::BAD_REQUEST, "Room code must be 6 letters or digits").into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, code, registry))
}

async fn handle_socket(socket: WebSocket, code: String, registry: RoomRegistry) {
    let id: ConnectionId = NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Writer task: everything destined for this client goes through `tx`
    let send_task = tokio::spawn(async move {
        while let Some(out) = rx.recv().await {
            match out {
                Outbound::Text(text) => {
                    if ws_sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = ws_sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    if registry.join(&code, id, tx).await == JoinOutcome::Full {
        // the writer flushes ERROR and the close frame, then exits
        let _ = send_task.await;
        return;
    }

    while let Some(frame) = ws_receiver.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Connection {} read error: {}", id, e);
                break;
            }
        };

        match frame {
            Message::Text(text) => match RelayMessage::parse(&text) {
                Ok(msg) => {
                    registry.forward(&code, id, &msg).await;
                }
                Err(e) => warn!("Dropping malformed message from {}: {}", id, e),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    registry.leave(&code, id).await;
    send_task.abort();
}
