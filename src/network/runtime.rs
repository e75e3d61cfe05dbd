// Network runtime - runs the relay WebSocket in a background thread
// Bridges the async socket with the sync game loop via channels

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use super::client::{NetworkCommand, NetworkEvent};
use super::protocol::RelayMessage;

pub const TIMEOUT_MESSAGE: &str = "Connection timed out";

/// Spawn the connection thread. Every outcome, including a failed runtime
/// build, is reported through `event_tx`.
pub fn spawn_network_thread(
    url: String,
    connect_timeout: Duration,
    event_tx: mpsc::Sender<NetworkEvent>,
    cmd_rx: UnboundedReceiver<NetworkCommand>,
) -> std::io::Result<()> {
    thread::Builder::new()
        .name("relay-connection".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime: {}", e);
                    let _ = event_tx.send(NetworkEvent::Error(e.to_string()));
                    return;
                }
            };

            let result = rt.block_on(run_connection(&url, connect_timeout, &event_tx, cmd_rx));

            match result {
                Ok(()) => {
                    let _ = event_tx.send(NetworkEvent::Closed);
                }
                Err(e) => {
                    error!("Relay connection failed: {}", e);
                    let _ = event_tx.send(NetworkEvent::Error(e.to_string()));
                    let _ = event_tx.send(NetworkEvent::Closed);
                }
            }

            debug!("Network thread ending");
        })?;

    Ok(())
}

/// Connect (bounded by `connect_timeout`) and pump frames until either side closes
async fn run_connection(
    url: &str,
    connect_timeout: Duration,
    event_tx: &mpsc::Sender<NetworkEvent>,
    mut cmd_rx: UnboundedReceiver<NetworkCommand>,
) -> Result<()> {
    info!("Connecting to relay: {}", url);

    let (ws_stream, _) = match tokio::time::timeout(connect_timeout, connect_async(url)).await {
        Ok(connected) => connected?,
        Err(_) => return Err(anyhow!(TIMEOUT_MESSAGE)),
    };

    info!("Connected to relay");
    let _ = event_tx.send(NetworkEvent::Opened);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(NetworkCommand::Send(msg)) => {
                    let json = msg.to_json()?;
                    ws_sink.send(Message::Text(json)).await?;
                }
                Some(NetworkCommand::Disconnect) | None => {
                    debug!("Closing relay connection");
                    let _ = ws_sink.send(Message::Close(None)).await;
                    return Ok(());
                }
            },
            frame = ws_stream.next() => match frame {
                Some(Ok(Message::Text(text))) => match RelayMessage::parse(&text) {
                    Ok(msg) => {
                        if event_tx.send(NetworkEvent::Message(msg)).is_err() {
                            // game loop dropped the client
                            return Ok(());
                        }
                    }
                    Err(e) => warn!("Dropping malformed relay message: {} ({})", e, text),
                },
                Some(Ok(Message::Close(frame))) => {
                    debug!("Relay closed the connection: {:?}", frame);
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}
