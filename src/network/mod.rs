// Relay networking for Headball
// Connection to a relay room, message passing, and the wire protocol

pub mod client;
pub mod protocol;
pub mod runtime;

pub use client::{ConnectionStatus, NetworkClient, NetworkEvent};
pub use protocol::{GameStatePayload, InputPayload, RelayMessage};

use std::io;
use std::sync::mpsc;
use std::time::Duration;

/// Open a connection to `room_code` on the relay at `relay_url`.
/// Returns immediately; progress arrives as `NetworkEvent`s.
pub fn start_network(
    relay_url: &str,
    room_code: &str,
    connect_timeout: Duration,
) -> io::Result<NetworkClient> {
    let (event_tx, event_rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = tokio::sync::mpsc::unbounded_channel();

    let url = protocol::room_url(relay_url, room_code);
    runtime::spawn_network_thread(url, connect_timeout, event_tx, cmd_rx)?;

    Ok(NetworkClient::new(cmd_tx, event_rx, room_code.to_string()))
}
