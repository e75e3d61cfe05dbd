// Network client interface for the game loop
// Provides channels to communicate with the relay connection thread

use std::io;
use std::sync::mpsc;

use tokio::sync::mpsc::UnboundedSender;

use super::protocol::RelayMessage;

/// Lifecycle of the relay connection as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Open,
    /// Normal close (either side hung up)
    Closed,
    /// Connect failure or timeout, distinct from a normal close
    Error(String),
}

/// Commands the game loop sends to the network thread
#[derive(Debug)]
pub enum NetworkCommand {
    Send(RelayMessage),
    Disconnect,
}

/// Events the network thread sends to the game loop
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    /// WebSocket handshake completed
    Opened,

    Message(RelayMessage),

    /// Socket closed, by us or the relay
    Closed,

    Error(String),
}

/// Handle for the game loop to talk to the relay.
/// The socket itself lives on a background thread with its own tokio runtime.
pub struct NetworkClient {
    /// Send commands TO the network thread
    tx: UnboundedSender<NetworkCommand>,

    /// Receive events FROM the network thread
    rx: mpsc::Receiver<NetworkEvent>,

    status: ConnectionStatus,
    room_code: String,
}

impl NetworkClient {
    pub fn new(
        tx: UnboundedSender<NetworkCommand>,
        rx: mpsc::Receiver<NetworkEvent>,
        room_code: String,
    ) -> Self {
        Self {
            tx,
            rx,
            status: ConnectionStatus::Connecting,
            room_code,
        }
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn room_code(&self) -> &str {
        &self.room_code
    }

    pub fn send(&self, msg: RelayMessage) -> io::Result<()> {
        self.tx
            .send(NetworkCommand::Send(msg))
            .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e.to_string()))
    }

    /// Non-blocking receive; keeps `status` in step with the events
    pub fn try_recv_event(&mut self) -> Option<NetworkEvent> {
        let event = match self.rx.try_recv() {
            Ok(event) => event,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => {
                // network thread is gone without a final event
                if matches!(self.status, ConnectionStatus::Connecting | ConnectionStatus::Open) {
                    self.status = ConnectionStatus::Closed;
                    return Some(NetworkEvent::Closed);
                }
                return None;
            }
        };

        match &event {
            NetworkEvent::Opened => self.status = ConnectionStatus::Open,
            NetworkEvent::Closed => {
                if !matches!(self.status, ConnectionStatus::Error(_)) {
                    self.status = ConnectionStatus::Closed;
                }
            }
            NetworkEvent::Error(msg) => self.status = ConnectionStatus::Error(msg.clone()),
            NetworkEvent::Message(_) => {}
        }

        Some(event)
    }

    /// Gracefully close the socket
    pub fn disconnect(&self) -> io::Result<()> {
        self.tx
            .send(NetworkCommand::Disconnect)
            .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e.to_string()))
    }
}

impl Drop for NetworkClient {
    fn drop(&mut self) {
        let _ = self.tx.send(NetworkCommand::Disconnect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> (NetworkClient, mpsc::Sender<NetworkEvent>) {
        let (cmd_tx, _cmd_rx) = tokio::sync::mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        (NetworkClient::new(cmd_tx, event_rx, "123456".to_string()), event_tx)
    }

    #[test]
    fn test_status_follows_events() {
        let (mut client, events) = client();
        assert_eq!(client.status(), &ConnectionStatus::Connecting);

        events.send(NetworkEvent::Opened).unwrap();
        client.try_recv_event();
        assert_eq!(client.status(), &ConnectionStatus::Open);

        events.send(NetworkEvent::Closed).unwrap();
        client.try_recv_event();
        assert_eq!(client.status(), &ConnectionStatus::Closed);
    }

    #[test]
    fn test_error_is_not_overwritten_by_close() {
        let (mut client, events) = client();

        events
            .send(NetworkEvent::Error("Connection timed out".to_string()))
            .unwrap();
        events.send(NetworkEvent::Closed).unwrap();
        while client.try_recv_event().is_some() {}

        assert_eq!(
            client.status(),
            &ConnectionStatus::Error("Connection timed out".to_string())
        );
    }

    #[test]
    fn test_dead_thread_reports_closed_once() {
        let (mut client, events) = client();
        drop(events);

        assert_eq!(client.try_recv_event(), Some(NetworkEvent::Closed));
        assert_eq!(client.try_recv_event(), None);
        assert_eq!(client.status(), &ConnectionStatus::Closed);
    }
}
