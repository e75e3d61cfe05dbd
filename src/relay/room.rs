// Relay rooms: one host slot, one guest slot, keyed by room code

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::game::state::PlayerId;
use crate::network::protocol::{RelayMessage, ROOM_FULL_MESSAGE};

pub type ConnectionId = u64;

/// What a connection's writer task should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    Close,
}

#[derive(Debug)]
pub struct Slot {
    id: ConnectionId,
    tx: UnboundedSender<Outbound>,
}

impl Slot {
    pub fn new(id: ConnectionId, tx: UnboundedSender<Outbound>) -> Self {
        Self { id, tx }
    }

    fn send(&self, msg: &RelayMessage) -> bool {
        match msg.to_json() {
            Ok(json) => self.tx.send(Outbound::Text(json)).is_ok(),
            Err(e) => {
                warn!("Failed to encode {}: {}", msg.kind(), e);
                false
            }
        }
    }

    fn close(&self) {
        let _ = self.tx.send(Outbound::Close);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Host,
    Guest,
    /// Rejected with `ERROR` and closed
    Full,
}

#[derive(Debug, Default)]
pub struct Room {
    host: Option<Slot>,
    guest: Option<Slot>,
}

impl Room {
    /// First free slot wins: host, then guest. Filling the second slot
    /// starts the match for both.
    pub fn join(&mut self, code: &str, slot: Slot) -> JoinOutcome {
        if self.host.is_none() {
            slot.send(&RelayMessage::RoomCreated {
                code: code.to_string(),
            });
            self.host = Some(slot);
            if self.guest.is_some() {
                self.start();
            }
            JoinOutcome::Host
        } else if self.guest.is_none() {
            self.guest = Some(slot);
            self.start();
            JoinOutcome::Guest
        } else {
            slot.send(&RelayMessage::Error {
                message: ROOM_FULL_MESSAGE.to_string(),
            });
            slot.close();
            JoinOutcome::Full
        }
    }

    fn start(&self) {
        if let (Some(host), Some(guest)) = (&self.host, &self.guest) {
            host.send(&RelayMessage::PlayerJoined);
            host.send(&RelayMessage::GameStart {
                role: PlayerId::Player1,
            });
            guest.send(&RelayMessage::GameStart {
                role: PlayerId::Player2,
            });
        }
    }

    pub fn role_of(&self, id: ConnectionId) -> Option<PlayerId> {
        if self.host.as_ref().is_some_and(|slot| slot.id == id) {
            Some(PlayerId::Player1)
        } else if self.guest.as_ref().is_some_and(|slot| slot.id == id) {
            Some(PlayerId::Player2)
        } else {
            None
        }
    }

    /// Pass a client message to the other side. Only `GAME_STATE` from the
    /// host and `PLAYER_INPUT` from the guest are relayed.
    pub fn forward(&self, from: ConnectionId, msg: &RelayMessage) -> bool {
        let target = match (msg, self.role_of(from)) {
            (RelayMessage::GameState(_), Some(PlayerId::Player1)) => self.guest.as_ref(),
            (RelayMessage::PlayerInput(_), Some(PlayerId::Player2)) => self.host.as_ref(),
            (_, role) => {
                warn!("Ignoring {} from {:?}", msg.kind(), role);
                return false;
            }
        };

        target.is_some_and(|slot| slot.send(msg))
    }

    /// Free the connection's slot and tell whoever is left
    pub fn leave(&mut self, id: ConnectionId) {
        let remaining = match self.role_of(id) {
            Some(PlayerId::Player1) => {
                self.host = None;
                self.guest.as_ref()
            }
            Some(PlayerId::Player2) => {
                self.guest = None;
                self.host.as_ref()
            }
            None => return,
        };

        if let Some(peer) = remaining {
            peer.send(&RelayMessage::PlayerDisconnected);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_none() && self.guest.is_none()
    }
}

/// All live rooms, shared by every connection task
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: Arc<RwLock<HashMap<String, Room>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn join(&self, code: &str, id: ConnectionId, tx: UnboundedSender<Outbound>) -> JoinOutcome {
        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(code.to_string()).or_default();
        let outcome = room.join(code, Slot::new(id, tx));
        info!("Connection {} joined room {} as {:?}", id, code, outcome);
        outcome
    }

    pub async fn forward(&self, code: &str, from: ConnectionId, msg: &RelayMessage) -> bool {
        let rooms = self.rooms.read().await;
        match rooms.get(code) {
            Some(room) => room.forward(from, msg),
            None => false,
        }
    }

    pub async fn leave(&self, code: &str, id: ConnectionId) {
        let mut rooms = self.rooms.write().await;
        if let Some(room) = rooms.get_mut(code) {
            room.leave(id);
            if room.is_empty() {
                rooms.remove(code);
                debug!("Room {} removed", code);
            }
        }
        info!("Connection {} left room {}", id, code);
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}
