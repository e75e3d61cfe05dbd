// Room relay pairing a host and a guest over WebSocket

pub mod room;
pub mod server;

pub use room::{JoinOutcome, Room, RoomRegistry};
pub use server::{router, serve};
