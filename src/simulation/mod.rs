// Match simulation and session coordination

pub mod coordinator;
pub mod engine;
mod frame_gate;

pub use coordinator::{Coordinator, PlayMode};
pub use engine::{MatchRules, Simulation, StepEvents, DEFAULT_MATCH_SECS, TICK_MS};
pub use frame_gate::{FrameGate, FRAME_INTERVAL};
