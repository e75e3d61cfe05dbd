pub mod input;
pub mod physics;
pub mod powerups;
pub mod rules;
pub mod state;

pub use input::{ControlAction, FrameInput, InputState, InputTracker};
pub use physics::PhysicsEvents;
pub use powerups::{Cooldowns, PowerUpType};
pub use state::{Ball, MatchState, Phase, Player, PlayerId, Side};
