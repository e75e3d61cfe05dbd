// Bot trait for AI opponents

use crate::game::input::InputState;
use crate::game::state::{MatchState, PlayerId};

/// Trait for AI bot implementations
///
/// A bot fills in one player's controls every simulation tick. Bots may keep
/// their own state (an RNG, for instance) but only read the match.
pub trait Bot {
    /// Decide the controls for `me` this tick
    fn next_input(&mut self, state: &MatchState, me: PlayerId) -> InputState;

    /// Reset bot internal state (called when a new match starts)
    fn reset(&mut self);

    /// Bot name for debugging/display
    fn name(&self) -> &str;
}
