// Timed power-up effects layered on top of player and ball state

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::state::{ActivePowerUp, MatchState, PlayerId};

/// Fireball lasts a fixed time; the catalog's zero duration is not used for it
pub const FIREBALL_DURATION_MS: u64 = 3000;
pub const FIREBALL_BOOST: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpType {
    /// Freezes the opponent in place
    Freeze,
    /// Faster acceleration and top speed for the activating player
    Speed,
    /// Doubles the shared ball's radius while held
    EnlargeBall,
    /// Doubles kick force and boosts the ball immediately
    Fireball,
}

/// Static catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpDefinition {
    pub kind: PowerUpType,
    pub duration_ms: u64,
    pub cooldown_ms: u64,
}

pub const CATALOG: [PowerUpDefinition; 4] = [
    PowerUpDefinition {
        kind: PowerUpType::Freeze,
        duration_ms: 3000,
        cooldown_ms: 15_000,
    },
    PowerUpDefinition {
        kind: PowerUpType::Speed,
        duration_ms: 5000,
        cooldown_ms: 12_000,
    },
    PowerUpDefinition {
        kind: PowerUpType::EnlargeBall,
        duration_ms: 5000,
        cooldown_ms: 15_000,
    },
    PowerUpDefinition {
        kind: PowerUpType::Fireball,
        duration_ms: 0,
        cooldown_ms: 20_000,
    },
];

impl PowerUpType {
    pub fn all() -> [PowerUpType; 4] {
        [
            PowerUpType::Freeze,
            PowerUpType::Speed,
            PowerUpType::EnlargeBall,
            PowerUpType::Fireball,
        ]
    }

    pub fn definition(self) -> &'static PowerUpDefinition {
        match self {
            PowerUpType::Freeze => &CATALOG[0],
            PowerUpType::Speed => &CATALOG[1],
            PowerUpType::EnlargeBall => &CATALOG[2],
            PowerUpType::Fireball => &CATALOG[3],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PowerUpType::Freeze => "Freeze",
            PowerUpType::Speed => "Speed",
            PowerUpType::EnlargeBall => "Big Ball",
            PowerUpType::Fireball => "Fireball",
        }
    }
}

/// Earliest next use per (player, power-up type)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cooldowns {
    next_use: HashMap<(PlayerId, PowerUpType), u64>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self, player: PlayerId, kind: PowerUpType, now: u64) -> bool {
        self.ready_at(player, kind) <= now
    }

    pub fn ready_at(&self, player: PlayerId, kind: PowerUpType) -> u64 {
        self.next_use.get(&(player, kind)).copied().unwrap_or(0)
    }

    /// Milliseconds until the power-up can be used again
    pub fn remaining(&self, player: PlayerId, kind: PowerUpType, now: u64) -> u64 {
        self.ready_at(player, kind).saturating_sub(now)
    }

    fn start(&mut self, player: PlayerId, kind: PowerUpType, now: u64) {
        self.next_use
            .insert((player, kind), now + kind.definition().cooldown_ms);
    }
}

/// Activate a power-up for `actor`. Returns false and leaves everything
/// untouched while the (actor, kind) cooldown is still running.
pub fn try_activate_power_up(
    state: &mut MatchState,
    cooldowns: &mut Cooldowns,
    actor: PlayerId,
    kind: PowerUpType,
    now: u64,
) -> bool {
    if !cooldowns.is_ready(actor, kind, now) {
        return false;
    }
    cooldowns.start(actor, kind, now);

    let duration = kind.definition().duration_ms;
    match kind {
        PowerUpType::Freeze => {
            state.player_mut(actor.opponent()).frozen_until = Some(now + duration);
        }
        PowerUpType::Speed | PowerUpType::EnlargeBall => {
            state.player_mut(actor).active_power_up = Some(ActivePowerUp {
                kind,
                expires_at: now + duration,
            });
        }
        PowerUpType::Fireball => {
            state.ball.fireball_until = Some(now + FIREBALL_DURATION_MS);
            state.ball.velocity *= FIREBALL_BOOST;
        }
    }

    debug!("{} activated {:?} at {}ms", actor.label(), kind, now);
    true
}

/// Clear every effect whose expiry has passed. Runs before physics each tick.
pub fn expire_effects(state: &mut MatchState, now: u64) {
    for id in [PlayerId::Player1, PlayerId::Player2] {
        let player = state.player_mut(id);
        if player.frozen_until.map_or(false, |until| until <= now) {
            player.frozen_until = None;
        }
        if player
            .active_power_up
            .map_or(false, |active| active.expires_at <= now)
        {
            player.active_power_up = None;
        }
    }

    if state.ball.fireball_until.map_or(false, |until| until <= now) {
        state.ball.fireball_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Ball, KICKOFF_POSITION};
    use glam::Vec2;

    fn fresh_state() -> MatchState {
        MatchState::new(90, Ball::new(KICKOFF_POSITION, Vec2::new(2.0, -1.0)))
    }

    #[test]
    fn test_cooldown_blocks_second_activation() {
        let mut state = fresh_state();
        let mut cooldowns = Cooldowns::new();

        assert!(try_activate_power_up(
            &mut state,
            &mut cooldowns,
            PlayerId::Player1,
            PowerUpType::Speed,
            1000
        ));

        let state_before = state.clone();
        let cooldowns_before = cooldowns.clone();
        let cooldown = PowerUpType::Speed.definition().cooldown_ms;

        assert!(!try_activate_power_up(
            &mut state,
            &mut cooldowns,
            PlayerId::Player1,
            PowerUpType::Speed,
            1000 + cooldown - 1
        ));
        assert_eq!(state, state_before);
        assert_eq!(cooldowns, cooldowns_before);

        assert!(try_activate_power_up(
            &mut state,
            &mut cooldowns,
            PlayerId::Player1,
            PowerUpType::Speed,
            1000 + cooldown
        ));
    }

    #[test]
    fn test_cooldowns_are_per_player_and_type() {
        let mut state = fresh_state();
        let mut cooldowns = Cooldowns::new();

        assert!(try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player1, PowerUpType::Freeze, 0));
        assert!(try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player2, PowerUpType::Freeze, 0));
        assert!(try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player1, PowerUpType::Speed, 0));
    }

    #[test]
    fn test_freeze_targets_opponent() {
        let mut state = fresh_state();
        let mut cooldowns = Cooldowns::new();

        try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player2, PowerUpType::Freeze, 500);

        assert_eq!(state.player1.frozen_until, Some(3500));
        assert_eq!(state.player2.frozen_until, None);
        assert_eq!(state.player2.active_power_up, None);
    }

    #[test]
    fn test_fireball_uses_fixed_duration_and_boosts_ball() {
        let mut state = fresh_state();
        let mut cooldowns = Cooldowns::new();
        let velocity = state.ball.velocity;

        try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player1, PowerUpType::Fireball, 100);

        assert_eq!(state.ball.fireball_until, Some(100 + FIREBALL_DURATION_MS));
        assert_eq!(state.ball.velocity, velocity * FIREBALL_BOOST);
        assert_eq!(state.player1.active_power_up, None);
    }

    #[test]
    fn test_enlarge_is_derived_from_either_player() {
        let mut state = fresh_state();
        let mut cooldowns = Cooldowns::new();

        try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player2, PowerUpType::EnlargeBall, 0);

        assert!(state.any_enlarge_active(4999));
        assert!(!state.any_enlarge_active(5000));
    }

    #[test]
    fn test_frozen_and_buff_are_orthogonal() {
        let mut state = fresh_state();
        let mut cooldowns = Cooldowns::new();

        try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player1, PowerUpType::Speed, 0);
        try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player2, PowerUpType::Freeze, 0);

        assert!(state.player1.is_frozen(10));
        assert!(state.player1.has_power_up(PowerUpType::Speed, 10));
    }

    #[test]
    fn test_expire_effects_clears_only_past_expiry() {
        let mut state = fresh_state();
        let mut cooldowns = Cooldowns::new();

        try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player1, PowerUpType::Freeze, 0);
        try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player1, PowerUpType::Speed, 0);
        try_activate_power_up(&mut state, &mut cooldowns, PlayerId::Player1, PowerUpType::Fireball, 0);

        expire_effects(&mut state, 2999);
        assert!(state.player2.frozen_until.is_some());
        assert!(state.ball.fireball_until.is_some());

        expire_effects(&mut state, 3000);
        assert!(state.player2.frozen_until.is_none());
        assert!(state.ball.fireball_until.is_none());
        assert!(state.player1.active_power_up.is_some());

        expire_effects(&mut state, 5000);
        assert!(state.player1.active_power_up.is_none());
    }
}
