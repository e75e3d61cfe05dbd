// Authoritative fixed-step match simulation

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::MatchRulesConfig;
use crate::game::input::InputState;
use crate::game::physics::{
    handle_player_ball_collision, update_ball, update_player, PhysicsEvents,
};
use crate::game::powerups::{expire_effects, try_activate_power_up, Cooldowns, PowerUpType};
use crate::game::rules::{self, GOAL_CELEBRATION_MS};
use crate::game::state::{Ball, MatchState, Phase, PlayerId};
use crate::network::protocol::GameStatePayload;

/// One simulation step in sim milliseconds
pub const TICK_MS: u64 = 16;

pub const DEFAULT_MATCH_SECS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRules {
    pub duration_secs: u32,
    pub celebration_ms: u64,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_MATCH_SECS,
            celebration_ms: GOAL_CELEBRATION_MS,
        }
    }
}

impl From<&MatchRulesConfig> for MatchRules {
    fn from(config: &MatchRulesConfig) -> Self {
        Self {
            duration_secs: config.duration_secs.max(1),
            celebration_ms: config.goal_pause_ms,
        }
    }
}

/// What a single step produced
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StepEvents {
    pub physics: PhysicsEvents,
    pub goal: Option<PlayerId>,
    pub power_ups: Vec<(PlayerId, PowerUpType)>,
    pub game_over: bool,
}

/// Owns the authoritative `MatchState`.
///
/// Everything that happens in a match (kickoff randomisation included) flows
/// from the seed and the per-tick inputs, so the same seed and inputs always
/// produce the same `GAME_STATE` sequence.
pub struct Simulation {
    state: MatchState,
    cooldowns: Cooldowns,
    rng: StdRng,
    seed: u64,
    rules: MatchRules,
    seq: u64,
}

impl Simulation {
    pub fn new(seed: u64, rules: MatchRules) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let ball = Ball::kickoff(&mut rng);

        Self {
            state: MatchState::new(rules.duration_secs, ball),
            cooldowns: Cooldowns::new(),
            rng,
            seed,
            rules,
            seq: 0,
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rules(&self) -> MatchRules {
        self.rules
    }

    pub fn start(&mut self) -> bool {
        rules::start_match(&mut self.state)
    }

    pub fn enter_lobby(&mut self) -> bool {
        rules::enter_lobby(&mut self.state)
    }

    pub fn toggle_pause(&mut self) -> bool {
        rules::toggle_pause(&mut self.state)
    }

    /// Back to MENU with a new seed. `seq` keeps counting so a guest never
    /// mistakes the new match's snapshots for stale ones.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self.cooldowns = Cooldowns::new();
        let ball = Ball::kickoff(&mut self.rng);
        rules::reset_to_menu(&mut self.state, ball);
    }

    /// Advance one tick. Does nothing unless the match is PLAYING.
    pub fn step(&mut self, p1: &InputState, p2: &InputState) -> StepEvents {
        let mut events = StepEvents::default();
        if self.state.phase != Phase::Playing {
            return events;
        }

        self.state.clock_ms += TICK_MS;
        let now = self.state.clock_ms;

        expire_effects(&mut self.state, now);

        for (id, input) in [(PlayerId::Player1, p1), (PlayerId::Player2, p2)] {
            if let Some(kind) = input.power_up {
                if try_activate_power_up(&mut self.state, &mut self.cooldowns, id, kind, now) {
                    events.power_ups.push((id, kind));
                } else {
                    debug!("{} requested {:?} on cooldown", id.label(), kind);
                }
            }
        }

        update_player(&mut self.state.player1, p1, now);
        update_player(&mut self.state.player2, p2, now);

        let enlarged = self.state.any_enlarge_active(now);
        events.physics = update_ball(&mut self.state.ball, enlarged);

        let fireball = self.state.ball.is_fireball(now);
        let hit1 = handle_player_ball_collision(
            &self.state.player1,
            PlayerId::Player1,
            &mut self.state.ball,
            fireball,
        );
        let hit2 = handle_player_ball_collision(
            &self.state.player2,
            PlayerId::Player2,
            &mut self.state.ball,
            fireball,
        );
        events.physics.player_contact = hit1 || hit2;

        events.goal = rules::process_goal(
            &mut self.state,
            &mut self.rng,
            TICK_MS,
            self.rules.celebration_ms,
        );
        events.game_over = rules::advance_clock(&mut self.state);

        events
    }

    /// Snapshot with the next sequence number
    pub fn snapshot(&mut self) -> GameStatePayload {
        self.seq += 1;
        self.state.snapshot(self.seq)
    }
}
