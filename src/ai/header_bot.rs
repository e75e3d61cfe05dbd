// Header bot: the per-tick controller plus occasional power-ups

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::controller::compute_ai_input;
use super::Bot;
use crate::game::input::InputState;
use crate::game::powerups::PowerUpType;
use crate::game::state::{MatchState, PlayerId};

/// Configuration for a header bot's behavior
#[derive(Debug, Clone)]
pub struct HeaderBotConfig {
    pub name: String,
    pub difficulty: f32,             // 0.0 = sloppy, 1.0 = never misjudges
    pub power_up_chance: f32,        // Per-tick probability of requesting a power-up
}

pub struct HeaderBot {
    config: HeaderBotConfig,
    seed: u64,
    rng: StdRng,
}

impl HeaderBot {
    pub fn new(config: HeaderBotConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Bot for HeaderBot {
    fn next_input(&mut self, state: &MatchState, me: PlayerId) -> InputState {
        let mut input = compute_ai_input(
            state.player(me),
            &state.ball,
            state.player(me.opponent()),
            self.config.difficulty,
            &mut self.rng,
        );

        // cooldowns are enforced by the simulation, the bot just asks
        if self.rng.gen::<f32>() < self.config.power_up_chance {
            let choices = PowerUpType::all();
            input.power_up = Some(choices[self.rng.gen_range(0..choices.len())]);
        }

        input
    }

    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}
