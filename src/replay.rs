// Replay logs: a seed plus every tick's inputs reproduces a whole match

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::game::input::InputState;
use crate::network::protocol::GameStatePayload;
use crate::simulation::{MatchRules, Simulation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub seed: u64,
    pub match_duration_secs: u32,
    pub goal_pause_ms: u64,
    /// (player 1, player 2) inputs for every PLAYING tick
    pub frames: Vec<(InputState, InputState)>,
}

impl ReplayLog {
    pub fn new(seed: u64, rules: MatchRules) -> Self {
        Self {
            seed,
            match_duration_secs: rules.duration_secs,
            goal_pause_ms: rules.celebration_ms,
            frames: Vec::new(),
        }
    }

    pub fn rules(&self) -> MatchRules {
        MatchRules {
            duration_secs: self.match_duration_secs,
            celebration_ms: self.goal_pause_ms,
        }
    }

    pub fn record(&mut self, p1: InputState, p2: InputState) {
        self.frames.push((p1, p2));
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes().context("Failed to encode replay")?;
        fs::write(path, bytes)
            .with_context(|| format!("Failed to write replay to {}", path.display()))?;
        info!("Saved replay ({} ticks) to {}", self.frames.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read replay from {}", path.display()))?;
        Self::from_bytes(&bytes)
            .with_context(|| format!("{} is not a replay file", path.display()))
    }
}

/// Re-run the match and return every `GAME_STATE` the host would have sent
pub fn replay(log: &ReplayLog) -> Vec<GameStatePayload> {
    let mut sim = Simulation::new(log.seed, log.rules());
    sim.start();

    log.frames
        .iter()
        .map(|(p1, p2)| {
            sim.step(p1, p2);
            sim.snapshot()
        })
        .collect()
}

/// One-line result of a replayed match
pub fn summarize(states: &[GameStatePayload]) -> String {
    match states.last() {
        Some(last) => format!(
            "P1 {} - {} P2 after {} ticks ({}s left, {:?})",
            last.player1.score,
            last.player2.score,
            states.len(),
            last.time_left,
            last.phase
        ),
        None => "Empty replay".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::powerups::PowerUpType;

    fn recorded_match() -> (ReplayLog, Vec<GameStatePayload>) {
        let rules = MatchRules::default();
        let mut sim = Simulation::new(77, rules);
        let mut log = ReplayLog::new(77, rules);
        sim.start();

        let mut states = Vec::new();
        for tick in 0..1500u32 {
            let p1 = InputState {
                right: tick % 90 < 60,
                up: tick % 45 == 0,
                power_up: (tick == 30).then_some(PowerUpType::Fireball),
                ..InputState::default()
            };
            let p2 = InputState {
                left: tick % 70 < 35,
                ..InputState::default()
            };
            log.record(p1, p2);
            sim.step(&p1, &p2);
            states.push(sim.snapshot());
        }
        (log, states)
    }

    #[test]
    fn test_replay_reproduces_recorded_states() {
        let (log, states) = recorded_match();
        let decoded = ReplayLog::from_bytes(&log.to_bytes().unwrap()).unwrap();

        assert_eq!(decoded, log);
        assert_eq!(replay(&decoded), states);
    }

    #[test]
    fn test_save_and_load() {
        let (log, _) = recorded_match();
        let path = std::env::temp_dir().join(format!("headball-replay-{}.bin", std::process::id()));

        log.save(&path).unwrap();
        let loaded = ReplayLog::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, log);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(ReplayLog::from_bytes(&[1, 2, 3]).is_err());
        assert_eq!(summarize(&[]), "Empty replay");
    }
}
