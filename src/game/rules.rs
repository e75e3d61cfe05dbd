// Match phase transitions, goal acceptance and the countdown clock

use rand::Rng;
use tracing::info;

use super::physics::check_goal;
use super::state::{Ball, MatchState, Phase, PlayerId};

pub const GOAL_CELEBRATION_MS: u64 = 1500;

/// MENU -> PLAYING (AI/local) or LOBBY -> PLAYING (online)
pub fn start_match(state: &mut MatchState) -> bool {
    match state.phase {
        Phase::Menu | Phase::Lobby => {
            state.phase = Phase::Playing;
            info!("Match started ({}s)", state.match_duration);
            true
        }
        _ => false,
    }
}

/// MENU -> LOBBY while an online room waits for its second player
pub fn enter_lobby(state: &mut MatchState) -> bool {
    if state.phase == Phase::Menu {
        state.phase = Phase::Lobby;
        true
    } else {
        false
    }
}

/// PLAYING <-> PAUSED. Nothing else about the match changes.
pub fn toggle_pause(state: &mut MatchState) -> bool {
    state.phase = match state.phase {
        Phase::Playing => Phase::Paused,
        Phase::Paused => Phase::Playing,
        _ => return false,
    };
    true
}

/// Throw the match away and return to MENU with a fresh field
pub fn reset_to_menu(state: &mut MatchState, ball: Ball) {
    *state = MatchState::new(state.match_duration, ball);
}

/// Goal handling for one PLAYING tick.
///
/// While a celebration runs, goals are ignored and the timer counts down by
/// `dt_ms`; when it runs out the ball is replaced by a fresh kickoff ball.
/// Otherwise an accepted goal scores exactly once and starts the celebration.
pub fn process_goal<R: Rng + ?Sized>(
    state: &mut MatchState,
    rng: &mut R,
    dt_ms: u64,
    celebration_ms: u64,
) -> Option<PlayerId> {
    if let Some(remaining) = state.goal_celebration_ms {
        if remaining <= dt_ms {
            state.ball = Ball::kickoff(rng);
            state.goal_celebration_ms = None;
        } else {
            state.goal_celebration_ms = Some(remaining - dt_ms);
        }
        return None;
    }

    let scorer = check_goal(&state.ball)?;
    state.player_mut(scorer).score += 1;
    state.last_scorer = Some(scorer);
    state.goal_celebration_ms = Some(celebration_ms);

    info!(
        "Goal for {} ({} - {})",
        scorer.label(),
        state.player1.score,
        state.player2.score
    );
    Some(scorer)
}

/// Recompute whole seconds left from the sim clock. Returns true on the
/// tick that ends the match.
pub fn advance_clock(state: &mut MatchState) -> bool {
    let elapsed_secs = (state.clock_ms / 1000).min(u32::MAX as u64) as u32;
    state.time_remaining = state.match_duration.saturating_sub(elapsed_secs);

    if state.time_remaining == 0 && state.phase == Phase::Playing {
        state.phase = Phase::GameOver;
        info!(
            "Full time: {} - {}",
            state.player1.score, state.player2.score
        );
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::physics::{GOAL_WIDTH, GROUND_Y};
    use crate::game::state::KICKOFF_POSITION;
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn state_in(phase: Phase) -> MatchState {
        let mut state = MatchState::new(90, Ball::new(KICKOFF_POSITION, Vec2::ZERO));
        state.phase = phase;
        state
    }

    #[test]
    fn test_phase_transitions() {
        let mut state = state_in(Phase::Menu);
        assert!(!toggle_pause(&mut state));
        assert!(enter_lobby(&mut state));
        assert_eq!(state.phase, Phase::Lobby);
        assert!(start_match(&mut state));
        assert_eq!(state.phase, Phase::Playing);

        assert!(toggle_pause(&mut state));
        assert_eq!(state.phase, Phase::Paused);
        assert!(toggle_pause(&mut state));
        assert_eq!(state.phase, Phase::Playing);

        assert!(!start_match(&mut state));
        assert!(!enter_lobby(&mut state));
    }

    #[test]
    fn test_game_over_only_from_playing() {
        let mut paused = state_in(Phase::Paused);
        paused.clock_ms = 90_000;
        assert!(!advance_clock(&mut paused));
        assert_eq!(paused.phase, Phase::Paused);

        let mut playing = state_in(Phase::Playing);
        playing.clock_ms = 89_999;
        assert!(!advance_clock(&mut playing));
        assert_eq!(playing.time_remaining, 1);

        playing.clock_ms = 90_000;
        assert!(advance_clock(&mut playing));
        assert_eq!(playing.phase, Phase::GameOver);
        assert!(!toggle_pause(&mut playing));
    }

    #[test]
    fn test_goal_counts_once_during_celebration() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = state_in(Phase::Playing);
        state.ball.position = Vec2::new(GOAL_WIDTH - 5.0, GROUND_Y - 20.0);

        assert_eq!(
            process_goal(&mut state, &mut rng, 16, GOAL_CELEBRATION_MS),
            Some(PlayerId::Player2)
        );

        // ball is still inside the goal for the whole celebration
        let mut ticks = 0;
        while state.is_celebrating() {
            assert_eq!(process_goal(&mut state, &mut rng, 16, GOAL_CELEBRATION_MS), None);
            ticks += 1;
        }

        assert_eq!(state.player2.score, 1);
        assert_eq!(state.player1.score, 0);
        assert_eq!(state.last_scorer, Some(PlayerId::Player2));
        assert_eq!(ticks, (GOAL_CELEBRATION_MS + 15) / 16);
        assert_eq!(state.ball.position, KICKOFF_POSITION);
    }

    #[test]
    fn test_reset_to_menu_clears_scores() {
        let mut state = state_in(Phase::GameOver);
        state.player1.score = 3;
        state.clock_ms = 90_000;

        reset_to_menu(&mut state, Ball::new(KICKOFF_POSITION, Vec2::ZERO));

        assert_eq!(state.phase, Phase::Menu);
        assert_eq!(state.player1.score, 0);
        assert_eq!(state.time_remaining, 90);
        assert_eq!(state.clock_ms, 0);
    }
}
