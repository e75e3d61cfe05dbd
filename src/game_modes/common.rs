//! Match loop shared by the AI, local and online modes
//!
//! Every mode builds a `Coordinator` and hands it to `run_match`, which owns
//! input sampling, the frame gate, relay traffic, overlays and score upload.

use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::{debug, info, warn};

use crate::config::{Config, KeyBindings};
use crate::game::input::{ControlAction, InputTracker};
use crate::game::state::{MatchState, Phase, PlayerId};
use crate::leaderboard::{compute_match_score, submit_in_background, validate_submission};
use crate::network::{NetworkClient, NetworkEvent};
use crate::simulation::{Coordinator, FrameGate, MatchRules, PlayMode, FRAME_INTERVAL};
use crate::ui::{self, Hud, OverlayMessage};

/// How long "Copied to clipboard!" style feedback stays up
const FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// Sleep out the rest of the render frame.
pub fn limit_frame_rate(frame_start: Instant, frame_duration: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame_duration {
        std::thread::sleep(frame_duration - elapsed);
    }
}

pub fn frame_duration(config: &Config) -> Duration {
    Duration::from_millis(1000 / config.display.target_fps.clamp(1, 1000))
}

/// `match_rules.fixed_seed`, or a fresh random seed when it is 0
pub fn match_seed(config: &Config) -> u64 {
    match config.match_rules.fixed_seed {
        0 => rand::random(),
        seed => seed,
    }
}

pub fn match_rules(config: &Config) -> MatchRules {
    MatchRules::from(&config.match_rules)
}

pub fn controls_hint(bindings: &KeyBindings, two_players: bool) -> String {
    let p1 = format!(
        "{}/{} move  {} jump  {} power-ups",
        bindings.player1_left,
        bindings.player1_right,
        bindings.player1_jump,
        bindings.player1_power_ups.join(""),
    );
    let p2 = if two_players {
        format!(
            "  |  P2 {}/{} {} {}",
            bindings.player2_left,
            bindings.player2_right,
            bindings.player2_jump,
            bindings.player2_power_ups.join(""),
        )
    } else {
        String::new()
    };
    format!("{}{}  |  {} pause  {} menu", p1, p2, bindings.pause, bindings.quit)
}

/// Copy to the system clipboard and describe the result for the player
pub fn copy_to_clipboard(text: &str) -> String {
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => {
            debug!("Copied {} to clipboard", text);
            "Copied to clipboard!".to_string()
        }
        Err(e) => {
            warn!("Clipboard error: {}", e);
            format!("Copy failed: {}", e)
        }
    }
}

/// Result line from the local point of view
fn result_text(state: &MatchState, mode: PlayMode, local: Option<PlayerId>) -> String {
    match (state.winner(), mode) {
        (None, _) => "DRAW".to_string(),
        (Some(winner), PlayMode::Local) => format!("{} WINS", winner.label()),
        (Some(PlayerId::Player1), PlayMode::Ai(_)) => "YOU WIN!".to_string(),
        (Some(PlayerId::Player2), PlayMode::Ai(_)) => "BOT WINS".to_string(),
        (Some(winner), PlayMode::Online) if Some(winner) == local => "YOU WIN!".to_string(),
        (Some(_), PlayMode::Online) => "YOU LOSE".to_string(),
    }
}

pub fn match_overlay(
    coordinator: &Coordinator,
    bindings: &KeyBindings,
    score_notice: Option<&str>,
) -> Option<OverlayMessage> {
    let state = coordinator.view();

    match state.phase {
        Phase::Paused => Some(
            OverlayMessage::info(vec![
                "PAUSED".to_string(),
                String::new(),
                format!("{} to resume  |  {} for menu", bindings.pause, bindings.quit),
            ])
            .with_title("Head Ball"),
        ),
        Phase::GameOver => {
            let mut lines = vec![
                result_text(state, coordinator.mode(), coordinator.role()),
                format!("{}  -  {}", state.player1.score, state.player2.score),
                String::new(),
            ];
            if let Some(notice) = score_notice {
                lines.push(notice.to_string());
                lines.push(String::new());
            }
            lines.push(if coordinator.is_authoritative() {
                format!("{} to Rematch  |  {} for menu", bindings.restart, bindings.quit)
            } else {
                format!("Waiting for host  |  {} for menu", bindings.quit)
            });
            Some(OverlayMessage::info(lines).with_title("Full Time"))
        }
        Phase::Playing if state.is_celebrating() => state
            .last_scorer
            .map(|scorer| OverlayMessage::success(vec![format!("GOAL! {}", scorer.label())])),
        _ => None,
    }
}

/// Uploads the final score once per finished match
#[derive(Default)]
struct ScoreReporter {
    pending: Option<mpsc::Receiver<Result<String, String>>>,
    notice: Option<String>,
    reported: bool,
}

impl ScoreReporter {
    fn update(&mut self, coordinator: &Coordinator, config: &Config) {
        if let Some(rx) = &self.pending {
            if let Ok(outcome) = rx.try_recv() {
                self.notice = Some(outcome.unwrap_or_else(|e| e));
                self.pending = None;
            }
        }

        if self.reported || !config.leaderboard.is_enabled() {
            return;
        }
        let Some((p1, p2)) = coordinator.final_score() else {
            return;
        };
        self.reported = true;

        let state = coordinator.view();
        let played = state.match_duration.saturating_sub(state.time_remaining);
        let score = compute_match_score(p1, p2, state.match_duration, state.time_remaining);
        match validate_submission(&config.leaderboard.player_name, score as f64, played) {
            Ok(entry) => {
                self.notice = Some("Saving score...".to_string());
                self.pending = Some(submit_in_background(config.leaderboard.base_url.clone(), entry));
            }
            Err(e) => {
                warn!("Not submitting score: {}", e);
                self.notice = Some(format!("Failed to save score: {}", e));
            }
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Run one session until the player quits or the coordinator gives up.
/// Returns a notice for the menu (e.g. "Opponent disconnected").
pub fn run_match<B: Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    mut coordinator: Coordinator,
    mut network: Option<NetworkClient>,
    mode_label: &str,
    record: Option<&Path>,
) -> Result<Option<String>, io::Error> {
    info!("Match started: {}", mode_label);

    let mut tracker = InputTracker::new(&config.keybindings);
    let mut gate = FrameGate::new(FRAME_INTERVAL);
    let mut reporter = ScoreReporter::default();
    let mut feedback: Option<(String, Instant)> = None;
    let render_every = frame_duration(config);

    let local_players: Vec<PlayerId> = match coordinator.mode() {
        PlayMode::Local => vec![PlayerId::Player1, PlayerId::Player2],
        _ => coordinator.role().into_iter().collect(),
    };
    let hint = controls_hint(&config.keybindings, coordinator.mode() == PlayMode::Local);

    if record.is_some() && coordinator.is_authoritative() {
        coordinator.record();
    }

    let outcome = loop {
        let frame_start = Instant::now();

        if let Some(client) = network.as_mut() {
            while let Some(event) = client.try_recv_event() {
                match event {
                    NetworkEvent::Message(msg) => coordinator.handle_message(msg),
                    NetworkEvent::Opened => debug!("Relay connection open"),
                    NetworkEvent::Closed | NetworkEvent::Error(_) => {
                        coordinator.handle_connection_lost(client.status())
                    }
                }
            }
        }

        if coordinator.is_finished() {
            break coordinator.notice().map(str::to_string);
        }

        if gate.ready(Instant::now()) {
            let input = tracker.poll()?;

            let mut quit = false;
            for control in &input.controls {
                match control {
                    ControlAction::Quit => quit = true,
                    ControlAction::Pause => {
                        coordinator.toggle_pause();
                    }
                    ControlAction::Restart => {
                        if coordinator.restart(match_seed(config)) {
                            reporter.reset();
                        }
                    }
                    ControlAction::CopyRoomCode => {
                        if let Some(code) = coordinator.room_code() {
                            feedback = Some((copy_to_clipboard(code), Instant::now()));
                        }
                    }
                }
            }
            if quit {
                break None;
            }

            let (events, outgoing) = coordinator.frame(&input);
            if let Some(scorer) = events.goal {
                debug!("Goal for {}", scorer.label());
            }
            if let Some(client) = network.as_ref() {
                for msg in outgoing {
                    if let Err(e) = client.send(msg) {
                        warn!("Failed to queue relay message: {}", e);
                    }
                }
            }
        }

        reporter.update(&coordinator, config);

        if feedback
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > FEEDBACK_DURATION)
        {
            feedback = None;
        }
        let status = feedback.as_ref().map(|(text, _)| text.as_str());
        let overlay = match_overlay(&coordinator, &config.keybindings, reporter.notice.as_deref().or(status));

        let hud = Hud {
            mode_label,
            local_players: &local_players,
            cooldowns: coordinator
                .is_authoritative()
                .then(|| coordinator.simulation().cooldowns()),
            controls_hint: &hint,
        };
        terminal.draw(|f| ui::render(f, coordinator.view(), &hud, overlay.as_ref(), &config.display))?;

        limit_frame_rate(frame_start, render_every);
    };

    if let Some(client) = network.as_ref() {
        let _ = client.disconnect();
    }

    if let (Some(path), Some(log)) = (record, coordinator.take_replay()) {
        if let Err(e) = log.save(path) {
            warn!("Could not save replay: {:#}", e);
        }
    }

    info!("Match ended: {}", mode_label);
    Ok(outcome)
}
