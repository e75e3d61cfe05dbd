use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use serde::{Deserialize, Serialize};

use super::powerups::PowerUpType;
use crate::config::KeyBindings;

/// How long a key counts as held after its first press, long enough to
/// bridge the OS auto-repeat delay. Unused once releases are reported.
pub const INITIAL_HOLD_WINDOW: Duration = Duration::from_millis(500);

/// How long a key counts as held after an auto-repeat event
pub const HOLD_WINDOW: Duration = Duration::from_millis(120);

/// Per-tick control state for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    /// One-shot activation request, consumed by the simulation on the next tick
    pub power_up: Option<PowerUpType>,
}

impl InputState {
    /// True when the held keys differ (power-up requests are ignored)
    pub fn movement_changed(&self, other: &InputState) -> bool {
        self.left != other.left || self.right != other.right || self.up != other.up
    }
}

/// Non-movement keys handled by the game loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlAction {
    Quit,
    Pause,
    Restart,
    CopyRoomCode,
}

/// Everything sampled from the keyboard for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    pub player1: InputState,
    pub player2: InputState,
    pub controls: Vec<ControlAction>,
}

/// Parse a key binding string into a KeyCode.
/// Accepts named keys ("Up", "Enter", "Space", ...) or a single character.
pub fn parse_key(key_str: &str) -> Option<KeyCode> {
    match key_str {
        "Up" => Some(KeyCode::Up),
        "Down" => Some(KeyCode::Down),
        "Left" => Some(KeyCode::Left),
        "Right" => Some(KeyCode::Right),
        "Enter" => Some(KeyCode::Enter),
        "Esc" => Some(KeyCode::Esc),
        "Space" => Some(KeyCode::Char(' ')),
        "Backspace" => Some(KeyCode::Backspace),
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c.to_ascii_lowercase())),
                _ => None,
            }
        }
    }
}

/// Letters match regardless of shift state
pub fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

fn bind(key_str: &str, fallback: KeyCode) -> KeyCode {
    parse_key(key_str).unwrap_or(fallback)
}

#[derive(Debug, Clone)]
struct PlayerKeys {
    left: KeyCode,
    right: KeyCode,
    up: KeyCode,
    power_ups: [KeyCode; 4],
}

impl PlayerKeys {
    fn new(left: &str, right: &str, up: &str, power_ups: &[String], defaults: [char; 4]) -> Self {
        let mut keys = defaults.map(KeyCode::Char);
        for (slot, key_str) in keys.iter_mut().zip(power_ups) {
            if let Some(code) = parse_key(key_str) {
                *slot = code;
            }
        }

        Self {
            left: bind(left, KeyCode::Null),
            right: bind(right, KeyCode::Null),
            up: bind(up, KeyCode::Null),
            power_ups: keys,
        }
    }

    fn power_up_for(&self, code: KeyCode) -> Option<PowerUpType> {
        self.power_ups
            .iter()
            .position(|key| *key == code)
            .map(|idx| PowerUpType::all()[idx])
    }
}

#[derive(Debug, Clone, Copy)]
struct HeldKey {
    last_event: Instant,
    repeating: bool,
}

/// Turns crossterm key events into held-key state.
///
/// Without keyboard enhancement a terminal only reports presses plus
/// auto-repeat, so a key stays held for `INITIAL_HOLD_WINDOW` after the first
/// press and `HOLD_WINDOW` after each repeat. Once a release event has been
/// seen the terminal is trusted and keys stay held until released.
pub struct InputTracker {
    player1: PlayerKeys,
    player2: PlayerKeys,
    quit: KeyCode,
    pause: KeyCode,
    restart: KeyCode,
    copy_code: KeyCode,
    held: HashMap<KeyCode, HeldKey>,
    releases_reported: bool,
    pending_power_up: [Option<PowerUpType>; 2],
    pending_controls: Vec<ControlAction>,
}

impl InputTracker {
    pub fn new(bindings: &KeyBindings) -> Self {
        Self {
            player1: PlayerKeys::new(
                &bindings.player1_left,
                &bindings.player1_right,
                &bindings.player1_jump,
                &bindings.player1_power_ups,
                ['1', '2', '3', '4'],
            ),
            player2: PlayerKeys::new(
                &bindings.player2_left,
                &bindings.player2_right,
                &bindings.player2_jump,
                &bindings.player2_power_ups,
                ['7', '8', '9', '0'],
            ),
            quit: bind(&bindings.quit, KeyCode::Char('q')),
            pause: bind(&bindings.pause, KeyCode::Char('p')),
            restart: bind(&bindings.restart, KeyCode::Char('r')),
            copy_code: bind(&bindings.copy_code, KeyCode::Char('c')),
            held: HashMap::new(),
            releases_reported: false,
            pending_power_up: [None, None],
            pending_controls: Vec::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let code = normalize_key(key.code);

        if key.kind == KeyEventKind::Release {
            self.releases_reported = true;
            self.held.remove(&code);
            return;
        }

        // Without release events, auto-repeat shows up as more presses
        let repeating = key.kind == KeyEventKind::Repeat || self.is_held(code, now);
        self.held.insert(
            code,
            HeldKey {
                last_event: now,
                repeating,
            },
        );
        if repeating {
            return;
        }

        if code == self.quit || code == KeyCode::Esc {
            self.pending_controls.push(ControlAction::Quit);
        } else if code == self.pause {
            self.pending_controls.push(ControlAction::Pause);
        } else if code == self.restart {
            self.pending_controls.push(ControlAction::Restart);
        } else if code == self.copy_code {
            self.pending_controls.push(ControlAction::CopyRoomCode);
        }

        if let Some(kind) = self.player1.power_up_for(code) {
            self.pending_power_up[0] = Some(kind);
        }
        if let Some(kind) = self.player2.power_up_for(code) {
            self.pending_power_up[1] = Some(kind);
        }
    }

    fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        match self.held.get(&code) {
            Some(_) if self.releases_reported => true,
            Some(key) => {
                let window = if key.repeating { HOLD_WINDOW } else { INITIAL_HOLD_WINDOW };
                now.saturating_duration_since(key.last_event) < window
            }
            None => false,
        }
    }

    fn player_state(&self, keys: &PlayerKeys, now: Instant) -> InputState {
        InputState {
            left: self.is_held(keys.left, now),
            right: self.is_held(keys.right, now),
            up: self.is_held(keys.up, now),
            power_up: None,
        }
    }

    /// Current held state plus one-shot requests accumulated since the last sample
    pub fn sample(&mut self, now: Instant) -> FrameInput {
        let mut player1 = self.player_state(&self.player1, now);
        let mut player2 = self.player_state(&self.player2, now);
        player1.power_up = self.pending_power_up[0].take();
        player2.power_up = self.pending_power_up[1].take();

        FrameInput {
            player1,
            player2,
            controls: std::mem::take(&mut self.pending_controls),
        }
    }

    /// Drain pending terminal events without blocking and sample
    pub fn poll(&mut self) -> Result<FrameInput, std::io::Error> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, Instant::now());
            }
        }

        Ok(self.sample(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key("Up"), Some(KeyCode::Up));
        assert_eq!(parse_key("W"), Some(KeyCode::Char('w')));
        assert_eq!(parse_key("7"), Some(KeyCode::Char('7')));
        assert_eq!(parse_key("Space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("Nope"), None);
        assert_eq!(parse_key(""), None);
    }

    #[test]
    fn test_pressed_key_is_held_for_window() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let t0 = Instant::now();

        tracker.handle_key(press(KeyCode::Char('A')), t0);

        assert!(tracker.sample(t0 + Duration::from_millis(50)).player1.left);
        assert!(!tracker.sample(t0 + INITIAL_HOLD_WINDOW).player1.left);
    }

    #[test]
    fn test_hold_bridges_auto_repeat_delay() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let t0 = Instant::now();

        tracker.handle_key(press(KeyCode::Char('a')), t0);
        // first auto-repeat typically lands a few hundred ms later
        assert!(tracker.sample(t0 + Duration::from_millis(400)).player1.left);

        let repeat_at = t0 + Duration::from_millis(450);
        tracker.handle_key(press(KeyCode::Char('a')), repeat_at);
        assert!(tracker.sample(repeat_at + Duration::from_millis(100)).player1.left);
        assert!(!tracker.sample(repeat_at + HOLD_WINDOW).player1.left);
    }

    #[test]
    fn test_auto_repeat_does_not_retrigger_controls() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let t0 = Instant::now();

        tracker.handle_key(press(KeyCode::Char('p')), t0);
        tracker.handle_key(press(KeyCode::Char('p')), t0 + Duration::from_millis(450));
        tracker.handle_key(press(KeyCode::Char('p')), t0 + Duration::from_millis(480));
        assert_eq!(tracker.sample(t0).controls, vec![ControlAction::Pause]);

        // a fresh press after the key went idle counts again
        tracker.handle_key(press(KeyCode::Char('p')), t0 + Duration::from_secs(2));
        assert_eq!(tracker.sample(t0).controls, vec![ControlAction::Pause]);
    }

    #[test]
    fn test_release_events_end_hold() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let t0 = Instant::now();

        tracker.handle_key(press(KeyCode::Right), t0);
        tracker.handle_key(release(KeyCode::Up), t0);

        // release support detected, hold no longer times out
        assert!(tracker.sample(t0 + Duration::from_secs(2)).player2.right);

        tracker.handle_key(release(KeyCode::Right), t0 + Duration::from_secs(2));
        assert!(!tracker.sample(t0 + Duration::from_secs(2)).player2.right);
    }

    #[test]
    fn test_power_up_request_is_one_shot() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let t0 = Instant::now();

        tracker.handle_key(press(KeyCode::Char('1')), t0);
        tracker.handle_key(press(KeyCode::Char('0')), t0);

        let first = tracker.sample(t0);
        assert_eq!(first.player1.power_up, Some(PowerUpType::Freeze));
        assert_eq!(first.player2.power_up, Some(PowerUpType::Fireball));

        let second = tracker.sample(t0);
        assert_eq!(second.player1.power_up, None);
        assert_eq!(second.player2.power_up, None);
    }

    #[test]
    fn test_control_keys() {
        let mut tracker = InputTracker::new(&KeyBindings::default());
        let t0 = Instant::now();

        tracker.handle_key(press(KeyCode::Char('p')), t0);
        tracker.handle_key(press(KeyCode::Char('Q')), t0);

        assert_eq!(
            tracker.sample(t0).controls,
            vec![ControlAction::Pause, ControlAction::Quit]
        );
        assert!(tracker.sample(t0).controls.is_empty());
    }

    #[test]
    fn test_movement_changed_ignores_power_up() {
        let a = InputState {
            left: true,
            ..InputState::default()
        };
        let b = InputState {
            power_up: Some(PowerUpType::Speed),
            ..a
        };

        assert!(!a.movement_changed(&b));
        assert!(a.movement_changed(&InputState::default()));
    }
}
