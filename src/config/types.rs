// Head Ball configuration types
// Every section falls back to its defaults when missing from the file

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub match_rules: MatchRulesConfig,
    #[serde(default)]
    pub ai: AIConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyBindings {
    // Player 1 (also the local player in AI and online matches)
    pub player1_left: String,
    pub player1_right: String,
    pub player1_jump: String,
    // Freeze, Speed, Enlarge Ball, Fireball in that order
    pub player1_power_ups: Vec<String>,

    // Player 2 (local two-player mode only)
    pub player2_left: String,
    pub player2_right: String,
    pub player2_jump: String,
    pub player2_power_ups: Vec<String>,

    // Game controls
    pub quit: String,
    pub pause: String,
    pub restart: String,
    pub copy_code: String,

    // Menu controls
    pub menu_up: String,
    pub menu_down: String,
    pub menu_select: String,
    pub menu_back: String,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            player1_left: "A".to_string(),
            player1_right: "D".to_string(),
            player1_jump: "W".to_string(),
            player1_power_ups: keys(&["1", "2", "3", "4"]),
            player2_left: "Left".to_string(),
            player2_right: "Right".to_string(),
            player2_jump: "Up".to_string(),
            player2_power_ups: keys(&["7", "8", "9", "0"]),
            quit: "Q".to_string(),
            pause: "P".to_string(),
            restart: "R".to_string(),
            copy_code: "C".to_string(),
            menu_up: "Up".to_string(),
            menu_down: "Down".to_string(),
            menu_select: "Enter".to_string(),
            menu_back: "Esc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchRulesConfig {
    // Match length in seconds
    pub duration_secs: u32,

    // Pause after a goal before the ball is re-served
    pub goal_pause_ms: u64,

    // Seed for kickoffs and AI; 0 picks a fresh one every match
    pub fixed_seed: u64,
}

impl Default for MatchRulesConfig {
    fn default() -> Self {
        Self {
            duration_secs: 90,
            goal_pause_ms: 1500,
            fixed_seed: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AIConfig {
    // Preselected bot: "easy", "medium", "hard"
    pub difficulty: String,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            difficulty: "medium".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    // Render rate; the simulation itself always steps at most every 16 ms
    pub target_fps: u64,

    // RGB values 0-255
    pub player1_color: [u8; 3],
    pub player2_color: [u8; 3],
    pub ball_color: [u8; 3],
    pub field_color: [u8; 3],
    pub score_color: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            player1_color: [80, 160, 255],  // Blue
            player2_color: [255, 90, 90],   // Red
            ball_color: [255, 255, 255],    // White
            field_color: [100, 100, 100],   // Gray
            score_color: [255, 255, 255],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    // Relay server base URL, rooms live under /v1/room/<code>
    pub relay_url: String,

    // Give up on the relay after this many seconds
    pub connection_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            relay_url: "ws://127.0.0.1:8080".to_string(),
            connection_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    // Leaderboard REST base URL; empty disables fetching and submitting
    pub base_url: String,

    // Name submitted with scores
    pub player_name: String,

    // How many entries to fetch
    pub top_limit: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            player_name: "Player".to_string(),
            top_limit: 10,
        }
    }
}

impl LeaderboardConfig {
    pub fn is_enabled(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}
