// Configuration module for Head Ball
// Loads game settings from a TOML file in the user's config directory

pub mod loader;
pub mod types;

pub use loader::{create_default_config, get_config_path, load_config};
pub use types::{
    AIConfig, Config, DisplayConfig, KeyBindings, LeaderboardConfig, MatchRulesConfig,
    NetworkConfig,
};
