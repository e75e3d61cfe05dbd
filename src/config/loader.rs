// Configuration file loading and creation

use super::types::Config;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Get the path to the configuration file
pub fn get_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("headball");

    fs::create_dir_all(&path).ok();

    path.push("config.toml");
    path
}

/// Load configuration from file, or create default if it doesn't exist
pub fn load_config() -> Result<Config, io::Error> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, io::Error> {
    if !path.exists() {
        create_default_config(path)?;
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path)?;
    Ok(parse_config(&contents))
}

/// A file that fails to parse falls back to defaults instead of aborting
pub fn parse_config(contents: &str) -> Config {
    match toml::from_str(contents) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Create a default configuration file with helpful comments
pub fn create_default_config(path: &Path) -> Result<(), io::Error> {
    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let commented_toml = format!(
        "# Head Ball Configuration File\n\
         # Restart the game after editing for changes to take effect\n\
         #\n\
         # Key binding format: \"Up\", \"Down\", \"Left\", \"Right\", \"Enter\", \"Esc\", \"Space\"\n\
         #                     or single characters like \"W\", \"A\", \"1\"\n\
         # Power-up keys are listed as Freeze, Speed, Enlarge Ball, Fireball\n\
         #\n\
         # Colors: RGB values from 0-255\n\
         #\n\
         # AI difficulties: \"easy\", \"medium\", \"hard\"\n\
         # fixed_seed = 0 picks a random seed for every match\n\n\
         {}",
        toml_string
    );

    fs::write(path, commented_toml)?;
    info!("Created default config file at: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serialization() {
        let config = Config::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        let parsed: Config = toml::from_str(&toml_string).unwrap();

        assert_eq!(
            parsed.match_rules.duration_secs,
            config.match_rules.duration_secs
        );
        assert_eq!(
            parsed.keybindings.player1_power_ups,
            config.keybindings.player1_power_ups
        );
        assert_eq!(parsed.network.relay_url, config.network.relay_url);
        assert_eq!(parsed.display.target_fps, config.display.target_fps);
        assert_eq!(parsed.ai.difficulty, config.ai.difficulty);
    }

    #[test]
    fn test_partial_config_with_defaults() {
        let partial_toml = r#"
            [match_rules]
            duration_secs = 60

            [keybindings]
            player1_jump = "Space"
        "#;

        let config: Config = toml::from_str(partial_toml).unwrap();

        assert_eq!(config.match_rules.duration_secs, 60);
        assert_eq!(config.keybindings.player1_jump, "Space");

        assert_eq!(config.match_rules.goal_pause_ms, 1500);
        assert_eq!(config.keybindings.player1_left, "A");
        assert_eq!(config.network.connection_timeout_secs, 10);
        assert!(!config.leaderboard.is_enabled());
    }

    #[test]
    fn test_broken_file_falls_back_to_defaults() {
        let config = parse_config("[match_rules\nduration_secs = ");
        assert_eq!(config.match_rules.duration_secs, 90);
    }

    #[test]
    fn test_missing_file_is_created() {
        let dir = std::env::temp_dir().join(format!("headball-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let _ = fs::remove_file(&path);

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.ai.difficulty, "medium");

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Head Ball Configuration File"));
        assert_eq!(parse_config(&written).keybindings.pause, "P");

        let _ = fs::remove_dir_all(&dir);
    }
}
