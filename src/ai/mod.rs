// AI module for bot opponents

mod bot;
pub mod controller;
mod header_bot;
pub mod prediction;

pub use bot::Bot;
pub use controller::{classify, compute_ai_input, AiMode};
pub use header_bot::{HeaderBot, HeaderBotConfig};

/// Bot type selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotType {
    /// Easy bot - frequent misjudged jumps and wide aim
    Easy,
    /// Medium bot - solid positioning, occasional mistakes
    Medium,
    /// Hard bot - rarely wrong, uses power-ups often
    Hard,
}

impl BotType {
    /// Get display name for bot type
    pub fn display_name(&self) -> &str {
        match self {
            BotType::Easy => "Easy",
            BotType::Medium => "Medium",
            BotType::Hard => "Hard",
        }
    }

    /// Get description for bot type
    pub fn description(&self) -> &str {
        match self {
            BotType::Easy => "Beginner-friendly - makes frequent mistakes",
            BotType::Medium => "Balanced opponent - reads the ball well",
            BotType::Hard => "Competitive opponent - occasional errors",
        }
    }

    /// Probability-style difficulty fed to the controller
    pub fn difficulty(&self) -> f32 {
        match self {
            BotType::Easy => 0.55,
            BotType::Medium => 0.75,
            BotType::Hard => 0.92,
        }
    }

    fn power_up_chance(&self) -> f32 {
        match self {
            BotType::Easy => 0.002,
            BotType::Medium => 0.004,
            BotType::Hard => 0.006,
        }
    }

    /// Parse the `ai.difficulty` config value ("easy", "medium", "hard")
    pub fn from_name(name: &str) -> Option<BotType> {
        match name.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(BotType::Easy),
            "medium" => Some(BotType::Medium),
            "hard" => Some(BotType::Hard),
            _ => None,
        }
    }

    /// Get all available bot types
    pub fn all() -> Vec<BotType> {
        vec![BotType::Easy, BotType::Medium, BotType::Hard]
    }
}

/// Create a bot instance from a bot type
pub fn create_bot(bot_type: BotType, seed: u64) -> Box<dyn Bot> {
    Box::new(HeaderBot::new(
        HeaderBotConfig {
            name: bot_type.display_name().to_string(),
            difficulty: bot_type.difficulty(),
            power_up_chance: bot_type.power_up_chance(),
        },
        seed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_ordering() {
        assert!(BotType::Easy.difficulty() < BotType::Medium.difficulty());
        assert!(BotType::Medium.difficulty() < BotType::Hard.difficulty());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(BotType::from_name("Hard"), Some(BotType::Hard));
        assert_eq!(BotType::from_name(" easy "), Some(BotType::Easy));
        assert_eq!(BotType::from_name("impossible"), None);
        assert_eq!(create_bot(BotType::Medium, 0).name(), "Medium");
    }
}
