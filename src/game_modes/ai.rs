use std::io;
use std::path::Path;

use ratatui::Terminal;
use tracing::info;

use crate::ai::BotType;
use crate::config::Config;
use crate::simulation::Coordinator;

use super::common::{match_rules, match_seed, run_match};

/// Run single-player game against AI
pub fn run_game_vs_ai<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    bot_type: BotType,
    record: Option<&Path>,
) -> Result<Option<String>, io::Error> {
    let seed = match_seed(config);
    info!("Single player vs AI mode: {:?}, seed {}", bot_type, seed);

    let coordinator = Coordinator::vs_ai(bot_type, seed, match_rules(config));
    let label = format!("vs {}", bot_type.display_name());

    run_match(terminal, config, coordinator, None, &label, record)
}
