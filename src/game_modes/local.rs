use std::io;
use std::path::Path;

use ratatui::Terminal;
use tracing::info;

use crate::config::Config;
use crate::simulation::Coordinator;

use super::common::{match_rules, match_seed, run_match};

/// Two players, one keyboard
pub fn run_game_local<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    record: Option<&Path>,
) -> Result<Option<String>, io::Error> {
    let seed = match_seed(config);
    info!("Local two player mode, seed {}", seed);

    let coordinator = Coordinator::local(seed, match_rules(config));
    run_match(terminal, config, coordinator, None, "Local 2P", record)
}
