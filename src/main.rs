use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use headball::ai::BotType;
use headball::config::{self, Config};
use headball::leaderboard::fetch_in_background;
use headball::menu::{self, AppState, GameMode, LeaderboardView, MenuAction, MenuKeys, MenuState};
use headball::{debug, game_modes, replay};

#[derive(Debug, Default)]
struct CliOptions {
    debug: bool,
    record: Option<PathBuf>,
    replay: Option<PathBuf>,
}

fn main() -> Result<(), io::Error> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args);

    debug::init(options.debug)?;

    if let Some(path) = options.replay {
        return run_replay(&path);
    }

    let config = config::load_config()?;
    info!("Config loaded from {}", config::get_config_path().display());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    // Release events only arrive with the kitty keyboard protocol
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    info!("Key release events {}", if enhanced { "enabled" } else { "unavailable" });
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config, options.record);

    // Restore terminal
    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn parse_args(args: &[String]) -> CliOptions {
    let program = args.first().map(String::as_str).unwrap_or("headball");
    let mut options = CliOptions::default();
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--debug" | "-d" => options.debug = true,
            "--record" => match rest.next() {
                Some(path) => options.record = Some(PathBuf::from(path)),
                None => {
                    eprintln!("Error: --record requires a file path");
                    std::process::exit(1);
                }
            },
            "--replay" => match rest.next() {
                Some(path) => options.replay = Some(PathBuf::from(path)),
                None => {
                    eprintln!("Error: --replay requires a file path");
                    std::process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(program);
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage(program);
                std::process::exit(1);
            }
        }
    }

    options
}

fn print_usage(program: &str) {
    println!("Head Ball - Terminal Football");
    println!();
    println!("Usage:");
    println!("  {}                        # Start at the main menu", program);
    println!("  {} --debug                # Log to {}", program, debug::LOG_FILE_PATH);
    println!("  {} --record <file>        # Save a replay of the last match played", program);
    println!("  {} --replay <file>        # Re-simulate a replay and print the result", program);
    println!();
    println!("Config: {}", config::get_config_path().display());
}

/// Headless: rebuild the match from its inputs and print how it ended
fn run_replay(path: &std::path::Path) -> Result<(), io::Error> {
    let log = replay::ReplayLog::load(path)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:#}", e)))?;
    let states = replay::replay(&log);
    println!("Seed {}: {}", log.seed, replay::summarize(&states));
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    record: Option<PathBuf>,
) -> Result<(), io::Error> {
    let default_bot = BotType::from_name(&config.ai.difficulty).unwrap_or_else(|| {
        warn!("Unknown AI difficulty '{}', using medium", config.ai.difficulty);
        BotType::Medium
    });
    let mut menu_state = MenuState::new().with_default_bot(default_bot);
    let menu_keys = MenuKeys::new(&config.keybindings);
    let mut app_state = AppState::Menu;
    let record = record.as_deref();

    loop {
        app_state = match app_state {
            AppState::Menu => {
                terminal.draw(|f| menu::render_menu(f, &menu_state))?;
                match menu::handle_menu_input(&mut menu_state, &menu_keys)? {
                    MenuAction::None => AppState::Menu,
                    MenuAction::StartGame(mode) => AppState::Game(mode),
                    MenuAction::ShowLeaderboard => AppState::Leaderboard,
                    MenuAction::Quit => AppState::Exiting,
                }
            }
            AppState::Game(mode) => {
                let notice = match mode {
                    GameMode::VsAi(bot_type) => {
                        game_modes::run_game_vs_ai(terminal, config, bot_type, record)?
                    }
                    GameMode::LocalTwoPlayer => game_modes::run_game_local(terminal, config, record)?,
                    GameMode::OnlineHost => {
                        game_modes::run_game_network_host(terminal, config, record)?
                    }
                    GameMode::OnlineJoin(code) => {
                        game_modes::run_game_network_client(terminal, config, &code)?
                    }
                };
                menu_state.notice = notice;
                AppState::Menu
            }
            AppState::Leaderboard => {
                show_leaderboard(terminal, config)?;
                AppState::Menu
            }
            AppState::Exiting => return Ok(()),
        };
    }
}

fn show_leaderboard<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
) -> Result<(), io::Error> {
    let (mut view, pending) = if config.leaderboard.is_enabled() {
        let rx = fetch_in_background(config.leaderboard.base_url.clone(), config.leaderboard.top_limit);
        (LeaderboardView::Loading, Some(rx))
    } else {
        (LeaderboardView::Disabled, None)
    };

    loop {
        if let Some(rx) = &pending {
            if let Ok(outcome) = rx.try_recv() {
                view = match outcome {
                    Ok(entries) => LeaderboardView::Loaded(entries),
                    Err(message) => LeaderboardView::Failed(message),
                };
            }
        }

        terminal.draw(|f| menu::render_leaderboard(f, &view))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(
                        key.code,
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
                    )
                {
                    return Ok(());
                }
            }
        }
    }
}
