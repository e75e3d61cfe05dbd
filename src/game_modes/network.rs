use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::menu;
use crate::network::protocol::generate_room_code;
use crate::network::{self, NetworkClient, NetworkEvent};
use crate::simulation::Coordinator;
use crate::ui::OverlayMessage;

use super::common::{copy_to_clipboard, match_rules, match_seed, run_match};

/// Which lobby screen to draw while waiting
#[derive(Debug, Clone, Copy, PartialEq)]
enum Lobby {
    Host,
    Guest,
}

/// Create a room with a fresh code and wait for someone to join it
pub fn run_game_network_host<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    record: Option<&Path>,
) -> Result<Option<String>, io::Error> {
    let code = generate_room_code(&mut rand::thread_rng());
    info!("Network host mode, room {}", code);

    let client = connect(config, &code)?;
    let coordinator = Coordinator::online(match_seed(config), match_rules(config));

    run_online(terminal, config, client, coordinator, Lobby::Host, record)
}

/// Join an existing room
pub fn run_game_network_client<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    room_code: &str,
) -> Result<Option<String>, io::Error> {
    info!("Network client mode, room {}", room_code);

    let client = connect(config, room_code)?;
    let mut coordinator = Coordinator::online(match_seed(config), match_rules(config));
    coordinator.set_room_code(room_code.to_string());

    run_online(terminal, config, client, coordinator, Lobby::Guest, None)
}

fn connect(config: &Config, code: &str) -> io::Result<NetworkClient> {
    network::start_network(
        &config.network.relay_url,
        code,
        Duration::from_secs(config.network.connection_timeout_secs),
    )
}

fn run_online<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: &Config,
    mut client: NetworkClient,
    mut coordinator: Coordinator,
    lobby: Lobby,
    record: Option<&Path>,
) -> Result<Option<String>, io::Error> {
    if !wait_for_opponent(terminal, &mut client, &mut coordinator, lobby)? {
        let _ = client.disconnect();
        return Ok(None);
    }

    let label = match (lobby, coordinator.room_code()) {
        (Lobby::Host, Some(code)) => format!("Online host [{}]", code),
        (Lobby::Guest, Some(code)) => format!("Online guest [{}]", code),
        _ => "Online".to_string(),
    };
    run_match(terminal, config, coordinator, Some(client), &label, record)
}

/// Drive the lobby until GAME_START assigns a role.
/// Returns false when the player cancelled or acknowledged a failure.
fn wait_for_opponent<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    client: &mut NetworkClient,
    coordinator: &mut Coordinator,
    lobby: Lobby,
) -> Result<bool, io::Error> {
    let mut copy_feedback = String::new();
    debug!("Waiting for opponent as {:?}", lobby);

    loop {
        // Q to cancel, C to copy
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            debug!("Player cancelled the lobby");
                            return Ok(false);
                        }
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            if let Some(code) = coordinator.room_code() {
                                copy_feedback = copy_to_clipboard(code);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        while let Some(event) = client.try_recv_event() {
            match event {
                NetworkEvent::Opened => debug!("Connected to relay"),
                NetworkEvent::Message(msg) => {
                    debug!("Lobby received {}", msg.kind());
                    coordinator.handle_message(msg);
                }
                NetworkEvent::Closed | NetworkEvent::Error(_) => {
                    coordinator.handle_connection_lost(client.status());
                }
            }
        }

        if coordinator.is_finished() {
            let reason = coordinator
                .notice()
                .unwrap_or("Connection closed")
                .to_string();
            warn!("Lobby failed: {}", reason);
            show_failure(terminal, coordinator, lobby, &copy_feedback, &reason)?;
            return Ok(false);
        }

        if coordinator.role().is_some() {
            return Ok(true);
        }

        terminal.draw(|f| draw_lobby(f, coordinator, lobby, &copy_feedback, None))?;
    }
}

fn draw_lobby(
    frame: &mut ratatui::Frame,
    coordinator: &Coordinator,
    lobby: Lobby,
    copy_feedback: &str,
    overlay: Option<&OverlayMessage>,
) {
    match lobby {
        Lobby::Host => {
            menu::render_waiting_for_connection(frame, coordinator.room_code(), copy_feedback, overlay)
        }
        Lobby::Guest => menu::render_connecting_to_room(
            frame,
            coordinator.room_code().unwrap_or_default(),
            overlay,
        ),
    }
}

/// Error overlay on top of the lobby until the player presses Q
fn show_failure<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    coordinator: &Coordinator,
    lobby: Lobby,
    copy_feedback: &str,
    reason: &str,
) -> Result<(), io::Error> {
    let overlay = OverlayMessage::error(vec![
        "Connection Failed".to_string(),
        String::new(),
        reason.to_string(),
        String::new(),
        "Press Q to return to menu".to_string(),
    ]);

    loop {
        terminal.draw(|f| draw_lobby(f, coordinator, lobby, copy_feedback, Some(&overlay)))?;

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
