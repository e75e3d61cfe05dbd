// Menu input handling

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;

use super::state::{GameMode, MenuItem, MenuState};
use crate::config::KeyBindings;
use crate::game::input::{normalize_key, parse_key};
use crate::network::protocol::is_valid_room_code;

pub enum MenuAction {
    None,
    StartGame(GameMode),
    ShowLeaderboard,
    Quit,
}

/// Menu keys from `[keybindings]`; `k`/`j` always work as up/down too
#[derive(Debug, Clone, PartialEq)]
pub struct MenuKeys {
    up: KeyCode,
    down: KeyCode,
    select: KeyCode,
    back: KeyCode,
    quit: KeyCode,
}

impl MenuKeys {
    pub fn new(bindings: &KeyBindings) -> Self {
        let bind = |key_str: &str, fallback| parse_key(key_str).unwrap_or(fallback);
        Self {
            up: bind(&bindings.menu_up, KeyCode::Up),
            down: bind(&bindings.menu_down, KeyCode::Down),
            select: bind(&bindings.menu_select, KeyCode::Enter),
            back: bind(&bindings.menu_back, KeyCode::Esc),
            quit: bind(&bindings.quit, KeyCode::Char('q')),
        }
    }

    fn is_up(&self, code: KeyCode) -> bool {
        code == self.up || code == KeyCode::Char('k')
    }

    fn is_down(&self, code: KeyCode) -> bool {
        code == self.down || code == KeyCode::Char('j')
    }
}

impl Default for MenuKeys {
    fn default() -> Self {
        Self::new(&KeyBindings::default())
    }
}

pub fn handle_menu_input(
    menu_state: &mut MenuState,
    keys: &MenuKeys,
) -> Result<MenuAction, io::Error> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(handle_key_press(menu_state, keys, key));
            }
        }
    }

    Ok(MenuAction::None)
}

/// Clipboard text, if any; used to paste room codes
pub fn try_paste_from_clipboard() -> Option<String> {
    arboard::Clipboard::new()
        .and_then(|mut clipboard| clipboard.get_text())
        .ok()
}

fn handle_key_press(menu_state: &mut MenuState, keys: &MenuKeys, key: KeyEvent) -> MenuAction {
    if menu_state.in_bot_selection_mode {
        return handle_bot_selection_input(menu_state, keys, normalize_key(key.code));
    }

    if menu_state.in_input_mode {
        return handle_code_input(menu_state, keys, key);
    }

    let code = normalize_key(key.code);
    if keys.is_up(code) {
        menu_state.select_previous();
        MenuAction::None
    } else if keys.is_down(code) {
        menu_state.select_next();
        MenuAction::None
    } else if code == keys.select {
        handle_menu_selection(menu_state)
    } else if code == keys.back || code == keys.quit {
        MenuAction::Quit
    } else {
        MenuAction::None
    }
}

fn handle_menu_selection(menu_state: &mut MenuState) -> MenuAction {
    menu_state.notice = None;

    match menu_state.selected_item() {
        MenuItem::VsAi => {
            menu_state.start_bot_selection();
            MenuAction::None
        }
        MenuItem::LocalTwoPlayer => MenuAction::StartGame(GameMode::LocalTwoPlayer),
        MenuItem::HostOnline => MenuAction::StartGame(GameMode::OnlineHost),
        MenuItem::JoinOnline => {
            menu_state.start_code_input();
            MenuAction::None
        }
        MenuItem::Leaderboard => MenuAction::ShowLeaderboard,
        MenuItem::Quit => MenuAction::Quit,
    }
}

fn handle_code_input(menu_state: &mut MenuState, keys: &MenuKeys, key: KeyEvent) -> MenuAction {
    let paste = key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('v') | KeyCode::Char('V'));
    if paste {
        if let Some(text) = try_paste_from_clipboard() {
            for c in text.trim().chars() {
                menu_state.add_char_to_code(c);
            }
        }
        return MenuAction::None;
    }

    let code = normalize_key(key.code);
    if code == keys.select {
        let room = menu_state.submit_code();
        if is_valid_room_code(&room) {
            MenuAction::StartGame(GameMode::OnlineJoin(room))
        } else {
            menu_state.notice = Some("Room codes are 6 letters or digits".to_string());
            MenuAction::None
        }
    } else if code == keys.back {
        menu_state.cancel_code_input();
        MenuAction::None
    } else {
        match key.code {
            KeyCode::Backspace => menu_state.backspace_code(),
            KeyCode::Char(c) => menu_state.add_char_to_code(c),
            _ => {}
        }
        MenuAction::None
    }
}

fn handle_bot_selection_input(
    menu_state: &mut MenuState,
    keys: &MenuKeys,
    code: KeyCode,
) -> MenuAction {
    if keys.is_up(code) {
        menu_state.select_previous_bot();
        MenuAction::None
    } else if keys.is_down(code) {
        menu_state.select_next_bot();
        MenuAction::None
    } else if code == keys.select {
        let bot_type = menu_state.submit_bot_selection();
        MenuAction::StartGame(GameMode::VsAi(bot_type))
    } else if code == keys.back {
        menu_state.cancel_bot_selection();
        MenuAction::None
    } else {
        MenuAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::BotType;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_bot_selection_starts_ai_game() {
        let keys = MenuKeys::default();
        let mut menu = MenuState::new();
        assert!(matches!(handle_key_press(&mut menu, &keys, press(KeyCode::Enter)), MenuAction::None));
        assert!(menu.in_bot_selection_mode);

        handle_key_press(&mut menu, &keys, press(KeyCode::Down));
        match handle_key_press(&mut menu, &keys, press(KeyCode::Enter)) {
            MenuAction::StartGame(GameMode::VsAi(bot)) => assert_eq!(bot, BotType::Hard),
            _ => panic!("expected an AI game"),
        }
    }

    #[test]
    fn test_join_requires_valid_code() {
        let keys = MenuKeys::default();
        let mut menu = MenuState::new();
        menu.selected_index = 3;
        handle_key_press(&mut menu, &keys, press(KeyCode::Enter));
        assert!(menu.in_input_mode);

        for c in "12a".chars() {
            handle_key_press(&mut menu, &keys, press(KeyCode::Char(c)));
        }
        assert!(matches!(handle_key_press(&mut menu, &keys, press(KeyCode::Enter)), MenuAction::None));
        assert!(menu.notice.is_some());

        menu.start_code_input();
        for c in "12ab56".chars() {
            handle_key_press(&mut menu, &keys, press(KeyCode::Char(c)));
        }
        match handle_key_press(&mut menu, &keys, press(KeyCode::Enter)) {
            MenuAction::StartGame(GameMode::OnlineJoin(code)) => assert_eq!(code, "12AB56"),
            _ => panic!("expected a join"),
        }
    }

    #[test]
    fn test_menu_keys_follow_bindings() {
        let bindings = KeyBindings {
            menu_up: "W".to_string(),
            menu_down: "S".to_string(),
            menu_select: "Space".to_string(),
            menu_back: "Backspace".to_string(),
            ..KeyBindings::default()
        };
        let keys = MenuKeys::new(&bindings);
        let mut menu = MenuState::new();

        handle_key_press(&mut menu, &keys, press(KeyCode::Char('S')));
        assert_eq!(menu.selected_item(), MenuItem::LocalTwoPlayer);
        handle_key_press(&mut menu, &keys, press(KeyCode::Char('w')));
        assert_eq!(menu.selected_item(), MenuItem::VsAi);

        // defaults no longer act as select/back
        assert!(matches!(handle_key_press(&mut menu, &keys, press(KeyCode::Enter)), MenuAction::None));
        assert!(!menu.in_bot_selection_mode);
        assert!(matches!(handle_key_press(&mut menu, &keys, press(KeyCode::Esc)), MenuAction::None));

        handle_key_press(&mut menu, &keys, press(KeyCode::Char(' ')));
        assert!(menu.in_bot_selection_mode);
        handle_key_press(&mut menu, &keys, press(KeyCode::Backspace));
        assert!(!menu.in_bot_selection_mode);

        assert!(matches!(handle_key_press(&mut menu, &keys, press(KeyCode::Backspace)), MenuAction::Quit));
    }
}
