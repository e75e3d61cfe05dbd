// Menu state management and game mode definitions

use crate::ai::BotType;
use crate::leaderboard::ScoreEntry;
use crate::network::protocol::{normalize_room_code, ROOM_CODE_LEN};

/// Application state machine
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Menu,
    Game(GameMode),
    Leaderboard,
    Exiting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameMode {
    /// Player 1 against a bot
    VsAi(BotType),
    /// Two players on the same keyboard
    LocalTwoPlayer,
    /// Create a relay room and wait for a guest
    OnlineHost,
    /// Join the relay room with this code
    OnlineJoin(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuItem {
    VsAi,
    LocalTwoPlayer,
    HostOnline,
    JoinOnline,
    Leaderboard,
    Quit,
}

impl MenuItem {
    pub fn display_text(&self) -> &str {
        match self {
            MenuItem::VsAi => "Play vs AI",
            MenuItem::LocalTwoPlayer => "Local 2-Player",
            MenuItem::HostOnline => "Host Online Game",
            MenuItem::JoinOnline => "Join Online Game",
            MenuItem::Leaderboard => "Leaderboard",
            MenuItem::Quit => "Quit",
        }
    }

    pub fn all() -> Vec<MenuItem> {
        vec![
            MenuItem::VsAi,
            MenuItem::LocalTwoPlayer,
            MenuItem::HostOnline,
            MenuItem::JoinOnline,
            MenuItem::Leaderboard,
            MenuItem::Quit,
        ]
    }
}

/// What the leaderboard screen currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum LeaderboardView {
    /// No `leaderboard.base_url` configured
    Disabled,
    Loading,
    Loaded(Vec<ScoreEntry>),
    Failed(String),
}

fn wrap_previous(index: usize, len: usize) -> usize {
    if index == 0 {
        len.saturating_sub(1)
    } else {
        index - 1
    }
}

fn wrap_next(index: usize, len: usize) -> usize {
    if index + 1 >= len {
        0
    } else {
        index + 1
    }
}

pub struct MenuState {
    pub selected_index: usize,
    pub items: Vec<MenuItem>,

    /// Room code typed for Join
    pub code_input: String,
    pub in_input_mode: bool,

    pub bot_types: Vec<BotType>,
    pub selected_bot_index: usize,
    pub in_bot_selection_mode: bool,

    /// Shown under the menu, e.g. why the last online match ended
    pub notice: Option<String>,
}

impl MenuState {
    pub fn new() -> Self {
        Self {
            selected_index: 0,
            items: MenuItem::all(),
            code_input: String::new(),
            in_input_mode: false,
            bot_types: BotType::all(),
            selected_bot_index: 1,
            in_bot_selection_mode: false,
            notice: None,
        }
    }

    /// Start bot selection on the configured difficulty
    pub fn with_default_bot(mut self, bot_type: BotType) -> Self {
        if let Some(index) = self.bot_types.iter().position(|b| *b == bot_type) {
            self.selected_bot_index = index;
        }
        self
    }

    pub fn selected_item(&self) -> MenuItem {
        self.items[self.selected_index]
    }

    pub fn select_previous(&mut self) {
        self.selected_index = wrap_previous(self.selected_index, self.items.len());
    }

    pub fn select_next(&mut self) {
        self.selected_index = wrap_next(self.selected_index, self.items.len());
    }

    pub fn start_code_input(&mut self) {
        self.in_input_mode = true;
        self.code_input.clear();
    }

    pub fn cancel_code_input(&mut self) {
        self.in_input_mode = false;
        self.code_input.clear();
    }

    /// Leave input mode with the normalized code
    pub fn submit_code(&mut self) -> String {
        self.in_input_mode = false;
        normalize_room_code(&self.code_input)
    }

    /// Letters and digits only, capped at the code length
    pub fn add_char_to_code(&mut self, c: char) {
        if c.is_ascii_alphanumeric() && self.code_input.len() < ROOM_CODE_LEN {
            self.code_input.push(c.to_ascii_uppercase());
        }
    }

    pub fn backspace_code(&mut self) {
        self.code_input.pop();
    }

    pub fn start_bot_selection(&mut self) {
        self.in_bot_selection_mode = true;
    }

    pub fn cancel_bot_selection(&mut self) {
        self.in_bot_selection_mode = false;
    }

    pub fn selected_bot(&self) -> BotType {
        self.bot_types[self.selected_bot_index]
    }

    pub fn select_previous_bot(&mut self) {
        self.selected_bot_index = wrap_previous(self.selected_bot_index, self.bot_types.len());
    }

    pub fn select_next_bot(&mut self) {
        self.selected_bot_index = wrap_next(self.selected_bot_index, self.bot_types.len());
    }

    pub fn submit_bot_selection(&mut self) -> BotType {
        self.in_bot_selection_mode = false;
        self.selected_bot()
    }
}

impl Default for MenuState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_wraps() {
        let mut menu = MenuState::new();
        menu.select_previous();
        assert_eq!(menu.selected_item(), MenuItem::Quit);
        menu.select_next();
        assert_eq!(menu.selected_item(), MenuItem::VsAi);
    }

    #[test]
    fn test_code_input_filters_and_caps() {
        let mut menu = MenuState::new();
        menu.start_code_input();
        for c in "ab-12 3456".chars() {
            menu.add_char_to_code(c);
        }
        assert_eq!(menu.code_input, "AB1234");

        menu.backspace_code();
        assert_eq!(menu.submit_code(), "AB123");
        assert!(!menu.in_input_mode);
    }

    #[test]
    fn test_default_bot() {
        let mut menu = MenuState::new().with_default_bot(BotType::Hard);
        assert_eq!(menu.selected_bot(), BotType::Hard);
        menu.select_next_bot();
        assert_eq!(menu.selected_bot(), BotType::Easy);
    }
}
