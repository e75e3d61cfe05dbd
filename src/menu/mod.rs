// Menu module for Head Ball
// Main menu, bot and room-code dialogs, lobby and leaderboard screens

pub mod input;
pub mod render;
pub mod state;

pub use input::{handle_menu_input, try_paste_from_clipboard, MenuAction, MenuKeys};
pub use render::{
    render_connecting_to_room, render_leaderboard, render_menu, render_waiting_for_connection,
};
pub use state::{AppState, GameMode, LeaderboardView, MenuItem, MenuState};
