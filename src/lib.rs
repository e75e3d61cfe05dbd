// Head Ball: terminal football with an AI opponent, local two player and
// relay-backed online play

pub mod ai;
pub mod config;
pub mod debug;
pub mod game;
pub mod game_modes;
pub mod leaderboard;
pub mod menu;
pub mod network;
pub mod relay;
pub mod replay;
pub mod simulation;
pub mod ui;
