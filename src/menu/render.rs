// Menu rendering with Ratatui

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::state::{LeaderboardView, MenuState};
use crate::ui::{render_overlay, OverlayMessage};

const TITLE: [&str; 5] = [
    "██╗  ██╗███████╗ █████╗ ██████╗     ██████╗  █████╗ ██╗     ██╗     ",
    "██║  ██║██╔════╝██╔══██╗██╔══██╗    ██╔══██╗██╔══██╗██║     ██║     ",
    "███████║█████╗  ███████║██║  ██║    ██████╔╝███████║██║     ██║     ",
    "██╔══██║██╔══╝  ██╔══██║██║  ██║    ██╔══██╗██╔══██║██║     ██║     ",
    "██║  ██║███████╗██║  ██║██████╔╝    ██████╔╝██║  ██║███████╗███████╗",
];

fn background(frame: &mut Frame) {
    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, frame.area());
}

fn key_hint(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            format!(": {}", action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn selectable(text: String, selected: bool) -> Line<'static> {
    if selected {
        Line::from(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(text, Style::default().fg(Color::White)))
    }
}

/// Bordered dialog centered on screen, returns its inner area
fn dialog(frame: &mut Frame, title: &str, width: u16, height: u16) -> Rect {
    let area = frame.area();
    let dialog_area = Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    };

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Rgb(20, 20, 20))),
        dialog_area,
    );

    dialog_area.inner(Margin::new(2, 1))
}

pub fn render_menu(frame: &mut Frame, menu_state: &MenuState) {
    background(frame);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Title
            Constraint::Min(8),    // Items
            Constraint::Length(2), // Notice
            Constraint::Length(2), // Controls
        ])
        .split(frame.area());

    let mut title_lines = vec![Line::from("")];
    title_lines.extend(TITLE.iter().map(|row| {
        Line::from(Span::styled(
            *row,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    }));
    frame.render_widget(Paragraph::new(title_lines).alignment(Alignment::Center), chunks[0]);

    let items: Vec<Line> = menu_state
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let selected = i == menu_state.selected_index;
            let prefix = if selected { "  > " } else { "    " };
            selectable(format!("{}{}", prefix, item.display_text()), selected)
        })
        .collect();
    frame.render_widget(Paragraph::new(items).alignment(Alignment::Center), chunks[1]);

    if let Some(ref notice) = menu_state.notice {
        frame.render_widget(
            Paragraph::new(notice.as_str())
                .style(Style::default().fg(Color::LightRed))
                .alignment(Alignment::Center),
            chunks[2],
        );
    }

    frame.render_widget(
        Paragraph::new(key_hint(&[("↑/↓", "Navigate"), ("Enter", "Select"), ("Q/Esc", "Quit")]))
            .alignment(Alignment::Center),
        chunks[3],
    );

    if menu_state.in_input_mode {
        render_code_dialog(frame, &menu_state.code_input);
    } else if menu_state.in_bot_selection_mode {
        render_bot_dialog(frame, menu_state);
    }
}

fn render_code_dialog(frame: &mut Frame, code: &str) {
    let inner = dialog(frame, "Enter Room Code", 44, 7);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let input = if code.is_empty() {
        Span::styled("(type or Ctrl+V the 6-character code)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            code.to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(input)).alignment(Alignment::Center), rows[0]);
    frame.render_widget(
        Paragraph::new(key_hint(&[("Enter", "Join"), ("Esc", "Cancel")])).alignment(Alignment::Center),
        rows[2],
    );
}

fn render_bot_dialog(frame: &mut Frame, menu_state: &MenuState) {
    let height = menu_state.bot_types.len() as u16 * 2 + 5;
    let inner = dialog(frame, "Choose Opponent", 56, height);

    let mut lines = Vec::new();
    for (i, bot) in menu_state.bot_types.iter().enumerate() {
        let selected = i == menu_state.selected_bot_index;
        let prefix = if selected { "> " } else { "  " };
        lines.push(selectable(format!("{}{}", prefix, bot.display_name()), selected));
        lines.push(Line::from(Span::styled(
            bot.description().to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(key_hint(&[("Enter", "Play"), ("Esc", "Back")]));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Host lobby: show the room code until a guest joins
pub fn render_waiting_for_connection(
    frame: &mut Frame,
    room_code: Option<&str>,
    copy_feedback: &str,
    overlay: Option<&OverlayMessage>,
) {
    background(frame);
    let area = frame.area();

    let (heading, code) = match room_code {
        Some(code) => ("Waiting for opponent...", code),
        None => ("Connecting to relay...", "------"),
    };

    let lines = vec![
        Line::from(Span::styled(
            heading,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Share this room code:", Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled(
            code.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(copy_feedback.to_string(), Style::default().fg(Color::Green))),
        key_hint(&[("C", "Copy code"), ("Q", "Cancel")]),
    ];

    let box_area = Rect {
        x: area.width.saturating_sub(40) / 2,
        y: area.height.saturating_sub(10) / 2,
        width: 40.min(area.width),
        height: 10.min(area.height),
    };
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .style(Style::default().bg(Color::Rgb(20, 20, 20))),
        ),
        box_area,
    );

    if let Some(message) = overlay {
        render_overlay(frame, message, area);
    }
}

/// Guest side while the relay connection opens
pub fn render_connecting_to_room(frame: &mut Frame, room_code: &str, overlay: Option<&OverlayMessage>) {
    background(frame);
    let area = frame.area();

    let lines = vec![
        Line::from(Span::styled(
            format!("Joining room {}...", room_code),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key_hint(&[("Q", "Cancel")]),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        Rect {
            x: area.x,
            y: area.y + area.height / 2 - area.height.min(2) / 2,
            width: area.width,
            height: 3.min(area.height),
        },
    );

    if let Some(message) = overlay {
        render_overlay(frame, message, area);
    }
}

pub fn render_leaderboard(frame: &mut Frame, view: &LeaderboardView) {
    background(frame);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4), Constraint::Length(2)])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "TOP SCORES",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center),
        chunks[0].inner(Margin::new(0, 1)),
    );

    let lines: Vec<Line> = match view {
        LeaderboardView::Disabled => vec![Line::from(Span::styled(
            "Set leaderboard.base_url in the config file to enable scores",
            Style::default().fg(Color::DarkGray),
        ))],
        LeaderboardView::Loading => vec![Line::from("Loading...")],
        LeaderboardView::Failed(message) => vec![Line::from(Span::styled(
            format!("Could not load scores: {}", message),
            Style::default().fg(Color::LightRed),
        ))],
        LeaderboardView::Loaded(entries) if entries.is_empty() => {
            vec![Line::from("No scores yet")]
        }
        LeaderboardView::Loaded(entries) => entries
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                Line::from(vec![
                    Span::styled(format!("{:>3}. ", rank + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{:<20}", entry.player_name), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("{:>8}", entry.score),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect(),
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);

    frame.render_widget(
        Paragraph::new(key_hint(&[("Q/Esc", "Back")])).alignment(Alignment::Center),
        chunks[2],
    );
}
