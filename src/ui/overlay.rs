// Centered message boxes drawn over the field (pause, goal, full time, errors)

use ratatui::{
    layout::{Alignment, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMessage {
    pub lines: Vec<String>,
    pub title: Option<String>,
    pub style: OverlayStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayStyle {
    /// Pause, lobby and full-time boxes
    Info,
    /// Goal celebration
    Success,
    /// Connection problems and relay errors
    Error,
}

impl OverlayStyle {
    /// (border, text)
    fn palette(self) -> (Color, Color) {
        match self {
            OverlayStyle::Info => (Color::Cyan, Color::White),
            OverlayStyle::Success => (Color::Green, Color::LightGreen),
            OverlayStyle::Error => (Color::Red, Color::LightRed),
        }
    }
}

impl OverlayMessage {
    fn styled(style: OverlayStyle, lines: Vec<String>) -> Self {
        Self {
            lines,
            title: None,
            style,
        }
    }

    pub fn info(lines: Vec<String>) -> Self {
        Self::styled(OverlayStyle::Info, lines)
    }

    pub fn success(lines: Vec<String>) -> Self {
        Self::styled(OverlayStyle::Success, lines)
    }

    pub fn error(lines: Vec<String>) -> Self {
        Self::styled(OverlayStyle::Error, lines)
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

/// Box sized to its text and centered in `area`
fn centered_box(message: &OverlayMessage, area: Rect) -> Rect {
    let widest = message
        .lines
        .iter()
        .map(|line| line.chars().count())
        .chain(message.title.iter().map(|t| t.chars().count() + 2))
        .max()
        .unwrap_or(0) as u16;

    let width = (widest + 6).min(area.width.saturating_sub(4)).max(1);
    let height = (message.lines.len() as u16 + 4).min(area.height.saturating_sub(2)).max(1);

    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn render_overlay(frame: &mut Frame, message: &OverlayMessage, area: Rect) {
    let (border, text) = message.style.palette();
    let overlay_area = centered_box(message, area);

    frame.render_widget(Clear, overlay_area);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));
    if let Some(ref title) = message.title {
        block = block.title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(border).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(block, overlay_area);

    let lines: Vec<Line> = message
        .lines
        .iter()
        .map(|line| Line::from(Span::styled(line.clone(), Style::default().fg(text))))
        .collect();

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        overlay_area.inner(Margin::new(2, 1)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 80, 24);
        let message = OverlayMessage::info(vec!["PAUSED".to_string(), String::new()]);

        let rect = centered_box(&message, area);
        assert_eq!((rect.width, rect.height), (12, 6));
        assert_eq!((rect.x, rect.y), (34, 9));

        let tiny = centered_box(&OverlayMessage::error(vec!["x".repeat(200)]), Rect::new(0, 0, 10, 3));
        assert!(tiny.width <= 6 && tiny.height <= 1);
    }
}
