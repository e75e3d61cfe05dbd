use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

use super::braille::BrailleCanvas;
use super::overlay::{render_overlay, OverlayMessage};
use crate::config::DisplayConfig;
use crate::game::physics::{FIELD_HEIGHT, FIELD_WIDTH, GOAL_POST_RADIUS, GOAL_TOP, GOAL_WIDTH, GROUND_Y};
use crate::game::powerups::{Cooldowns, PowerUpType};
use crate::game::state::{MatchState, Player, PlayerId};

// Layout: scoreboard row, effects row, braille field, controls/cooldown row
const HEADER_ROWS: u16 = 2;
const FOOTER_ROWS: u16 = 1;
const MIN_FIELD_ROWS: u16 = 4;

/// Text around the field that is not part of `MatchState`
pub struct Hud<'a> {
    pub mode_label: &'a str,
    /// Whose cooldowns to list in the footer
    pub local_players: &'a [PlayerId],
    /// `None` on a guest: cooldowns live on the host
    pub cooldowns: Option<&'a Cooldowns>,
    pub controls_hint: &'a str,
}

fn rgb(color: [u8; 3]) -> Color {
    Color::Rgb(color[0], color[1], color[2])
}

pub fn render(
    frame: &mut Frame,
    state: &MatchState,
    hud: &Hud,
    overlay: Option<&OverlayMessage>,
    display: &DisplayConfig,
) {
    let area = frame.area();

    let bg = Block::default().style(Style::default().bg(Color::Rgb(0, 0, 0)));
    frame.render_widget(bg, area);

    if area.height < HEADER_ROWS + FOOTER_ROWS + MIN_FIELD_ROWS || area.width < 20 {
        frame.render_widget(
            Paragraph::new("Terminal too small").style(Style::default().fg(Color::Yellow)),
            area,
        );
        return;
    }

    draw_scoreboard(frame, state, hud, display, row(area, 0));
    draw_effects(frame, state, row(area, 1));

    let field_area = Rect {
        x: area.x,
        y: area.y + HEADER_ROWS,
        width: area.width,
        height: area.height - HEADER_ROWS - FOOTER_ROWS,
    };
    draw_field(frame, state, display, field_area);

    draw_footer(frame, state, hud, row(area, area.height - 1));

    if let Some(message) = overlay {
        render_overlay(frame, message, field_area);
    }
}

fn row(area: Rect, offset: u16) -> Rect {
    Rect {
        x: area.x,
        y: area.y + offset,
        width: area.width,
        height: 1,
    }
}

fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn draw_scoreboard(frame: &mut Frame, state: &MatchState, hud: &Hud, display: &DisplayConfig, area: Rect) {
    let score_style = Style::default()
        .fg(rgb(display.score_color))
        .add_modifier(Modifier::BOLD);

    let score = Line::from(vec![
        Span::styled("P1 ", Style::default().fg(rgb(display.player1_color))),
        Span::styled(
            format!("{}  -  {}", state.player1.score, state.player2.score),
            score_style,
        ),
        Span::styled(" P2", Style::default().fg(rgb(display.player2_color))),
    ]);
    frame.render_widget(Paragraph::new(score).alignment(Alignment::Center), area);

    frame.render_widget(
        Paragraph::new(hud.mode_label).style(Style::default().fg(Color::DarkGray)),
        area,
    );
    frame.render_widget(
        Paragraph::new(format_clock(state.time_remaining))
            .style(score_style)
            .alignment(Alignment::Right),
        area,
    );
}

/// Human-readable list of everything currently affecting play
fn effect_labels(state: &MatchState) -> Vec<String> {
    let now = state.clock_ms;
    let secs_left = |until: u64| (until.saturating_sub(now) + 999) / 1000;

    let players = [PlayerId::Player1, PlayerId::Player2];
    let mut labels = Vec::new();
    // freezes first
    for id in players {
        let player = state.player(id);
        if let Some(until) = player.frozen_until.filter(|_| player.is_frozen(now)) {
            labels.push(format!("{} frozen {}s", id.label(), secs_left(until)));
        }
    }
    for id in players {
        let player = state.player(id);
        if let Some(active) = player.active_power_up.filter(|a| a.expires_at > now) {
            labels.push(format!(
                "{} {} {}s",
                id.label(),
                active.kind.display_name(),
                secs_left(active.expires_at)
            ));
        }
    }
    if state.ball.is_fireball(now) {
        labels.push("Fireball!".to_string());
    }
    labels
}

fn draw_effects(frame: &mut Frame, state: &MatchState, area: Rect) {
    let text = effect_labels(state).join("  |  ");
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::Magenta))
            .alignment(Alignment::Center),
        area,
    );
}

/// "1 Freeze ok  2 Speed 7s ..." for one player
fn cooldown_summary(cooldowns: &Cooldowns, player: PlayerId, now: u64) -> String {
    PowerUpType::all()
        .iter()
        .enumerate()
        .map(|(slot, kind)| {
            let remaining = cooldowns.remaining(player, *kind, now);
            if remaining == 0 {
                format!("{} {} ok", slot + 1, kind.display_name())
            } else {
                format!("{} {} {}s", slot + 1, kind.display_name(), (remaining + 999) / 1000)
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn draw_footer(frame: &mut Frame, state: &MatchState, hud: &Hud, area: Rect) {
    let mut text = hud.controls_hint.to_string();
    if let Some(cooldowns) = hud.cooldowns {
        for player in hud.local_players {
            text.push_str(&format!(
                "   [{}] {}",
                player.label(),
                cooldown_summary(cooldowns, *player, state.clock_ms)
            ));
        }
    }

    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_field(frame: &mut Frame, state: &MatchState, display: &DisplayConfig, area: Rect) {
    let mut canvas = BrailleCanvas::new(area.width as usize, area.height as usize);
    let sx = canvas.pixel_width() as f32 / FIELD_WIDTH;
    let sy = canvas.pixel_height() as f32 / FIELD_HEIGHT;
    let px = |x: f32| (x * sx).max(0.0) as usize;
    let py = |y: f32| (y * sy).max(0.0) as usize;

    canvas.set_pen(rgb(display.field_color));
    canvas.draw_horizontal_line(0, canvas.pixel_width().saturating_sub(1), py(GROUND_Y));
    for y in (0..py(GROUND_Y)).step_by(4) {
        canvas.set_pixel(px(FIELD_WIDTH / 2.0), y);
    }

    // Goals: crossbar, back net and post
    for (back, mouth) in [(0.0, GOAL_WIDTH), (FIELD_WIDTH - 1.0, FIELD_WIDTH - GOAL_WIDTH)] {
        canvas.draw_horizontal_line(px(back), px(mouth), py(GOAL_TOP));
        canvas.draw_vertical_line(px(back), py(GOAL_TOP), py(GROUND_Y));
        canvas.fill_ellipse(mouth * sx, GOAL_TOP * sy, GOAL_POST_RADIUS * sx, GOAL_POST_RADIUS * sy);
    }

    let now = state.clock_ms;
    for (player, color) in [
        (&state.player1, display.player1_color),
        (&state.player2, display.player2_color),
    ] {
        canvas.set_pen(player_color(player, rgb(color), now));
        canvas.fill_ellipse(
            player.position.x * sx,
            player.position.y * sy,
            player.radius * sx,
            player.radius * sy,
        );
    }

    let ball = &state.ball;
    canvas.set_pen(if ball.is_fireball(now) {
        Color::LightRed
    } else {
        rgb(display.ball_color)
    });
    canvas.draw_ellipse(ball.position.x * sx, ball.position.y * sy, ball.radius * sx, ball.radius * sy);
    canvas.fill_ellipse(
        ball.position.x * sx,
        ball.position.y * sy,
        ball.radius * sx * 0.6,
        ball.radius * sy * 0.6,
    );

    frame.render_widget(Paragraph::new(canvas_lines(&canvas)), area);
}

fn player_color(player: &Player, base: Color, now: u64) -> Color {
    if player.is_frozen(now) {
        Color::LightCyan
    } else if player.has_power_up(PowerUpType::Speed, now) {
        Color::Yellow
    } else {
        base
    }
}

/// One `Line` per cell row, merging runs of equal colour into one span
fn canvas_lines(canvas: &BrailleCanvas) -> Vec<Line<'static>> {
    (0..canvas.cell_height())
        .map(|y| {
            let mut spans = Vec::new();
            let mut run = String::new();
            let mut run_color = canvas.color_at(0, y);

            for x in 0..canvas.cell_width() {
                let color = canvas.color_at(x, y);
                if color != run_color && !run.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut run), Style::default().fg(run_color)));
                }
                run_color = color;
                run.push(canvas.to_char(x, y));
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, Style::default().fg(run_color)));
            }
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{ActivePowerUp, Ball};

    fn state() -> MatchState {
        MatchState::new(90, Ball::new(crate::game::state::KICKOFF_POSITION, glam::Vec2::ZERO))
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(format_clock(90), "01:30");
        assert_eq!(format_clock(5), "00:05");
    }

    #[test]
    fn test_effect_labels() {
        let mut state = state();
        state.clock_ms = 1000;
        state.player2.frozen_until = Some(3500);
        state.player1.active_power_up = Some(ActivePowerUp {
            kind: PowerUpType::Speed,
            expires_at: 2000,
        });

        assert_eq!(effect_labels(&state), vec!["P2 frozen 3s", "P1 Speed 1s"]);

        state.clock_ms = 4000;
        assert!(effect_labels(&state).is_empty());
    }

    #[test]
    fn test_cooldown_summary() {
        let mut state = state();
        let mut cooldowns = Cooldowns::new();
        crate::game::powerups::try_activate_power_up(
            &mut state,
            &mut cooldowns,
            PlayerId::Player1,
            PowerUpType::Speed,
            0,
        );

        let summary = cooldown_summary(&cooldowns, PlayerId::Player1, 0);
        assert!(summary.starts_with("1 Freeze ok  2 Speed 12s"));
    }

    #[test]
    fn test_canvas_lines_merge_colour_runs() {
        let mut canvas = BrailleCanvas::new(3, 1);
        canvas.set_pen(Color::Red);
        canvas.set_pixel(4, 0);

        let lines = canvas_lines(&canvas);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[0].spans[1].style.fg, Some(Color::Red));
    }
}
