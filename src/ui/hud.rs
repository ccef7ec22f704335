use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::food_color;
use crate::game::GameState;

const SEPARATOR: &str = " │ ";

/// Values the HUD shows that do not live in the game state.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub grid_size: u16,
    pub has_walls: bool,
    /// False until the player leaves the start screen.
    pub started: bool,
    pub autopilot: bool,
}

/// Renders the one-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState, info: &HudInfo) -> Rect {
    let [play_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let compact = status_width(state, info, false) > usize::from(status_area.width);
    frame.render_widget(
        Paragraph::new(status_line(state, info, compact))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        status_area,
    );

    play_area
}

fn status_fields(state: &GameState, info: &HudInfo, compact: bool) -> [(&'static str, String); 5] {
    let walls = if info.has_walls { "on" } else { "off" };
    if compact {
        [
            ("V", state.level.to_string()),
            ("S", state.score.to_string()),
            ("L", state.snake.len().to_string()),
            ("T", state.speed.to_string()),
            ("W", walls.to_owned()),
        ]
    } else {
        [
            ("Level", state.level.to_string()),
            ("Score", state.score.to_string()),
            ("Length", state.snake.len().to_string()),
            ("Tick", format!("{}ms", state.speed)),
            ("Walls", walls.to_owned()),
        ]
    }
}

fn status_line(state: &GameState, info: &HudInfo, compact: bool) -> Line<'static> {
    let value_style = Style::default().fg(Color::White);
    let mut spans = Vec::new();

    for (index, (label, value)) in status_fields(state, info, compact).into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(SEPARATOR));
        }
        spans.push(Span::raw(format!("{label}: ")));
        spans.push(Span::styled(value, value_style));
    }

    spans.push(Span::raw(SEPARATOR));
    spans.push(Span::styled(
        "●",
        Style::default().fg(food_color(state.food.kind)),
    ));
    if info.autopilot {
        spans.push(Span::styled(" auto", Style::default().fg(Color::Cyan)));
    }

    Line::from(spans)
}

fn status_width(state: &GameState, info: &HudInfo, compact: bool) -> usize {
    let fields: usize = status_fields(state, info, compact)
        .iter()
        .map(|(label, value)| label.width() + 2 + value.width())
        .sum();
    let separators = SEPARATOR.width() * 5;
    let autopilot = if info.autopilot { " auto".width() } else { 0 };

    fields + separators + "●".width() + autopilot
}
