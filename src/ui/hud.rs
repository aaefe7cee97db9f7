use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::engine::{ControlState, GameState, Snapshot};

const SEPARATOR: &str = " │ ";

/// Renders the two-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, theme: &Theme) -> Rect {
    let [play_area, score_area, controls_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(score_line(snapshot, usize::from(score_area.width), theme))
            .alignment(Alignment::Center),
        score_area,
    );
    frame.render_widget(
        Paragraph::new(controls_line(snapshot.controls, theme)).alignment(Alignment::Center),
        controls_area,
    );

    play_area
}

/// Score, best score, speed and length, with short labels on narrow terminals.
fn score_line(snapshot: &Snapshot, available_width: usize, theme: &Theme) -> Line<'static> {
    let fields = [
        ("Score", "S", snapshot.score.to_string()),
        ("High", "H", snapshot.high_score.to_string()),
        ("Speed", "V", format!("{}ms", snapshot.speed_ms)),
        ("Length", "L", snapshot.snake_len.to_string()),
    ];
    let compact = full_width(&fields) > available_width;

    let label_style = Style::default().fg(theme.muted);
    let value_style = Style::default().fg(theme.text);
    let record_style = Style::default()
        .fg(theme.snake_head)
        .add_modifier(Modifier::BOLD);
    let beating_record = snapshot.score > 0 && snapshot.score >= snapshot.high_score;

    let mut spans = Vec::with_capacity(fields.len() * 3);
    for (index, (label, short, value)) in fields.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, label_style));
        }
        let label = if compact { short } else { label };
        spans.push(Span::styled(format!("{label}: "), label_style));

        let style = if index < 2 && beating_record {
            record_style
        } else {
            value_style
        };
        spans.push(Span::styled(value, style));
    }

    Line::from(spans)
}

fn full_width(fields: &[(&str, &str, String); 4]) -> usize {
    let fields_width: usize = fields
        .iter()
        .map(|(label, _, value)| label.width() + 2 + value.width())
        .sum();
    fields_width + SEPARATOR.width() * (fields.len() - 1)
}

/// Key hints; controls the engine would ignore right now are dimmed.
fn controls_line(controls: ControlState, theme: &Theme) -> Line<'static> {
    let enabled = Style::default().fg(theme.accent);
    let disabled = Style::default().fg(Color::DarkGray);
    let pick = |on: bool| if on { enabled } else { disabled };

    Line::from(vec![
        Span::styled("[Enter] START", pick(controls.start_enabled)),
        Span::raw("  "),
        Span::styled(format!("[P] {}", controls.pause_label), pick(controls.pause_enabled)),
        Span::raw("  "),
        Span::styled("[R] RESET", enabled),
        Span::raw("  "),
        Span::styled("[Q] QUIT", Style::default().fg(theme.muted)),
    ])
}

/// Short state label for window titles and logs.
#[must_use]
pub fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::Idle => "ready",
        GameState::Running => "running",
        GameState::Paused => "paused",
        GameState::Over => "game over",
    }
}
