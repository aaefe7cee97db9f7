use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::Theme;
use crate::engine::{OverReason, Snapshot};

/// Draws the start prompt as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32, theme: &Theme) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("SNAKE").style(
            Style::default()
                .fg(theme.snake_head)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        Line::from("[Enter] Start"),
        Line::from("Arrows/WASD to steer"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.text).bg(theme.background))
            .block(
                Block::bordered()
                    .title(" start ")
                    .border_style(Style::default().fg(theme.accent)),
            ),
        popup,
    );
}

/// Draws the pause overlay as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME PAUSED").style(
            Style::default()
                .fg(theme.alert)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("[P] Resume"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.text).bg(theme.background))
            .block(
                Block::bordered()
                    .title(" pause ")
                    .border_style(Style::default().fg(theme.alert)),
            ),
        popup,
    );
}

/// Draws the game-over panel as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(theme.food)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Final Score: {}", snapshot.score)),
        Line::from(format!("High Score: {}", snapshot.high_score)),
        Line::from(cause_text(snapshot.over_reason)),
        Line::from(if snapshot.new_record {
            "New high score!"
        } else {
            ""
        })
        .style(Style::default().fg(theme.snake_head)),
        Line::from(""),
        Line::from("[R] Play Again  [Enter] Restart"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.text).bg(theme.background))
            .block(
                Block::bordered()
                    .title(" game over ")
                    .border_style(Style::default().fg(theme.food)),
            ),
        popup,
    );
}

fn cause_text(reason: Option<OverReason>) -> &'static str {
    match reason {
        Some(OverReason::WallCollision) => "Cause: hit wall",
        Some(OverReason::SelfCollision) => "Cause: hit yourself",
        Some(OverReason::BoardFilled) => "Board filled. You win!",
        None => "",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
