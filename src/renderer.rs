use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{CELL_WIDTH, EngineConfig, Theme};
use crate::engine::{GameState, Session, Snapshot};
use crate::snake::Position;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

const GLYPH_SOLID: &str = "██";
const GLYPH_GRID: &str = "· ";
const GLYPH_EMPTY: &str = "  ";

/// Renders the full game frame from immutable state.
pub fn render(
    frame: &mut Frame<'_>,
    snapshot: &Snapshot,
    session: &Session,
    config: EngineConfig,
    theme: &Theme,
) {
    let area = frame.area();
    frame
        .buffer_mut()
        .set_style(area, Style::new().bg(theme.background));

    let play_area = render_hud(frame, area, snapshot, theme);
    let board_area = centered_board(play_area, config.tile_count());

    let block = Block::bordered()
        .title(" snake ")
        .border_style(Style::new().fg(theme.accent).bg(theme.background));
    let inner = block.inner(board_area);
    frame.render_widget(block, board_area);

    draw_board(
        frame.buffer_mut(),
        inner,
        session,
        config.tile_count(),
        config.show_grid,
        theme,
    );

    match snapshot.state {
        GameState::Idle => render_start_menu(frame, board_area, snapshot.high_score, theme),
        GameState::Paused => render_pause_menu(frame, board_area, theme),
        GameState::Over => render_game_over_menu(frame, board_area, snapshot, theme),
        GameState::Running => {}
    }
}

/// Paints the board: background, optional grid, snake, then food.
///
/// Reads `session` only. Cells that do not fit in `area` are clipped.
pub fn draw_board(
    buffer: &mut Buffer,
    area: Rect,
    session: &Session,
    tile_count: u16,
    show_grid: bool,
    theme: &Theme,
) {
    let background = Style::new().fg(theme.grid).bg(theme.background);
    let empty = if show_grid { GLYPH_GRID } else { GLYPH_EMPTY };

    let limit = i32::from(tile_count);
    for y in 0..limit {
        for x in 0..limit {
            if let Some((col, row)) = cell_origin(area, tile_count, Position::new(x, y)) {
                buffer.set_string(col, row, empty, background);
            }
        }
    }

    for (index, segment) in session.snake.segments().enumerate() {
        let style = if index == 0 {
            Style::new()
                .fg(theme.snake_head)
                .bg(theme.background)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::new().fg(theme.snake_body).bg(theme.background)
        };
        paint_cell(buffer, area, tile_count, *segment, style);
    }

    paint_cell(
        buffer,
        area,
        tile_count,
        session.food.position,
        Style::new().fg(theme.food).bg(theme.background),
    );
}

fn paint_cell(buffer: &mut Buffer, area: Rect, tile_count: u16, position: Position, style: Style) {
    if let Some((col, row)) = cell_origin(area, tile_count, position) {
        buffer.set_string(col, row, GLYPH_SOLID, style);
    }
}

/// Terminal coordinates of the left column of a grid cell.
fn cell_origin(area: Rect, tile_count: u16, position: Position) -> Option<(u16, u16)> {
    if !position.is_within(tile_count) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let col = area.x.checked_add(x_offset)?;
    let row = area.y.checked_add(y_offset)?;
    if col.saturating_add(CELL_WIDTH) > area.right() || row >= area.bottom() {
        return None;
    }

    Some((col, row))
}

/// Bordered board rectangle centred in `area`, shrunk to fit when needed.
fn centered_board(area: Rect, tile_count: u16) -> Rect {
    let width = tile_count
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = tile_count.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
