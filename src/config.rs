use std::time::Duration;

use ratatui::style::Color;

use crate::error::ConfigError;
use crate::input::Direction;
use crate::snake::Position;

/// Default raster surface edge length in virtual pixels.
pub const DEFAULT_SURFACE_SIZE: u16 = 400;

/// Default edge length of one grid cell in virtual pixels.
pub const DEFAULT_GRID_SIZE: u16 = 20;

/// Points granted per food eaten.
pub const FOOD_REWARD: u32 = 10;

/// Tick interval at the start of every session.
pub const BASE_TICK_INTERVAL_MS: u64 = 120;

/// Amount the tick interval shrinks on each speed-up.
pub const TICK_INTERVAL_STEP_MS: u64 = 5;

/// The tick interval never drops below this.
pub const MIN_TICK_INTERVAL_MS: u64 = 60;

/// A speed-up happens whenever the score reaches a multiple of this.
pub const SPEED_UP_SCORE_THRESHOLD: u32 = 50;

/// Fixed key of the persisted best score.
pub const HIGH_SCORE_KEY: &str = "snake_high_score";

/// Initial snake body, head first.
pub const INITIAL_SNAKE: [Position; 3] = [
    Position { x: 8, y: 8 },
    Position { x: 7, y: 8 },
    Position { x: 6, y: 8 },
];

/// Heading of a freshly initialized snake.
pub const INITIAL_DIRECTION: Direction = Direction::Right;

/// Board geometry and presentation switches for one engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EngineConfig {
    /// Edge length of the square raster surface, in virtual pixels.
    pub surface_size: u16,
    /// Edge length of one cell, in virtual pixels.
    pub grid_size: u16,
    /// Whether the renderer draws the grid overlay.
    pub show_grid: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface_size: DEFAULT_SURFACE_SIZE,
            grid_size: DEFAULT_GRID_SIZE,
            show_grid: true,
        }
    }
}

impl EngineConfig {
    /// Returns a validated configuration.
    ///
    /// The board must be large enough to hold the initial snake with room
    /// to move one step.
    pub fn new(surface_size: u16, grid_size: u16, show_grid: bool) -> Result<Self, ConfigError> {
        if grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }

        let config = Self {
            surface_size,
            grid_size,
            show_grid,
        };
        let required = min_tile_count();
        let tile_count = config.tile_count();
        if tile_count < required {
            return Err(ConfigError::BoardTooSmall {
                surface_size,
                grid_size,
                tile_count,
                required,
            });
        }

        Ok(config)
    }

    /// Number of cells along each edge of the square grid.
    #[must_use]
    pub fn tile_count(self) -> u16 {
        self.surface_size.checked_div(self.grid_size).unwrap_or(0)
    }

    /// Total number of cells on the board.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.tile_count()) * usize::from(self.tile_count())
    }
}

fn min_tile_count() -> u16 {
    let extent = INITIAL_SNAKE
        .iter()
        .map(|position| position.x.max(position.y))
        .max()
        .unwrap_or(0);
    u16::try_from(extent + 2).unwrap_or(u16::MAX)
}

/// Tick interval for a given speed in milliseconds.
#[must_use]
pub fn tick_interval(speed_ms: u64) -> Duration {
    Duration::from_millis(speed_ms)
}

/// Colour palette for the board, HUD and overlays.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub grid: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub food: Color,
    pub border: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub alert: Color,
}

/// Dark terminal palette.
pub const THEME_TERMINAL: Theme = Theme {
    background: Color::Rgb(0, 0, 0),
    grid: Color::Rgb(0x33, 0x33, 0x33),
    snake_head: Color::Rgb(0x27, 0xca, 0x3f),
    snake_body: Color::Rgb(0x00, 0xff, 0x00),
    food: Color::Rgb(0xff, 0x5f, 0x56),
    border: Color::Rgb(0x1a, 0x1a, 0x2e),
    accent: Color::Rgb(0x55, 0x75, 0xff),
    text: Color::Rgb(0xe0, 0xe0, 0xe0),
    muted: Color::DarkGray,
    alert: Color::Rgb(0xff, 0xbd, 0x2e),
};

/// Terminal columns used to draw one grid cell, keeping cells roughly square.
pub const CELL_WIDTH: u16 = 2;
