use std::io;

use thiserror::Error;

/// Failures reading or writing the persisted high-score slot.
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("score file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("score file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raised when food cannot be placed because every cell is occupied.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PlacementError {
    #[error("no free cell left on a {tile_count}x{tile_count} board")]
    BoardFull { tile_count: u16 },
}

/// Rejected board geometry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid size must be greater than zero")]
    ZeroGridSize,
    #[error("surface of {surface_size}px with {grid_size}px cells yields {tile_count} tiles, need at least {required}")]
    BoardTooSmall {
        surface_size: u16,
        grid_size: u16,
        tile_count: u16,
        required: u16,
    },
}

/// Top-level error for the terminal binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
