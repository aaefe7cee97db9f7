use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use arcade_snake::config::{
    DEFAULT_GRID_SIZE, DEFAULT_SURFACE_SIZE, EngineConfig, THEME_TERMINAL,
};
use arcade_snake::engine::{Engine, EngineEvent};
use arcade_snake::error::AppError;
use arcade_snake::input::{HostEvent, InputHandler};
use arcade_snake::logging::{default_log_path, init_file_logger};
use arcade_snake::renderer;
use arcade_snake::score::{JsonScoreStore, ScoreStore};
use arcade_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use arcade_snake::timer::IntervalTimer;
use arcade_snake::ui::hud::state_label;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Upper bound on how long one input poll may block.
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Parser)]
#[command(name = "arcade-snake", version, about = "Terminal-themed arcade Snake")]
struct Cli {
    /// Edge length of the square play surface in virtual pixels.
    #[arg(long, default_value_t = DEFAULT_SURFACE_SIZE)]
    surface_size: u16,

    /// Edge length of one grid cell in virtual pixels.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: u16,

    /// Hide the grid overlay.
    #[arg(long)]
    no_grid: bool,

    /// High-score file (defaults to the platform data directory).
    #[arg(long, value_name = "PATH")]
    scores: Option<PathBuf>,

    /// Log file (defaults to the platform data directory).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log verbosity.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Seed food placement for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{error}");
            eprintln!("arcade-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let log_path = cli.log_file.unwrap_or_else(default_log_path);
    init_file_logger(&log_path, cli.log_level.into())?;

    let config = EngineConfig::new(cli.surface_size, cli.grid_size, !cli.no_grid)?;
    let store = match cli.scores {
        Some(path) => JsonScoreStore::new(path),
        None => JsonScoreStore::default(),
    };
    log::info!("high scores at {}", store.path().display());

    // Surface a broken score file before the alternate screen hides stderr.
    if let Err(error) = store.load() {
        eprintln!("Warning: high score unavailable ({error}); starting from 0");
    }

    let mut engine = match cli.seed {
        Some(seed) => Engine::with_seed(config, IntervalTimer::new(), store, seed),
        None => Engine::new(config, IntervalTimer::new(), store),
    };

    install_panic_hook();
    let mut session = TerminalSession::enter()?;
    let mut input = InputHandler::new();
    let mut needs_redraw = true;

    loop {
        for event in engine.drain_events() {
            match event {
                EngineEvent::GameOver {
                    final_score,
                    high_score,
                    new_record,
                    reason,
                } => log::info!(
                    "final score {final_score}, high score {high_score}, record {new_record}, {reason:?}"
                ),
                EngineEvent::SpeedChanged { interval } => {
                    log::debug!("tick interval now {interval:?}");
                }
                _ => {}
            }
            needs_redraw = true;
        }

        if needs_redraw {
            let snapshot = engine.snapshot();
            session.terminal_mut().draw(|frame| {
                renderer::render(frame, &snapshot, engine.session(), config, &THEME_TERMINAL);
            })?;
            needs_redraw = false;
        }

        let timeout = engine
            .timer()
            .time_until_due()
            .map_or(MAX_POLL_INTERVAL, |due| due.min(MAX_POLL_INTERVAL));

        match input.poll(timeout)? {
            Some(HostEvent::Input(game_input)) => {
                let before = engine.state();
                if !engine.handle_input(game_input) {
                    break;
                }
                if engine.state() != before {
                    log::debug!("{} -> {}", state_label(before), state_label(engine.state()));
                }
            }
            Some(HostEvent::Resized) => needs_redraw = true,
            None => {}
        }

        engine.poll();
    }

    log::info!("quit with high score {}", engine.high_score());
    Ok(())
}
