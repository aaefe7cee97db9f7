//! Snake state machine.
//!
//! [`Engine`] owns the board session, the lifecycle state and the tick
//! schedule. Hosts drive it by forwarding input, calling [`Engine::poll`]
//! from their loop, and draining [`EngineEvent`]s to update their display.

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{
    BASE_TICK_INTERVAL_MS, EngineConfig, FOOD_REWARD, MIN_TICK_INTERVAL_MS,
    SPEED_UP_SCORE_THRESHOLD, TICK_INTERVAL_STEP_MS, tick_interval,
};
use crate::error::PlacementError;
use crate::food::Food;
use crate::input::{Direction, GameInput};
use crate::score::ScoreStore;
use crate::snake::Snake;
use crate::timer::{TickHandle, TickTimer};

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameState {
    Idle,
    Running,
    Paused,
    Over,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OverReason {
    WallCollision,
    SelfCollision,
    /// No free cell was left for the next food.
    BoardFilled,
}

/// Label for the pause toggle while the game is running.
pub const PAUSE_LABEL: &str = "PAUSE";

/// Label for the pause toggle while the game is paused.
pub const RESUME_LABEL: &str = "RESUME";

/// Notifications for the host display, queued in the order they happened.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EngineEvent {
    Started,
    PauseChanged {
        paused: bool,
        label: &'static str,
    },
    Reset,
    ScoreChanged {
        score: u32,
        high_score: u32,
    },
    SpeedChanged {
        interval: Duration,
    },
    GameOver {
        final_score: u32,
        high_score: u32,
        new_record: bool,
        reason: OverReason,
    },
    /// The board changed and should be drawn again.
    Redraw,
}

/// Board contents of one play session.
#[derive(Debug, Clone)]
pub struct Session {
    pub snake: Snake,
    pub food: Food,
    pub score: u32,
    /// Current tick interval in milliseconds.
    pub speed_ms: u64,
    pub over_reason: Option<OverReason>,
    /// Set when the finished run beat the previous best score.
    pub new_record: bool,
}

/// Enabled state of the host's start and pause controls.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ControlState {
    pub start_enabled: bool,
    pub pause_enabled: bool,
    pub pause_label: &'static str,
}

/// Read-only view of the values a host displays.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Snapshot {
    pub state: GameState,
    pub score: u32,
    pub high_score: u32,
    pub speed_ms: u64,
    pub snake_len: usize,
    pub over_reason: Option<OverReason>,
    pub new_record: bool,
    pub controls: ControlState,
}

impl Snapshot {
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state == GameState::Paused
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state == GameState::Over
    }
}

/// Grid snake engine driven by a host timer and backed by a score store.
pub struct Engine<T: TickTimer, S: ScoreStore> {
    config: EngineConfig,
    state: GameState,
    session: Session,
    high_score: u32,
    timer: T,
    tick_handle: Option<TickHandle>,
    store: S,
    rng: StdRng,
    events: Vec<EngineEvent>,
}

impl<T: TickTimer, S: ScoreStore> Engine<T, S> {
    /// Creates an idle engine seeded from OS entropy.
    #[must_use]
    pub fn new(config: EngineConfig, timer: T, store: S) -> Self {
        Self::with_rng(config, timer, store, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible replays.
    #[must_use]
    pub fn with_seed(config: EngineConfig, timer: T, store: S, seed: u64) -> Self {
        Self::with_rng(config, timer, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, timer: T, store: S, mut rng: StdRng) -> Self {
        let high_score = match store.load() {
            Ok(score) => score,
            Err(error) => {
                log::warn!("could not load high score, starting from 0: {error}");
                0
            }
        };
        let (session, placement) = new_session(&mut rng, config.tile_count());

        let mut engine = Self {
            config,
            state: GameState::Idle,
            session,
            high_score,
            timer,
            tick_handle: None,
            store,
            rng,
            events: Vec::new(),
        };
        log::info!(
            "engine ready on a {0}x{0} board, high score {high_score}",
            config.tile_count()
        );

        if let Err(error) = placement {
            engine.finish(OverReason::BoardFilled, Some(error));
            return engine;
        }
        engine.notify_display();
        engine
    }

    /// Idle or over: begins a fresh run. Running or paused: no-op.
    ///
    /// The board is always rebuilt, so starting from idle replaces the snake
    /// and food shown while idle.
    pub fn start(&mut self) {
        if !matches!(self.state, GameState::Idle | GameState::Over) {
            return;
        }

        let placement = self.reinitialize();
        if let Err(error) = placement {
            self.finish(OverReason::BoardFilled, Some(error));
            return;
        }

        self.state = GameState::Running;
        self.reschedule();
        log::info!("run started at {} ms per tick", self.session.speed_ms);
        self.events.push(EngineEvent::Started);
        self.notify_display();
    }

    /// Toggles between running and paused. Idle or over: no-op.
    pub fn pause(&mut self) {
        match self.state {
            GameState::Running => {
                self.cancel_schedule();
                self.state = GameState::Paused;
                log::info!("paused at score {}", self.session.score);
                self.events.push(EngineEvent::PauseChanged {
                    paused: true,
                    label: RESUME_LABEL,
                });
            }
            GameState::Paused => {
                self.state = GameState::Running;
                self.reschedule();
                log::info!("resumed");
                self.events.push(EngineEvent::PauseChanged {
                    paused: false,
                    label: PAUSE_LABEL,
                });
            }
            GameState::Idle | GameState::Over => {}
        }
    }

    /// Stops any run and returns to idle with a fresh board.
    pub fn reset(&mut self) {
        self.cancel_schedule();
        self.state = GameState::Idle;
        let placement = self.reinitialize();
        log::info!("reset");
        self.events.push(EngineEvent::Reset);

        if let Err(error) = placement {
            self.finish(OverReason::BoardFilled, Some(error));
            return;
        }
        self.notify_display();
    }

    /// Queues a turn for the next tick.
    ///
    /// Ignored unless running. A turn that reverses the heading applied on the
    /// last tick is dropped.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.state != GameState::Running {
            return;
        }

        if !self.session.snake.queue_direction(direction) {
            log::debug!(
                "ignored reversal {direction:?} while heading {:?}",
                self.session.snake.direction()
            );
        }
    }

    /// Routes one host signal to its engine operation.
    ///
    /// Returns `false` for [`GameInput::Quit`], which the host handles itself.
    pub fn handle_input(&mut self, input: GameInput) -> bool {
        match input {
            GameInput::Direction(direction) => self.set_direction(direction),
            GameInput::Start => self.start(),
            GameInput::Pause => self.pause(),
            GameInput::Reset => self.reset(),
            GameInput::Quit => return false,
        }
        true
    }

    /// Runs the tick if the schedule has one due. Returns whether a tick ran.
    pub fn poll(&mut self) -> bool {
        let Some(handle) = self.tick_handle else {
            return false;
        };
        if !self.timer.take_due(handle) {
            return false;
        }

        self.tick();
        true
    }

    fn tick(&mut self) {
        if self.state != GameState::Running {
            return;
        }

        let tile_count = self.config.tile_count();
        let new_head = self.session.snake.commit_direction();

        if !new_head.is_within(tile_count) {
            self.finish(OverReason::WallCollision, None);
            return;
        }
        if self.session.snake.occupies(new_head) {
            self.finish(OverReason::SelfCollision, None);
            return;
        }

        let ate = new_head == self.session.food.position;
        self.session.snake.advance(new_head, ate);

        if ate {
            self.session.score += FOOD_REWARD;
            log::debug!(
                "ate food at {new_head:?}, score {}, length {}",
                self.session.score,
                self.session.snake.len()
            );

            match Food::spawn(&mut self.rng, tile_count, &self.session.snake) {
                Ok(food) => self.session.food = food,
                Err(error) => {
                    self.finish(OverReason::BoardFilled, Some(error));
                    return;
                }
            }

            if self.session.score % SPEED_UP_SCORE_THRESHOLD == 0
                && self.session.speed_ms > MIN_TICK_INTERVAL_MS
            {
                self.session.speed_ms = self
                    .session
                    .speed_ms
                    .saturating_sub(TICK_INTERVAL_STEP_MS)
                    .max(MIN_TICK_INTERVAL_MS);
                self.reschedule();
                log::debug!("speed up to {} ms per tick", self.session.speed_ms);
                self.events.push(EngineEvent::SpeedChanged {
                    interval: tick_interval(self.session.speed_ms),
                });
            }
        }

        self.notify_display();
    }

    /// Ends the run, stopping the schedule and recording a new best score.
    fn finish(&mut self, reason: OverReason, placement: Option<PlacementError>) {
        self.cancel_schedule();
        self.state = GameState::Over;
        self.session.over_reason = Some(reason);
        if let Some(error) = placement {
            log::info!("run ended: {error}");
        }

        let final_score = self.session.score;
        let new_record = final_score > self.high_score;
        self.session.new_record = new_record;
        if new_record {
            self.high_score = final_score;
            log::info!("new high score {final_score}");
            if let Err(error) = self.store.save(final_score) {
                log::warn!("could not persist high score {final_score}: {error}");
            }
        }

        log::info!("game over ({reason:?}) with score {final_score}");
        self.events.push(EngineEvent::GameOver {
            final_score,
            high_score: self.high_score,
            new_record,
            reason,
        });
        self.events.push(EngineEvent::ScoreChanged {
            score: final_score,
            high_score: self.high_score,
        });
    }

    fn reinitialize(&mut self) -> Result<(), PlacementError> {
        let (session, placement) = new_session(&mut self.rng, self.config.tile_count());
        self.session = session;
        placement
    }

    /// Cancels the installed schedule, then installs one at the current speed.
    fn reschedule(&mut self) {
        self.cancel_schedule();
        self.tick_handle = Some(self.timer.schedule(tick_interval(self.session.speed_ms)));
    }

    fn cancel_schedule(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.timer.cancel(handle);
        }
    }

    fn notify_display(&mut self) {
        self.events.push(EngineEvent::ScoreChanged {
            score: self.session.score,
            high_score: self.high_score,
        });
        self.events.push(EngineEvent::Redraw);
    }

    /// Removes and returns all queued events.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Current board contents, for renderers.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable board access for scripted setups.
    ///
    /// Changes take effect on the next tick; callers are responsible for
    /// keeping food off the snake.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let controls = match self.state {
            GameState::Idle | GameState::Over => ControlState {
                start_enabled: true,
                pause_enabled: false,
                pause_label: PAUSE_LABEL,
            },
            GameState::Running => ControlState {
                start_enabled: false,
                pause_enabled: true,
                pause_label: PAUSE_LABEL,
            },
            GameState::Paused => ControlState {
                start_enabled: false,
                pause_enabled: true,
                pause_label: RESUME_LABEL,
            },
        };

        Snapshot {
            state: self.state,
            score: self.session.score,
            high_score: self.high_score,
            speed_ms: self.session.speed_ms,
            snake_len: self.session.snake.len(),
            over_reason: self.session.over_reason,
            new_record: self.session.new_record,
            controls,
        }
    }
}

/// Builds the starting board. The food falls back to the head cell, which is
/// never reachable by eating, if placement fails.
fn new_session(rng: &mut StdRng, tile_count: u16) -> (Session, Result<(), PlacementError>) {
    let snake = Snake::initial();
    let (food, placement) = match Food::spawn(rng, tile_count, &snake) {
        Ok(food) => (food, Ok(())),
        Err(error) => (Food::at(snake.head()), Err(error)),
    };

    let session = Session {
        snake,
        food,
        score: 0,
        speed_ms: BASE_TICK_INTERVAL_MS,
        over_reason: None,
        new_record: false,
    };
    (session, placement)
}
