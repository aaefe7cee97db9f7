use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use arcade_snake::config::EngineConfig;
use arcade_snake::engine::{Engine, EngineEvent, GameState, OverReason};
use arcade_snake::food::Food;
use arcade_snake::input::{Direction, GameInput};
use arcade_snake::score::{JsonScoreStore, MemoryScoreStore, ScoreStore};
use arcade_snake::snake::{Position, Snake};
use arcade_snake::timer::ManualTimer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn new_engine(store: MemoryScoreStore, seed: u64) -> Engine<ManualTimer, MemoryScoreStore> {
    Engine::with_seed(EngineConfig::default(), ManualTimer::new(), store, seed)
}

fn step<S: ScoreStore>(engine: &mut Engine<ManualTimer, S>) -> bool {
    engine.timer_mut().fire();
    engine.poll()
}

#[test]
fn eating_food_in_front_of_the_head_grows_and_scores() {
    let mut engine = new_engine(MemoryScoreStore::new(), 42);
    engine.start();
    engine.session_mut().food = Food::at(Position::new(9, 8));

    step(&mut engine);

    let session = engine.session();
    assert_eq!(engine.state(), GameState::Running);
    assert_eq!(session.snake.len(), 4);
    assert_eq!(session.score, 10);
    assert_eq!(session.snake.head(), Position::new(9, 8));
    assert!(!session.snake.occupies(session.food.position));
}

#[test]
fn wall_collision_on_right_edge_ends_the_run() {
    let mut engine = new_engine(MemoryScoreStore::with_score(50), 7);
    engine.start();
    engine.session_mut().snake = Snake::from_segments(
        vec![
            Position::new(19, 8),
            Position::new(18, 8),
            Position::new(17, 8),
        ],
        Direction::Right,
    )
    .expect("non-empty body");
    engine.session_mut().food = Food::at(Position::new(3, 3));
    engine.session_mut().score = 20;
    let before = engine.session().snake.clone();

    step(&mut engine);

    assert_eq!(engine.state(), GameState::Over);
    assert_eq!(engine.snapshot().over_reason, Some(OverReason::WallCollision));
    assert_eq!(engine.high_score(), 50, "lower score must not replace record");

    // Nothing moves once the run is over.
    assert!(!step(&mut engine));
    assert_eq!(
        engine.session().snake.segments().collect::<Vec<_>>(),
        before.segments().collect::<Vec<_>>()
    );
}

#[test]
fn turning_into_own_body_ends_the_run() {
    let mut engine = new_engine(MemoryScoreStore::new(), 9);
    engine.start();
    engine.session_mut().snake = Snake::from_segments(
        vec![
            Position::new(5, 5),
            Position::new(4, 5),
            Position::new(4, 6),
            Position::new(5, 6),
            Position::new(6, 6),
        ],
        Direction::Right,
    )
    .expect("non-empty body");
    engine.session_mut().food = Food::at(Position::new(0, 0));

    engine.set_direction(Direction::Down);
    step(&mut engine);

    assert_eq!(engine.state(), GameState::Over);
    assert_eq!(engine.snapshot().over_reason, Some(OverReason::SelfCollision));
}

#[test]
fn moving_into_the_current_tail_cell_is_a_collision() {
    let mut engine = new_engine(MemoryScoreStore::new(), 10);
    engine.start();
    engine.session_mut().snake = Snake::from_segments(
        vec![
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ],
        Direction::Left,
    )
    .expect("non-empty body");
    engine.session_mut().food = Food::at(Position::new(0, 0));

    engine.set_direction(Direction::Down);
    step(&mut engine);

    assert_eq!(engine.state(), GameState::Over);
    assert_eq!(engine.snapshot().over_reason, Some(OverReason::SelfCollision));
}

#[test]
fn reversal_keeps_previous_pending_direction() {
    let mut engine = new_engine(MemoryScoreStore::new(), 1);
    engine.start();

    engine.set_direction(Direction::Up);
    engine.set_direction(Direction::Left);

    assert_eq!(engine.session().snake.pending_direction(), Direction::Up);
}

#[test]
fn two_turns_in_one_tick_window_compare_against_applied_direction() {
    let mut engine = new_engine(MemoryScoreStore::new(), 1);
    engine.start();
    engine.session_mut().food = Food::at(Position::new(0, 0));

    // Up then Down before a tick: Down only reverses the queued Up, not the
    // applied Right, so it is queued and the snake turns down.
    engine.set_direction(Direction::Up);
    engine.set_direction(Direction::Down);
    step(&mut engine);

    assert_eq!(engine.state(), GameState::Running);
    assert_eq!(engine.session().snake.head(), Position::new(8, 9));
}

#[test]
fn speed_ramp_reschedules_timer() {
    let mut engine = new_engine(MemoryScoreStore::new(), 3);
    engine.start();
    assert_eq!(engine.timer().interval(), Some(Duration::from_millis(120)));

    engine.session_mut().score = 40;
    engine.session_mut().food = Food::at(Position::new(9, 8));
    engine.drain_events();
    step(&mut engine);

    assert_eq!(engine.snapshot().speed_ms, 115);
    assert_eq!(engine.timer().interval(), Some(Duration::from_millis(115)));
    assert!(engine.drain_events().contains(&EngineEvent::SpeedChanged {
        interval: Duration::from_millis(115)
    }));

    // A tick queued on the replaced schedule must not run.
    engine.timer_mut().fire();
    engine.reset();
    assert!(!engine.poll());
}

#[test]
fn length_changes_by_at_most_one_and_food_stays_off_the_snake() {
    let mut engine = new_engine(MemoryScoreStore::new(), 2024);
    let mut steering = StdRng::seed_from_u64(99);
    let directions = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    for _ in 0..20 {
        engine.start();
        let mut speed = engine.snapshot().speed_ms;

        for _ in 0..5_000 {
            if engine.state() != GameState::Running {
                break;
            }
            let before = engine.session().snake.len();
            if steering.gen_bool(0.3) {
                engine.set_direction(directions[steering.gen_range(0..directions.len())]);
            }

            step(&mut engine);
            if engine.state() != GameState::Running {
                break;
            }

            let session = engine.session();
            let after = session.snake.len();
            assert!(after == before || after == before + 1);
            assert!(!session.snake.occupies(session.food.position));
            assert!(session.speed_ms <= speed);
            assert!(session.speed_ms >= 60);
            speed = session.speed_ms;
        }
    }
}

#[test]
fn high_score_is_the_maximum_across_sessions() {
    let store = MemoryScoreStore::new();
    let mut engine = new_engine(store.clone(), 5);

    for score in [30, 80, 40] {
        engine.start();
        engine.session_mut().score = score;
        engine.session_mut().food = Food::at(Position::new(0, 0));
        engine.handle_input(GameInput::Direction(Direction::Up));
        while engine.state() == GameState::Running {
            step(&mut engine);
        }
    }

    assert_eq!(engine.high_score(), 80);
    assert_eq!(store.save_count(), 2);

    let restarted = new_engine(store, 6);
    assert_eq!(restarted.high_score(), 80);
}

#[test]
fn high_score_survives_restart_through_score_file() {
    let path = unique_test_path("restart");
    {
        let mut engine = Engine::with_seed(
            EngineConfig::default(),
            ManualTimer::new(),
            JsonScoreStore::new(&path),
            11,
        );
        engine.start();
        engine.session_mut().score = 70;
        engine.session_mut().food = Food::at(Position::new(0, 0));
        while engine.state() == GameState::Running {
            step(&mut engine);
        }
        assert_eq!(engine.high_score(), 70);
    }

    let engine = Engine::with_seed(
        EngineConfig::default(),
        ManualTimer::new(),
        JsonScoreStore::new(&path),
        12,
    );
    assert_eq!(engine.high_score(), 70);

    let _ = fs::remove_file(&path);
}

#[test]
fn eating_the_last_free_cell_fills_the_board() {
    let store = MemoryScoreStore::new();
    let config = EngineConfig::new(200, 20, true).expect("10x10 board is valid");
    let mut engine = Engine::with_seed(config, ManualTimer::new(), store.clone(), 21);
    engine.start();

    // Serpentine path over every cell; the snake covers all but the last.
    let path: Vec<Position> = (0..10)
        .flat_map(|y| {
            let row: Vec<i32> = if y % 2 == 0 {
                (0..10).collect()
            } else {
                (0..10).rev().collect()
            };
            row.into_iter().map(move |x| Position::new(x, y))
        })
        .collect();
    let last_free = path[99];
    let body: Vec<Position> = path[..99].iter().rev().copied().collect();

    engine.session_mut().snake =
        Snake::from_segments(body, Direction::Left).expect("non-empty body");
    engine.session_mut().food = Food::at(last_free);
    engine.session_mut().score = 40;
    engine.drain_events();

    step(&mut engine);

    assert_eq!(engine.state(), GameState::Over);
    assert_eq!(engine.snapshot().over_reason, Some(OverReason::BoardFilled));
    assert_eq!(engine.session().snake.len(), 100);
    assert_eq!(engine.high_score(), 50);
    assert_eq!(store.load().expect("memory load"), 50);
    assert_eq!(store.save_count(), 1);
    assert!(!engine.timer().is_scheduled());
    assert!(engine.drain_events().contains(&EngineEvent::GameOver {
        final_score: 50,
        high_score: 50,
        new_record: true,
        reason: OverReason::BoardFilled,
    }));
}

#[test]
fn quit_is_left_to_the_host() {
    let mut engine = new_engine(MemoryScoreStore::new(), 1);

    assert!(engine.handle_input(GameInput::Start));
    assert!(!engine.handle_input(GameInput::Quit));
    assert_eq!(engine.state(), GameState::Running);
}

fn unique_test_path(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time should be after epoch")
        .as_nanos();

    std::env::temp_dir().join(format!("arcade-snake-{label}-{nanos}.json"))
}
