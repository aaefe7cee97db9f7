use rand::Rng;

use crate::error::PlacementError;
use crate::snake::{Position, Snake};

/// Random draws tried per board cell before falling back to a full scan.
pub const SAMPLES_PER_CELL: usize = 4;

/// The single food item on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
}

impl Food {
    /// Creates food at a fixed position.
    #[must_use]
    pub fn at(position: Position) -> Self {
        Self { position }
    }

    /// Places food uniformly at random on a cell the snake does not occupy.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        tile_count: u16,
        snake: &Snake,
    ) -> Result<Self, PlacementError> {
        spawn_position(rng, tile_count, snake).map(Self::at)
    }
}

/// Picks a free cell by rejection sampling.
///
/// Sampling is capped at `tile_count² × SAMPLES_PER_CELL` draws. Past the cap
/// the free cells are enumerated and one is chosen uniformly, so a crowded
/// board still terminates; a board with no free cell is reported as full.
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    tile_count: u16,
    snake: &Snake,
) -> Result<Position, PlacementError> {
    let full = PlacementError::BoardFull { tile_count };
    if tile_count == 0 {
        return Err(full);
    }

    let limit = i32::from(tile_count);
    let cells = usize::from(tile_count) * usize::from(tile_count);

    for _ in 0..cells * SAMPLES_PER_CELL {
        let candidate = Position::new(rng.gen_range(0..limit), rng.gen_range(0..limit));
        if !snake.occupies(candidate) {
            return Ok(candidate);
        }
    }

    log::debug!(
        "food sampling exhausted after {} draws, scanning free cells",
        cells * SAMPLES_PER_CELL
    );

    let free: Vec<Position> = (0..limit)
        .flat_map(|y| (0..limit).map(move |x| Position::new(x, y)))
        .filter(|position| !snake.occupies(*position))
        .collect();

    if free.is_empty() {
        return Err(full);
    }

    Ok(free[rng.gen_range(0..free.len())])
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::error::PlacementError;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{Food, spawn_position};

    fn filled_except(tile_count: u16, free: &[Position]) -> Snake {
        let limit = i32::from(tile_count);
        let segments = (0..limit)
            .flat_map(|y| (0..limit).map(move |x| Position::new(x, y)))
            .filter(|position| !free.contains(position))
            .collect();
        Snake::from_segments(segments, Direction::Right).expect("board has occupied cells")
    }

    #[test]
    fn food_spawn_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = Snake::initial();

        for _ in 0..200 {
            let food = Food::spawn(&mut rng, 20, &snake).expect("board has room");
            assert!(!snake.occupies(food.position));
            assert!(food.position.is_within(20));
        }
    }

    #[test]
    fn crowded_board_still_finds_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let hole = Position::new(2, 3);
        let snake = filled_except(4, &[hole]);

        assert_eq!(spawn_position(&mut rng, 4, &snake), Ok(hole));
    }

    #[test]
    fn full_board_reports_exhaustion() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = filled_except(3, &[]);

        assert_eq!(
            spawn_position(&mut rng, 3, &snake),
            Err(PlacementError::BoardFull { tile_count: 3 })
        );
    }
}
