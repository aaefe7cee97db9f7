use std::collections::VecDeque;

use crate::config::{INITIAL_DIRECTION, INITIAL_SNAKE};
use crate::input::{Direction, direction_change_is_valid};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies on a square board of `tile_count` cells per edge.
    #[must_use]
    pub fn is_within(self, tile_count: u16) -> bool {
        let limit = i32::from(tile_count);
        self.x >= 0 && self.y >= 0 && self.x < limit && self.y < limit
    }

    /// Returns the neighbouring position one cell towards `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Snake body plus its applied and queued headings.
///
/// The head is the front of `body`. `direction` is the heading applied on the
/// last tick and `pending` is the heading the next tick will apply.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    pending: Direction,
}

impl Snake {
    /// Creates the snake every session starts with.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            body: VecDeque::from(INITIAL_SNAKE),
            direction: INITIAL_DIRECTION,
            pending: INITIAL_DIRECTION,
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// Returns `None` for an empty body.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        Some(Self {
            body: VecDeque::from(segments),
            direction,
            pending: direction,
        })
    }

    /// Queues `direction` for the next tick.
    ///
    /// The reversal check runs against the last applied heading, never
    /// against an earlier queued one. Returns whether the turn was queued.
    pub fn queue_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }

        self.pending = direction;
        true
    }

    /// Applies the queued heading and returns where the head would move.
    ///
    /// The body itself is untouched until [`Snake::advance`].
    pub fn commit_direction(&mut self) -> Position {
        self.direction = self.pending;
        self.head().stepped(self.direction)
    }

    /// Moves the head to `new_head`, dropping the tail unless `grow` is set.
    pub fn advance(&mut self, new_head: Position, grow: bool) {
        self.body.push_front(new_head);
        if !grow && self.body.len() > 1 {
            let _ = self.body.pop_back();
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        // `from_segments` rejects empty bodies and `advance` never shrinks
        // below one segment.
        self.body[0]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Heading applied on the last tick.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Heading the next tick will apply.
    #[must_use]
    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
