use serde::{Deserialize, Serialize};

use crate::input::Direction;

/// Grid position in logical cell coordinates.
///
/// Coordinates are signed so a head moving through a wall can be represented
/// one cell outside the grid before the wall check rejects it.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the position lies inside a square grid of `grid_size`.
    #[must_use]
    pub fn is_within_bounds(self, grid_size: u16) -> bool {
        let size = i32::from(grid_size);
        self.x >= 0 && self.y >= 0 && self.x < size && self.y < size
    }

    /// Returns the neighbouring cell in `direction`, without wrapping.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns this position wrapped into the grid on both axes.
    #[must_use]
    pub fn wrapped(self, grid_size: u16) -> Self {
        let size = i32::from(grid_size);
        Self {
            x: wrap_axis(self.x, size),
            y: wrap_axis(self.y, size),
        }
    }
}

fn wrap_axis(value: i32, upper_bound: i32) -> i32 {
    (value % upper_bound + upper_bound) % upper_bound
}

/// Ordered snake body, head first.
///
/// A snake is never empty. Transitions build a new value instead of mutating
/// the previous one, so any earlier snake stays valid for inspection.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: Vec<Position>,
}

impl Snake {
    /// Creates a snake from explicit body segments (first is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>) -> Self {
        assert!(!segments.is_empty(), "snake must have at least one segment");
        Self { body: segments }
    }

    /// Returns the snake after one ordinary move: `head` prepended, tail dropped.
    #[must_use]
    pub fn advanced(&self, head: Position) -> Self {
        let mut body = Vec::with_capacity(self.body.len());
        body.push(head);
        body.extend_from_slice(&self.body[..self.body.len() - 1]);
        Self { body }
    }

    /// Returns the snake after eating: `head` prepended, tail kept.
    #[must_use]
    pub fn grown(&self, head: Position) -> Self {
        let mut body = Vec::with_capacity(self.body.len() + 1);
        body.push(head);
        body.extend_from_slice(&self.body);
        Self { body }
    }

    /// Returns the snake with `count` copies of its tail appended.
    ///
    /// The copies unfold over the following moves as the tail stays put.
    #[must_use]
    pub fn with_tail_copies(&self, count: usize) -> Self {
        let tail = self.tail();
        let mut body = self.body.clone();
        body.extend(std::iter::repeat_n(tail, count));
        Self { body }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Returns the last segment.
    #[must_use]
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Returns true if any segment occupies `position`.
    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Returns true when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> std::slice::Iter<'_, Position> {
        self.body.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Position] {
        &self.body
    }
}
