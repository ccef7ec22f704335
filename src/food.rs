use log::warn;
use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::config::MAX_SAMPLING_ATTEMPTS;
use crate::level::LevelConfig;
use crate::snake::{Position, Snake};

/// Food type and its gameplay role.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FoodKind {
    Regular,
    Bonus,
    Speed,
    Slow,
    /// Reserved: never spawned by placement, kills the snake when eaten.
    Danger,
}

impl FoodKind {
    /// Special kinds placement chooses between.
    pub const SPECIAL: [FoodKind; 3] = [FoodKind::Bonus, FoodKind::Speed, FoodKind::Slow];

    /// Returns the score value granted when eaten.
    #[must_use]
    pub fn value(self) -> u32 {
        match self {
            Self::Regular => 1,
            Self::Bonus => 3,
            Self::Speed => 1,
            Self::Slow => 1,
            Self::Danger => 0,
        }
    }
}

/// Food entity currently active on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Food {
    pub position: Position,
    pub kind: FoodKind,
    pub value: u32,
}

impl Food {
    /// Creates food of `kind` at `position` with the table value.
    #[must_use]
    pub fn new(position: Position, kind: FoodKind) -> Self {
        Self {
            position,
            kind,
            value: kind.value(),
        }
    }

    /// Creates regular food at `position`.
    #[must_use]
    pub fn regular(position: Position) -> Self {
        Self::new(position, FoodKind::Regular)
    }
}

/// Raised when no unoccupied cell is left for new food.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PlacementError {
    #[error("no free cell left on the {grid_size}x{grid_size} grid")]
    NoFreeCell { grid_size: u16 },
}

/// Places replacement food on a cell free of snake and obstacles.
///
/// With probability `level.special_food_frequency` the food is special, in
/// which case its kind is drawn uniformly from bonus, speed and slow.
pub fn generate_food<R: Rng + ?Sized>(
    rng: &mut R,
    grid_size: u16,
    snake: &Snake,
    obstacles: &[Position],
    level: &LevelConfig,
) -> Result<Food, PlacementError> {
    let position = spawn_position(rng, grid_size, |cell| {
        snake.occupies(cell) || obstacles.contains(&cell)
    })
    .ok_or(PlacementError::NoFreeCell { grid_size })?;

    let kind = if rng.gen_bool(level.special_food_frequency) {
        FoodKind::SPECIAL
            .choose(rng)
            .copied()
            .unwrap_or(FoodKind::Regular)
    } else {
        FoodKind::Regular
    };

    Ok(Food::new(position, kind))
}

/// Picks a uniformly random cell for which `is_occupied` is false.
///
/// Tries `MAX_SAMPLING_ATTEMPTS` random draws first, then scans the whole grid
/// and picks among the free cells. Returns `None` only when every cell is
/// occupied.
pub fn spawn_position<R, F>(rng: &mut R, grid_size: u16, is_occupied: F) -> Option<Position>
where
    R: Rng + ?Sized,
    F: Fn(Position) -> bool,
{
    assert!(grid_size > 0, "grid size must be positive");
    let size = i32::from(grid_size);

    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let candidate = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if !is_occupied(candidate) {
            return Some(candidate);
        }
    }

    warn!("random placement exhausted {MAX_SAMPLING_ATTEMPTS} attempts, scanning grid");

    let mut candidates = Vec::new();
    for y in 0..size {
        for x in 0..size {
            let position = Position::new(x, y);
            if !is_occupied(position) {
                candidates.push(position);
            }
        }
    }

    candidates.choose(rng).copied()
}
