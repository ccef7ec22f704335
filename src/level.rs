//! Level catalog: hand-authored levels first, procedural ones beyond them.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{BASE_SPEED_MS, GRID_SIZE, MAX_SPEED_MS, MIN_GRID_SIZE, MIN_SPEED_MS};
use crate::food::spawn_position;
use crate::snake::Position;

/// Speed reduction per level number for procedural levels, in milliseconds.
const PROCEDURAL_SPEED_STEP_MS: u32 = 5;

/// Upper bound on the special-food chance of procedural levels.
const PROCEDURAL_MAX_SPECIAL_FREQUENCY: f64 = 0.8;

/// Last level number played without walls when generated procedurally.
const PROCEDURAL_OPEN_LEVELS: u32 = 3;

/// Starting body shared by all procedural levels, head first.
const PROCEDURAL_SNAKE: [Position; 3] = [
    Position::new(5, 5),
    Position::new(4, 5),
    Position::new(3, 5),
];

static BUILTIN: OnceLock<LevelCatalog> = OnceLock::new();

/// Immutable description of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    /// Tick interval in milliseconds.
    pub speed: u32,
    pub has_walls: bool,
    #[serde(default)]
    pub obstacles: Vec<Position>,
    /// Starting body, head first.
    pub initial_snake: Vec<Position>,
    pub initial_food: Position,
    /// Chance in `[0, 1]` that replacement food is special.
    pub special_food_frequency: f64,
    /// Score at which the game advances to the next level.
    pub required_score: u32,
}

/// Errors raised while loading or validating a level catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read level catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("level catalog is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("grid size {grid_size} is below the minimum of {min}")]
    GridTooSmall { grid_size: u16, min: u16 },
    #[error("base speed {base_speed}ms is outside {min}..={max}ms")]
    BaseSpeedOutOfRange { base_speed: u32, min: u32, max: u32 },
    #[error("level {level}: {reason}")]
    InvalidLevel { level: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default = "default_grid_size")]
    grid_size: u16,
    #[serde(default = "default_base_speed")]
    base_speed: u32,
    #[serde(default)]
    levels: Vec<LevelConfig>,
}

fn default_grid_size() -> u16 {
    GRID_SIZE
}

fn default_base_speed() -> u32 {
    BASE_SPEED_MS
}

/// Lookup table of hand-authored levels for one grid size.
///
/// Level numbers past the table are generated procedurally on request.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCatalog {
    grid_size: u16,
    base_speed: u32,
    levels: Vec<LevelConfig>,
}

impl LevelCatalog {
    /// Builds a catalog after checking every level against the grid.
    pub fn new(
        grid_size: u16,
        base_speed: u32,
        levels: Vec<LevelConfig>,
    ) -> Result<Self, CatalogError> {
        if grid_size < MIN_GRID_SIZE {
            return Err(CatalogError::GridTooSmall {
                grid_size,
                min: MIN_GRID_SIZE,
            });
        }
        if !(MIN_SPEED_MS..=MAX_SPEED_MS).contains(&base_speed) {
            return Err(CatalogError::BaseSpeedOutOfRange {
                base_speed,
                min: MIN_SPEED_MS,
                max: MAX_SPEED_MS,
            });
        }

        for (index, level) in levels.iter().enumerate() {
            validate_level(index + 1, level, grid_size).map_err(|reason| {
                CatalogError::InvalidLevel {
                    level: index + 1,
                    reason,
                }
            })?;
        }

        Ok(Self {
            grid_size,
            base_speed,
            levels,
        })
    }

    /// Returns the built-in catalog, built once per process.
    #[must_use]
    pub fn builtin() -> &'static LevelCatalog {
        BUILTIN.get_or_init(|| {
            Self::new(GRID_SIZE, BASE_SPEED_MS, builtin_levels())
                .expect("built-in level catalog must be valid")
        })
    }

    /// Parses and validates a catalog from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::new(file.grid_size, file.base_speed, file.levels)
    }

    /// Reads, parses and validates a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn grid_size(&self) -> u16 {
        self.grid_size
    }

    #[must_use]
    pub fn base_speed(&self) -> u32 {
        self.base_speed
    }

    /// Number of hand-authored levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the configuration for `number` (1-indexed).
    ///
    /// Hand-authored entries are returned unchanged. Later numbers are
    /// generated with `rng`, so two calls for the same procedural level differ.
    ///
    /// # Panics
    ///
    /// Panics when `number` is zero.
    pub fn level<R: Rng + ?Sized>(&self, number: u32, rng: &mut R) -> LevelConfig {
        assert!(number >= 1, "level numbers start at 1");

        match self.levels.get(number as usize - 1) {
            Some(level) => level.clone(),
            None => generate_procedural_level(number, self.grid_size, self.base_speed, rng),
        }
    }
}

/// Returns level `number` from the built-in catalog.
#[must_use]
pub fn get_level(number: u32) -> LevelConfig {
    LevelCatalog::builtin().level(number, &mut rand::thread_rng())
}

/// Generates a level past the hand-authored ones.
///
/// Difficulty scales with `number`: more obstacles, a shorter tick, walls
/// after the first few levels and more special food.
pub fn generate_procedural_level<R: Rng + ?Sized>(
    number: u32,
    grid_size: u16,
    base_speed: u32,
    rng: &mut R,
) -> LevelConfig {
    assert!(
        grid_size >= MIN_GRID_SIZE,
        "procedural levels need a grid of at least {MIN_GRID_SIZE}"
    );

    let initial_snake = PROCEDURAL_SNAKE.to_vec();
    let initial_food = spawn_position(rng, grid_size, |cell| initial_snake.contains(&cell))
        .expect("grid larger than the initial snake has a free cell");

    let obstacle_count = number / 2 + 2;
    let mut taken: HashSet<Position> = initial_snake.iter().copied().collect();
    taken.insert(initial_food);

    let mut obstacles = Vec::new();
    for _ in 0..obstacle_count {
        let Some(obstacle) = spawn_position(rng, grid_size, |cell| taken.contains(&cell)) else {
            warn!(
                "level {number}: grid full after {} of {obstacle_count} obstacles",
                obstacles.len()
            );
            break;
        };
        taken.insert(obstacle);
        obstacles.push(obstacle);
    }

    let level = LevelConfig {
        id: number,
        speed: base_speed
            .saturating_sub(number.saturating_mul(PROCEDURAL_SPEED_STEP_MS))
            .max(MIN_SPEED_MS),
        has_walls: number > PROCEDURAL_OPEN_LEVELS,
        obstacles,
        initial_snake,
        initial_food,
        special_food_frequency: (0.1 + f64::from(number) * 0.05)
            .min(PROCEDURAL_MAX_SPECIAL_FREQUENCY),
        required_score: number.saturating_mul(5),
    };

    debug!(
        "generated level {number}: {} obstacles, speed {}ms, walls {}",
        level.obstacles.len(),
        level.speed,
        level.has_walls
    );

    level
}

fn validate_level(expected_id: usize, level: &LevelConfig, grid_size: u16) -> Result<(), String> {
    if level.id as usize != expected_id {
        return Err(format!("id {} out of sequence", level.id));
    }
    if !(MIN_SPEED_MS..=MAX_SPEED_MS).contains(&level.speed) {
        return Err(format!(
            "speed {}ms outside {MIN_SPEED_MS}..={MAX_SPEED_MS}ms",
            level.speed
        ));
    }
    if !(0.0..=1.0).contains(&level.special_food_frequency) {
        return Err(format!(
            "special food frequency {} outside [0, 1]",
            level.special_food_frequency
        ));
    }
    if level.initial_snake.is_empty() {
        return Err("initial snake is empty".to_owned());
    }

    let mut snake_cells = HashSet::new();
    for segment in &level.initial_snake {
        if !segment.is_within_bounds(grid_size) {
            return Err(format!("snake segment {segment:?} outside the grid"));
        }
        if !snake_cells.insert(*segment) {
            return Err(format!("snake segment {segment:?} repeated"));
        }
    }

    if !level.initial_food.is_within_bounds(grid_size) {
        return Err(format!("food {:?} outside the grid", level.initial_food));
    }
    if snake_cells.contains(&level.initial_food) {
        return Err(format!("food {:?} on the snake", level.initial_food));
    }

    for obstacle in &level.obstacles {
        if !obstacle.is_within_bounds(grid_size) {
            return Err(format!("obstacle {obstacle:?} outside the grid"));
        }
        if snake_cells.contains(obstacle) {
            return Err(format!("obstacle {obstacle:?} on the snake"));
        }
        if *obstacle == level.initial_food {
            return Err(format!("obstacle {obstacle:?} on the food"));
        }
    }

    Ok(())
}

fn builtin_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            id: 1,
            speed: BASE_SPEED_MS,
            has_walls: false,
            obstacles: Vec::new(),
            initial_snake: PROCEDURAL_SNAKE.to_vec(),
            initial_food: Position::new(10, 10),
            special_food_frequency: 0.1,
            required_score: 5,
        },
        LevelConfig {
            id: 2,
            speed: BASE_SPEED_MS - 10,
            has_walls: false,
            obstacles: vec![
                Position::new(10, 5),
                Position::new(10, 6),
                Position::new(10, 7),
            ],
            initial_snake: PROCEDURAL_SNAKE.to_vec(),
            initial_food: Position::new(15, 10),
            special_food_frequency: 0.2,
            required_score: 10,
        },
    ]
}
