use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{
    Collision, CollisionKind, Effect, check_all_collisions, get_new_head, slowed_down, sped_up,
};
use crate::food::{Food, FoodKind, generate_food};
use crate::input::{Direction, GameInput, direction_change_is_valid};
use crate::level::{LevelCatalog, LevelConfig};
use crate::snake::{Position, Snake};

/// Why a game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    ObstacleCollision,
    DangerousFood,
    /// Food was eaten but no free cell was left for the next one.
    BoardFull,
}

impl DeathReason {
    fn from_collision(kind: CollisionKind) -> Self {
        match kind {
            CollisionKind::Wall => Self::WallCollision,
            CollisionKind::Snake => Self::SelfCollision,
            CollisionKind::Obstacle => Self::ObstacleCollision,
            CollisionKind::Food => Self::DangerousFood,
        }
    }
}

/// Complete state of one game, replaced by a new value on every tick.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    /// Direction used by the last movement.
    pub direction: Direction,
    /// Direction the next tick will move in.
    pub next_direction: Direction,
    pub score: u32,
    pub level: u32,
    /// Tick interval in milliseconds the driver should honor.
    pub speed: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub obstacles: Vec<Position>,
    pub death_reason: Option<DeathReason>,
}

impl GameState {
    /// Builds the starting state for `level`.
    #[must_use]
    pub fn from_level(level: &LevelConfig) -> Self {
        Self {
            snake: Snake::from_segments(level.initial_snake.clone()),
            food: Food::regular(level.initial_food),
            direction: Direction::Right,
            next_direction: Direction::Right,
            score: 0,
            level: level.id,
            speed: level.speed,
            is_game_over: false,
            is_paused: false,
            obstacles: level.obstacles.clone(),
            death_reason: None,
        }
    }

    /// Stores `direction` for the next tick unless it reverses the current one.
    ///
    /// Only the latest accepted direction survives until the tick. Returns
    /// whether the direction was accepted.
    pub fn set_next_direction(&mut self, direction: Direction) -> bool {
        if !direction_change_is_valid(self.direction, direction) {
            return false;
        }
        self.next_direction = direction;
        true
    }

    /// Applies one external input event.
    pub fn apply_input(&mut self, input: GameInput) {
        if self.is_game_over {
            return;
        }

        match input {
            GameInput::Direction(direction) => {
                if !self.is_paused {
                    self.set_next_direction(direction);
                }
            }
            GameInput::Pause => self.is_paused = !self.is_paused,
            GameInput::Quit | GameInput::Confirm => {}
        }
    }

    /// Returns true while ticks still advance the game.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_game_over && !self.is_paused
    }

    fn ended(&self, reason: DeathReason) -> Self {
        Self {
            is_game_over: true,
            death_reason: Some(reason),
            ..self.clone()
        }
    }
}

/// Owns the level catalog and randomness, and advances game states.
///
/// The engine never keeps a game state itself; the caller holds the current
/// state and replaces it with each tick's result.
#[derive(Debug, Clone)]
pub struct Engine<R = StdRng> {
    catalog: LevelCatalog,
    rng: R,
    current_level: Option<LevelConfig>,
}

impl Engine<StdRng> {
    /// Creates an engine seeded from system entropy.
    #[must_use]
    pub fn new(catalog: LevelCatalog) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Creates a deterministic engine for tests and reproducible simulations.
    #[must_use]
    pub fn with_seed(catalog: LevelCatalog, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    #[must_use]
    pub fn with_rng(catalog: LevelCatalog, rng: R) -> Self {
        Self {
            catalog,
            rng,
            current_level: None,
        }
    }

    #[must_use]
    pub fn grid_size(&self) -> u16 {
        self.catalog.grid_size()
    }

    #[must_use]
    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Returns the configuration of level `number`.
    ///
    /// The most recent configuration is cached, so a procedural level keeps
    /// its rules while it is being played.
    pub fn level_config(&mut self, number: u32) -> &LevelConfig {
        cached_level(&mut self.current_level, &self.catalog, &mut self.rng, number)
    }

    /// Builds a fresh game starting at `level`.
    ///
    /// # Panics
    ///
    /// Panics when `level` is zero.
    pub fn initialize_game(&mut self, level: u32) -> GameState {
        self.current_level = None;
        let state = GameState::from_level(self.level_config(level));
        info!(
            "starting level {level} with {} obstacles",
            state.obstacles.len()
        );
        state
    }

    /// Advances `state` by one tick and returns the next state.
    ///
    /// Paused and finished games are returned unchanged. A fatal collision
    /// ends the game without moving the snake into the fatal cell.
    pub fn update_game_state(&mut self, state: &GameState) -> GameState {
        if !state.is_active() {
            return state.clone();
        }

        let grid_size = self.catalog.grid_size();
        let level = cached_level(
            &mut self.current_level,
            &self.catalog,
            &mut self.rng,
            state.level,
        );

        let direction = if direction_change_is_valid(state.direction, state.next_direction) {
            state.next_direction
        } else {
            state.direction
        };
        let new_head = get_new_head(state.snake.head(), direction, grid_size, level.has_walls);
        let moved = state.snake.advanced(new_head);

        let collision = check_all_collisions(
            &moved,
            &state.food,
            grid_size,
            level.has_walls,
            &state.obstacles,
        );

        match collision {
            Some(collision) if collision.is_fatal() => {
                let reason = DeathReason::from_collision(collision.kind);
                info!(
                    "game over at level {} with score {}: {reason:?}",
                    state.level, state.score
                );
                state.ended(reason)
            }
            Some(collision) => self.eat(state, new_head, direction, collision),
            None => GameState {
                snake: moved,
                direction,
                ..state.clone()
            },
        }
    }

    fn eat(
        &mut self,
        state: &GameState,
        new_head: Position,
        direction: Direction,
        collision: Collision,
    ) -> GameState {
        let grid_size = self.catalog.grid_size();
        let level = cached_level(
            &mut self.current_level,
            &self.catalog,
            &mut self.rng,
            state.level,
        );
        let required_score = level.required_score;

        let snake = state.snake.grown(new_head);
        let score = state.score + state.food.kind.value();
        let speed = match collision.effect {
            Effect::SpeedUp => sped_up(state.speed),
            Effect::SlowDown => slowed_down(state.speed),
            _ => state.speed,
        };

        let food = match generate_food(&mut self.rng, grid_size, &snake, &state.obstacles, level) {
            Ok(food) => food,
            Err(error) => {
                warn!("{error}");
                return GameState {
                    snake,
                    score,
                    speed,
                    direction,
                    ..state.ended(DeathReason::BoardFull)
                };
            }
        };
        if food.kind != FoodKind::Regular {
            debug!("spawned {:?} food at {:?}", food.kind, food.position);
        }

        let mut next = GameState {
            snake,
            food,
            score,
            speed,
            direction,
            ..state.clone()
        };

        if score >= required_score {
            next.level = state.level + 1;
            next.speed = self.level_config(next.level).speed;
            debug!(
                "score {score} reached {required_score}, advancing to level {}",
                next.level
            );
        }

        next
    }
}

fn cached_level<'a, R: Rng + ?Sized>(
    cache: &'a mut Option<LevelConfig>,
    catalog: &LevelCatalog,
    rng: &mut R,
    number: u32,
) -> &'a LevelConfig {
    if cache.as_ref().is_some_and(|level| level.id != number) {
        *cache = None;
    }
    cache.get_or_insert_with(|| catalog.level(number, rng))
}
