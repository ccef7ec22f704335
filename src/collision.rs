//! Collision classification between the snake head and the world, and the
//! gameplay effect each classification carries.
//!
//! Every function here is pure.

use crate::config::{MAX_SPEED_MS, MIN_SPEED_MS};
use crate::food::{Food, FoodKind};
use crate::input::Direction;
use crate::snake::{Position, Snake};

/// What the head ran into.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CollisionKind {
    Wall,
    Snake,
    Obstacle,
    Food,
}

/// Gameplay consequence of a collision.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Effect {
    Grow,
    Die,
    SpeedUp,
    SlowDown,
    ScoreBonus,
    None,
}

/// A detected collision with its effect and effect magnitude.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Collision {
    pub kind: CollisionKind,
    pub effect: Effect,
    pub value: u32,
}

impl Collision {
    const fn fatal(kind: CollisionKind) -> Self {
        Self {
            kind,
            effect: Effect::Die,
            value: 0,
        }
    }

    /// Returns true when this collision ends the game.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        self.effect == Effect::Die
    }

    fn value_or(self, default: u32) -> u32 {
        if self.value == 0 { default } else { self.value }
    }
}

/// Snake, score and speed after one effect has been applied.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EffectOutcome {
    pub snake: Snake,
    pub score: u32,
    pub speed: u32,
    pub is_game_over: bool,
}

/// Reports a wall hit when walls are enabled and `head` left the grid.
///
/// Without walls the grid is toroidal and this never collides.
#[must_use]
pub fn check_wall_collision(head: Position, grid_size: u16, has_walls: bool) -> Option<Collision> {
    if has_walls && !head.is_within_bounds(grid_size) {
        Some(Collision::fatal(CollisionKind::Wall))
    } else {
        None
    }
}

/// Reports a hit when the head shares a cell with any other segment.
#[must_use]
pub fn check_self_collision(snake: &Snake) -> Option<Collision> {
    snake
        .head_overlaps_body()
        .then_some(Collision::fatal(CollisionKind::Snake))
}

#[must_use]
pub fn check_obstacle_collision(head: Position, obstacles: &[Position]) -> Option<Collision> {
    obstacles
        .contains(&head)
        .then_some(Collision::fatal(CollisionKind::Obstacle))
}

/// Reports eating `food`, with the effect its kind carries.
#[must_use]
pub fn check_food_collision(head: Position, food: &Food) -> Option<Collision> {
    if head != food.position {
        return None;
    }

    let (effect, value) = match food.kind {
        FoodKind::Regular => (Effect::Grow, 1),
        FoodKind::Bonus => (Effect::Grow, 3),
        FoodKind::Speed => (Effect::SpeedUp, 1),
        FoodKind::Slow => (Effect::SlowDown, 1),
        FoodKind::Danger => (Effect::Die, 0),
    };

    Some(Collision {
        kind: CollisionKind::Food,
        effect,
        value,
    })
}

/// Checks wall, self, obstacle and food in that order and returns the first hit.
///
/// Fatal checks run before food so a head on both an obstacle and the food
/// dies instead of eating.
#[must_use]
pub fn check_all_collisions(
    snake: &Snake,
    food: &Food,
    grid_size: u16,
    has_walls: bool,
    obstacles: &[Position],
) -> Option<Collision> {
    let head = snake.head();

    check_wall_collision(head, grid_size, has_walls)
        .or_else(|| check_self_collision(snake))
        .or_else(|| check_obstacle_collision(head, obstacles))
        .or_else(|| check_food_collision(head, food))
}

/// Returns the cell the head moves into.
///
/// Without walls the moving axis wraps around the grid. With walls the result
/// may lie outside the grid so that `check_wall_collision` can reject it.
#[must_use]
pub fn get_new_head(
    head: Position,
    direction: Direction,
    grid_size: u16,
    has_walls: bool,
) -> Position {
    let stepped = head.stepped(direction);
    if has_walls {
        stepped
    } else {
        stepped.wrapped(grid_size)
    }
}

/// Applies exactly one effect of `collision` to snake, score and speed.
///
/// Growth appends `value` copies of the tail. Speed is a tick interval, so
/// speeding up shrinks it.
#[must_use]
pub fn handle_collision_effect(
    collision: &Collision,
    snake: &Snake,
    score: u32,
    speed: u32,
) -> EffectOutcome {
    let mut outcome = EffectOutcome {
        snake: snake.clone(),
        score,
        speed,
        is_game_over: false,
    };

    match collision.effect {
        Effect::Grow => {
            let grow_by = collision.value_or(1);
            outcome.snake = snake.with_tail_copies(grow_by as usize);
            outcome.score += grow_by;
        }
        Effect::SpeedUp => {
            outcome.speed = sped_up(speed);
            outcome.score += collision.value_or(1);
        }
        Effect::SlowDown => {
            outcome.speed = slowed_down(speed);
            outcome.score += collision.value_or(1);
        }
        Effect::ScoreBonus => outcome.score += collision.value_or(5),
        Effect::Die => outcome.is_game_over = true,
        Effect::None => {}
    }

    outcome
}

/// Shortens the tick interval by a fifth, never below `MIN_SPEED_MS`.
#[must_use]
pub fn sped_up(speed: u32) -> u32 {
    scaled(speed, 4).max(MIN_SPEED_MS)
}

/// Lengthens the tick interval by a fifth, never above `MAX_SPEED_MS`.
#[must_use]
pub fn slowed_down(speed: u32) -> u32 {
    scaled(speed, 6).min(MAX_SPEED_MS)
}

fn scaled(speed: u32, fifths: u64) -> u32 {
    u32::try_from(u64::from(speed) * fifths / 5).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        Collision, CollisionKind, Effect, check_all_collisions, check_food_collision,
        check_obstacle_collision, check_self_collision, check_wall_collision, get_new_head,
        handle_collision_effect, slowed_down, sped_up,
    };
    use crate::food::{Food, FoodKind};
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    fn snake_at(head: Position) -> Snake {
        Snake::from_segments(vec![head, Position::new(head.x - 1, head.y)])
    }

    #[test]
    fn wrapping_head_stays_inside_grid() {
        for size in [1_u16, 5, 20] {
            let max = i32::from(size) - 1;
            for corner in [
                Position::new(0, 0),
                Position::new(max, 0),
                Position::new(0, max),
                Position::new(max, max),
            ] {
                for direction in Direction::ALL {
                    let head = get_new_head(corner, direction, size, false);
                    assert!(head.is_within_bounds(size), "{head:?} escaped {size}");
                }
            }
        }
    }

    #[test]
    fn wrapping_handles_negative_delta() {
        assert_eq!(
            get_new_head(Position::new(0, 7), Direction::Left, 20, false),
            Position::new(19, 7)
        );
        assert_eq!(
            get_new_head(Position::new(7, 0), Direction::Up, 20, false),
            Position::new(7, 19)
        );
    }

    #[test]
    fn walled_head_leaves_grid_and_hits_wall() {
        let head = get_new_head(Position::new(19, 5), Direction::Right, 20, true);

        assert_eq!(head, Position::new(20, 5));
        let collision = check_wall_collision(head, 20, true).expect("wall hit");
        assert_eq!(collision.kind, CollisionKind::Wall);
        assert_eq!(collision.effect, Effect::Die);

        let head = get_new_head(Position::new(0, 0), Direction::Up, 20, true);
        assert_eq!(head, Position::new(0, -1));
        assert!(check_wall_collision(head, 20, true).is_some());
    }

    #[test]
    fn wall_check_is_disabled_without_walls() {
        assert_eq!(check_wall_collision(Position::new(-1, 30), 20, false), None);
        assert_eq!(check_wall_collision(Position::new(3, 3), 20, true), None);
    }

    #[test]
    fn self_collision_ignores_head_index() {
        let snake = Snake::from_segments(vec![Position::new(1, 1)]);
        assert_eq!(check_self_collision(&snake), None);

        let looped = Snake::from_segments(vec![
            Position::new(1, 1),
            Position::new(2, 1),
            Position::new(1, 1),
        ]);
        let collision = check_self_collision(&looped).expect("self hit");
        assert_eq!(collision.kind, CollisionKind::Snake);
        assert!(collision.is_fatal());
    }

    #[test]
    fn obstacle_collision_matches_any_cell() {
        let obstacles = [Position::new(1, 1), Position::new(4, 2)];

        assert!(check_obstacle_collision(Position::new(4, 2), &obstacles).is_some());
        assert!(check_obstacle_collision(Position::new(4, 3), &obstacles).is_none());
    }

    #[test]
    fn food_effects_follow_kind() {
        let head = Position::new(2, 2);
        let cases = [
            (FoodKind::Regular, Effect::Grow, 1),
            (FoodKind::Bonus, Effect::Grow, 3),
            (FoodKind::Speed, Effect::SpeedUp, 1),
            (FoodKind::Slow, Effect::SlowDown, 1),
            (FoodKind::Danger, Effect::Die, 0),
        ];

        for (kind, effect, value) in cases {
            let collision = check_food_collision(head, &Food::new(head, kind)).expect("eaten");
            assert_eq!(collision.kind, CollisionKind::Food);
            assert_eq!(collision.effect, effect, "{kind:?}");
            assert_eq!(collision.value, value, "{kind:?}");
        }

        assert!(check_food_collision(Position::new(0, 0), &Food::regular(head)).is_none());
    }

    #[test]
    fn obstacle_wins_over_food_on_same_cell() {
        let head = Position::new(5, 5);
        let snake = snake_at(head);
        let food = Food::regular(head);

        let collision = check_all_collisions(&snake, &food, 20, false, &[head]).expect("hit");

        assert_eq!(collision.kind, CollisionKind::Obstacle);
        assert_eq!(collision.effect, Effect::Die);
    }

    #[test]
    fn wall_is_checked_first() {
        let head = Position::new(20, 5);
        let snake = Snake::from_segments(vec![head, Position::new(19, 5), head]);
        let food = Food::regular(head);

        let collision = check_all_collisions(&snake, &food, 20, true, &[head]).expect("hit");

        assert_eq!(collision.kind, CollisionKind::Wall);
    }

    #[test]
    fn no_collision_returns_none() {
        let snake = snake_at(Position::new(5, 5));
        let food = Food::regular(Position::new(9, 9));

        assert_eq!(check_all_collisions(&snake, &food, 20, true, &[]), None);
    }

    #[test]
    fn grow_effect_appends_tail_copies_and_scores_value() {
        let snake = snake_at(Position::new(5, 5));
        let collision = Collision {
            kind: CollisionKind::Food,
            effect: Effect::Grow,
            value: 3,
        };

        let outcome = handle_collision_effect(&collision, &snake, 10, 150);

        assert_eq!(outcome.snake.len(), 5);
        assert_eq!(outcome.snake.tail(), snake.tail());
        assert_eq!(outcome.score, 13);
        assert_eq!(outcome.speed, 150);
        assert!(!outcome.is_game_over);
    }

    #[test]
    fn speed_effects_are_clamped() {
        let snake = snake_at(Position::new(5, 5));
        let speed_up = Collision {
            kind: CollisionKind::Food,
            effect: Effect::SpeedUp,
            value: 1,
        };
        let slow_down = Collision {
            effect: Effect::SlowDown,
            ..speed_up
        };

        assert_eq!(handle_collision_effect(&speed_up, &snake, 0, 150).speed, 120);
        assert_eq!(handle_collision_effect(&speed_up, &snake, 0, 55).speed, 50);
        assert_eq!(handle_collision_effect(&slow_down, &snake, 0, 150).speed, 180);
        assert_eq!(handle_collision_effect(&slow_down, &snake, 0, 290).speed, 300);
        assert_eq!(handle_collision_effect(&slow_down, &snake, 4, 150).score, 5);
        assert_eq!(sped_up(50), 50);
        assert_eq!(slowed_down(300), 300);
    }

    #[test]
    fn speed_effects_do_not_overflow_on_huge_intervals() {
        assert_eq!(slowed_down(4_000_000_000), 300);
        assert_eq!(slowed_down(u32::MAX), 300);
        assert_eq!(sped_up(u32::MAX), 3_435_973_836);
    }

    #[test]
    fn score_bonus_defaults_to_five_without_growth() {
        let snake = snake_at(Position::new(5, 5));
        let bonus = Collision {
            kind: CollisionKind::Food,
            effect: Effect::ScoreBonus,
            value: 0,
        };

        let outcome = handle_collision_effect(&bonus, &snake, 2, 150);

        assert_eq!(outcome.score, 7);
        assert_eq!(outcome.snake, snake);
    }

    #[test]
    fn die_and_none_effects() {
        let snake = snake_at(Position::new(5, 5));
        let die = Collision {
            kind: CollisionKind::Obstacle,
            effect: Effect::Die,
            value: 0,
        };
        let none = Collision {
            effect: Effect::None,
            ..die
        };

        assert!(handle_collision_effect(&die, &snake, 3, 150).is_game_over);

        let unchanged = handle_collision_effect(&none, &snake, 3, 150);
        assert_eq!(unchanged.snake, snake);
        assert_eq!(unchanged.score, 3);
        assert_eq!(unchanged.speed, 150);
        assert!(!unchanged.is_game_over);
    }
}
