//! Greedy auto-play policy.
//!
//! The policy only picks a direction; the engine still moves the snake.

use crate::collision::{check_all_collisions, get_new_head};
use crate::game::GameState;
use crate::input::{Direction, direction_change_is_valid};
use crate::level::LevelConfig;

/// Chooses the next direction, heading greedily for the food.
///
/// Horizontal moves toward the food are tried first, then vertical ones, then
/// any other direction. Reversals and moves that would end the game are
/// skipped. Keeps the current direction when nothing is safe.
#[must_use]
pub fn next_direction(state: &GameState, level: &LevelConfig, grid_size: u16) -> Direction {
    let current = state.direction;
    let (dx, dy) = food_delta(state, level.has_walls, grid_size);

    let horizontal = match dx {
        0 => None,
        dx if dx > 0 => Some(Direction::Right),
        _ => Some(Direction::Left),
    };
    let vertical = match dy {
        0 => None,
        dy if dy > 0 => Some(Direction::Down),
        _ => Some(Direction::Up),
    };

    horizontal
        .into_iter()
        .chain(vertical)
        .chain(Direction::ALL)
        .find(|direction| {
            direction_change_is_valid(current, *direction)
                && is_safe(state, level, grid_size, *direction)
        })
        .unwrap_or(current)
}

/// Offset from head to food, taking the short way around when the grid wraps.
fn food_delta(state: &GameState, has_walls: bool, grid_size: u16) -> (i32, i32) {
    let head = state.snake.head();
    let food = state.food.position;
    let mut dx = food.x - head.x;
    let mut dy = food.y - head.y;

    if !has_walls {
        let size = i32::from(grid_size);
        if dx.abs() > size / 2 {
            dx -= size * dx.signum();
        }
        if dy.abs() > size / 2 {
            dy -= size * dy.signum();
        }
    }

    (dx, dy)
}

fn is_safe(state: &GameState, level: &LevelConfig, grid_size: u16, direction: Direction) -> bool {
    let head = get_new_head(state.snake.head(), direction, grid_size, level.has_walls);
    let moved = state.snake.advanced(head);

    check_all_collisions(
        &moved,
        &state.food,
        grid_size,
        level.has_walls,
        &state.obstacles,
    )
    .is_none_or(|collision| !collision.is_fatal())
}
