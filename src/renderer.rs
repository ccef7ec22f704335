use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{
    CELL_WIDTH, COLOR_BORDER_OPEN, COLOR_BORDER_WALLS, COLOR_OBSTACLE, COLOR_SNAKE_BODY,
    COLOR_SNAKE_HEAD, GLYPH_FOOD, GLYPH_OBSTACLE, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD, food_color,
};
use crate::game::GameState;
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Renders the full game frame from an immutable state snapshot.
pub fn render(frame: &mut Frame<'_>, state: &GameState, hud_info: &HudInfo) {
    let area = frame.area();
    let play_area = render_hud(frame, area, state, hud_info);
    let board = board_area(play_area, hud_info.grid_size);

    let border_color = if hud_info.has_walls {
        COLOR_BORDER_WALLS
    } else {
        COLOR_BORDER_OPEN
    };
    let block = Block::bordered().border_style(Style::new().fg(border_color));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_obstacles(frame, inner, state, hud_info.grid_size);
    render_food(frame, inner, state, hud_info.grid_size);
    render_snake(frame, inner, state, hud_info.grid_size);

    if !hud_info.started {
        render_start_menu(frame, board, hud_info.autopilot);
    } else if state.is_game_over {
        render_game_over_menu(frame, board, state.score, state.level, state.death_reason);
    } else if state.is_paused {
        render_pause_menu(frame, board);
    }
}

/// Centers a bordered square board for `grid_size` cells inside `area`.
fn board_area(area: Rect, grid_size: u16) -> Rect {
    let width = grid_size.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = grid_size.saturating_add(2);

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);

    board
}

fn render_obstacles(frame: &mut Frame<'_>, inner: Rect, state: &GameState, grid_size: u16) {
    let style = Style::new().fg(COLOR_OBSTACLE);
    let buffer = frame.buffer_mut();

    for obstacle in &state.obstacles {
        if let Some((x, y)) = logical_to_terminal(inner, grid_size, *obstacle) {
            buffer.set_string(x, y, GLYPH_OBSTACLE, style);
        }
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, state: &GameState, grid_size: u16) {
    let Some((x, y)) = logical_to_terminal(inner, grid_size, state.food.position) else {
        return;
    };

    let style = Style::new()
        .fg(food_color(state.food.kind))
        .add_modifier(Modifier::BOLD);
    frame.buffer_mut().set_string(x, y, GLYPH_FOOD, style);
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, state: &GameState, grid_size: u16) {
    let buffer = frame.buffer_mut();

    // Tail first so the head is drawn last and stays visible.
    for (index, segment) in state.snake.segments().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, grid_size, *segment) else {
            continue;
        };

        if index == 0 {
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(COLOR_SNAKE_HEAD)
                    .add_modifier(Modifier::BOLD),
            );
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(COLOR_SNAKE_BODY));
        }
    }
}

fn logical_to_terminal(inner: Rect, grid_size: u16, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(grid_size) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{board_area, logical_to_terminal};
    use crate::snake::Position;

    #[test]
    fn cells_map_to_double_width_columns() {
        let inner = Rect::new(1, 1, 40, 20);

        assert_eq!(
            logical_to_terminal(inner, 20, Position::new(0, 0)),
            Some((1, 1))
        );
        assert_eq!(
            logical_to_terminal(inner, 20, Position::new(19, 19)),
            Some((39, 20))
        );
    }

    #[test]
    fn out_of_grid_positions_are_not_drawn() {
        let inner = Rect::new(1, 1, 40, 20);

        assert_eq!(logical_to_terminal(inner, 20, Position::new(20, 5)), None);
        assert_eq!(logical_to_terminal(inner, 20, Position::new(-1, 5)), None);
    }

    #[test]
    fn clipped_board_hides_cells_past_the_edge() {
        let inner = Rect::new(0, 0, 10, 5);

        assert_eq!(logical_to_terminal(inner, 20, Position::new(7, 1)), None);
        assert_eq!(logical_to_terminal(inner, 20, Position::new(1, 7)), None);
    }

    #[test]
    fn board_is_centered_in_area() {
        let board = board_area(Rect::new(0, 0, 80, 30), 20);

        assert_eq!(board.width, 42);
        assert_eq!(board.height, 22);
        assert_eq!(board.x, 19);
        assert_eq!(board.y, 4);
    }
}
