use ratatui::style::Color;

use crate::food::FoodKind;

/// Side length of the square play grid, in cells.
pub const GRID_SIZE: u16 = 20;

/// Smallest grid a level catalog may declare.
///
/// Procedural levels always start the snake at `(3..=5, 5)`, so anything
/// smaller could not hold it.
pub const MIN_GRID_SIZE: u16 = 8;

/// Tick interval of the first level in milliseconds.
pub const BASE_SPEED_MS: u32 = 150;

/// Fastest allowed tick interval in milliseconds.
pub const MIN_SPEED_MS: u32 = 50;

/// Slowest allowed tick interval in milliseconds.
pub const MAX_SPEED_MS: u32 = 300;

/// Random draws tried before falling back to a full scan for a free cell.
pub const MAX_SAMPLING_ATTEMPTS: usize = 64;

/// Terminal columns used to draw one grid cell, keeping cells roughly square.
pub const CELL_WIDTH: u16 = 2;

pub const GLYPH_SNAKE_HEAD: &str = "██";
pub const GLYPH_SNAKE_BODY: &str = "▓▓";
pub const GLYPH_FOOD: &str = "()";
pub const GLYPH_OBSTACLE: &str = "▒▒";

pub const COLOR_SNAKE_HEAD: Color = Color::White;
pub const COLOR_SNAKE_BODY: Color = Color::Green;
pub const COLOR_OBSTACLE: Color = Color::DarkGray;
pub const COLOR_BORDER_OPEN: Color = Color::DarkGray;
pub const COLOR_BORDER_WALLS: Color = Color::Red;

/// Returns the color used to draw food of the given kind.
#[must_use]
pub fn food_color(kind: FoodKind) -> Color {
    match kind {
        FoodKind::Regular => Color::Red,
        FoodKind::Bonus => Color::Yellow,
        FoodKind::Speed => Color::Cyan,
        FoodKind::Slow => Color::Magenta,
        FoodKind::Danger => Color::LightRed,
    }
}
