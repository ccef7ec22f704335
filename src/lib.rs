//! Level-based Snake simulation engine.
//!
//! The engine advances a [`game::GameState`] one tick at a time through
//! [`game::Engine::update_game_state`]. Everything else in the crate feeds it
//! (input, autopilot) or draws its output (renderer, ui).

pub mod autopilot;
pub mod collision;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod level;
pub mod renderer;
pub mod snake;
pub mod ui;
