//! Grid snake: a tick-driven snake engine plus the terminal pieces that drive it.
//!
//! [`game::GameEngine`] holds the whole game state and never touches the clock,
//! the terminal or the disk. [`app::App`] schedules ticks, routes input and
//! records high scores; the binary wires it to crossterm and ratatui.

pub mod app;
pub mod clock;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
