//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.

pub mod board;
pub mod candy;
pub mod config;
pub mod direction;
pub mod engine;
pub mod snake;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use board::{Board, Occupant, Position, Size, Sprite};
pub use candy::Candy;
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameBoard, MoveOutcome, SnakeBoard};
pub use snake::Snake;
pub use state::{GameOver, GameState, Phase};
