//! Term Snake - a terminal snake game
//!
//! This library provides:
//! - Core game logic: board, snake, candy and round state (game module)
//! - Typed errors with operation traces (error module)
//! - Panic recovery at task boundaries (guard module)
//! - View model and TUI rendering (render module)
//! - Key mapping (input module)
//! - The background tick loop and the interactive session (modes module)

pub mod error;
pub mod game;
pub mod guard;
pub mod input;
pub mod modes;
pub mod render;
