use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::board::Size;
use crate::error::{GameError, GameResult};

/// Largest grid the terminal layout can show left of the side panel
pub const MAX_BOARD_WIDTH: i32 = 41;
pub const MAX_BOARD_HEIGHT: i32 = 40;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub board_width: i32,
    /// Height of the game grid
    pub board_height: i32,
    /// Largest edge the resize toggle cycles up to
    pub max_board_size: i32,
    /// Step of the resize toggle
    pub size_increment: i32,
    /// Game tick and animation step, in milliseconds
    pub tick_interval_ms: u64,
    /// Fixed seed for candy placement
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 40,
            board_height: 40,
            max_board_size: 40,
            size_increment: 10,
            tick_interval_ms: 100,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            board_width: width,
            board_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Reads a JSON config; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> GameResult<()> {
        let size = self.board_size();
        if !size.is_valid() {
            return Err(GameError::validation(format!("board size {size} must be positive")));
        }
        if size.width > self.max_board_size || size.height > self.max_board_size {
            return Err(GameError::validation(format!(
                "board size {size} exceeds the maximum of {}",
                self.max_board_size
            )));
        }
        let limit = MAX_BOARD_WIDTH.min(MAX_BOARD_HEIGHT);
        if self.max_board_size > limit {
            return Err(GameError::validation(format!(
                "maximum board size {} does not fit the screen (at most {limit})",
                self.max_board_size
            )));
        }
        if self.size_increment <= 0 {
            return Err(GameError::validation("size increment must be positive"));
        }
        if self.size_increment > self.max_board_size {
            return Err(GameError::validation(format!(
                "size increment {} exceeds the maximum of {}",
                self.size_increment, self.max_board_size
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(GameError::validation("tick interval must be positive"));
        }
        Ok(())
    }

    pub fn board_size(&self) -> Size {
        Size::new(self.board_width, self.board_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Next size in the resize cycle: grows by one increment, wrapping to
    /// a single increment when either edge would pass the maximum.
    pub fn next_board_size(&self, current: Size) -> Size {
        let grown = Size::new(
            current.width.saturating_add(self.size_increment),
            current.height.saturating_add(self.size_increment),
        );
        if grown.width <= self.max_board_size && grown.height <= self.max_board_size {
            grown
        } else {
            Size::square(self.size_increment)
        }
    }
}
