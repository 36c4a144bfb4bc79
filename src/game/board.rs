use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::error::{GameError, GameResult};

pub const SNAKE_HEAD: char = '■';
pub const SNAKE_BODY: char = '□';
pub const CANDY: char = '*';
pub const EMPTY: char = ' ';

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Board dimensions in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn square(edge: i32) -> Self {
        Self::new(edge, edge)
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A single glyph to draw at a board position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub position: Position,
    pub glyph: char,
}

impl Sprite {
    pub fn new(position: Position, glyph: char) -> Self {
        Self { position, glyph }
    }
}

/// What a cell holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Empty,
    SnakeBody,
    Candy,
    /// Reported for positions outside the board, never stored
    Wall,
}

/// Occupancy grid, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    size: Size,
    cells: Vec<Occupant>,
}

impl Board {
    pub fn new(size: Size) -> GameResult<Self> {
        if !size.is_valid() {
            return Err(GameError::validation(format!("invalid board size {size}")));
        }

        let cells = size
            .width
            .checked_mul(size.height)
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| GameError::validation(format!("board size {size} is too large")))?;

        Ok(Self {
            size,
            cells: vec![Occupant::Empty; cells],
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.size.width && pos.y >= 0 && pos.y < self.size.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| (pos.y * self.size.width + pos.x) as usize)
    }

    pub fn occupant(&self, pos: Position) -> Occupant {
        self.index(pos)
            .map_or(Occupant::Wall, |index| self.cells[index])
    }

    pub fn set(&mut self, pos: Position, occupant: Occupant) -> GameResult<()> {
        if occupant == Occupant::Wall {
            return Err(GameError::validation("walls are not stored on the board"));
        }

        let index = self
            .index(pos)
            .ok_or_else(|| GameError::validation(format!("position {pos} is out of bounds")))?;
        self.cells[index] = occupant;
        Ok(())
    }

    pub fn free_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Occupant::Empty)
            .count()
    }

    /// Picks uniformly among the empty cells
    pub fn random_free_position<R: Rng + ?Sized>(&self, rng: &mut R) -> GameResult<Position> {
        let free = self.free_count();
        if free == 0 {
            return Err(GameError::NoFreeSpace);
        }

        let nth = rng.gen_range(0..free);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Occupant::Empty)
            .nth(nth)
            .map(|(index, _)| {
                let index = index as i32;
                Position::new(index % self.size.width, index / self.size.width)
            })
            .ok_or(GameError::NoFreeSpace)
    }
}
