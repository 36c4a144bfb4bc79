use super::board::Position;

/// The candy the snake chases. Relocation replaces it with a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candy {
    position: Position,
    alive: bool,
}

impl Candy {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            alive: true,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// True when a live candy sits on `pos`
    pub fn is_at(&self, pos: Position) -> bool {
        self.alive && self.position == pos
    }

    pub fn consume(&mut self) {
        self.alive = false;
    }
}
