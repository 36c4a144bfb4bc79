use std::collections::VecDeque;

use super::board::Position;
use super::direction::Direction;

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    body: VecDeque<Position>,
    /// Direction of the last step
    direction: Direction,
    /// Heading requested by the player, applied at the next step
    pending: Option<Direction>,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(head: Position, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([head]),
            direction,
            pending: None,
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn body(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true for a live snake
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Records a heading change; the latest request wins.
    pub fn request_direction(&mut self, direction: Direction) {
        self.pending = Some(direction);
    }

    /// Applies the pending heading unless it would turn the head back onto
    /// the second segment.
    pub fn resolve_direction(&mut self) -> Direction {
        if let Some(requested) = self.pending.take() {
            if self.len() > 1 && self.head().moved_in_direction(requested) == self.body[1] {
                tracing::debug!(
                    ?requested,
                    current = ?self.direction,
                    reversal = requested == self.direction.opposite(),
                    "turn onto the neck rejected"
                );
            } else {
                self.direction = requested;
            }
        }
        self.direction
    }

    pub fn next_head(&self) -> Position {
        self.head().moved_in_direction(self.direction)
    }

    /// Whether `pos` hits the body. The tail only counts when the snake is
    /// growing, otherwise it moves out of the way during the same step.
    pub fn hits_body(&self, pos: Position, growing: bool) -> bool {
        let last = self.body.len() - 1;
        self.body
            .iter()
            .enumerate()
            .any(|(i, segment)| *segment == pos && (growing || i != last))
    }

    /// Moves the head to `new_head`; returns the vacated tail cell unless
    /// the snake grows.
    pub fn advance(&mut self, new_head: Position, grow: bool) -> Option<Position> {
        self.body.push_front(new_head);

        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}
