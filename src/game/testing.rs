//! Scripted board for driving `GameState` and the scheduler in tests.

use std::collections::VecDeque;

use super::board::{Occupant, Position, Size, Sprite, CANDY, SNAKE_HEAD};
use super::direction::Direction;
use super::engine::{MoveOutcome, SnakeBoard};
use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, Copy)]
pub enum Step {
    Move,
    Eat,
    Wall,
    /// Non-terminal failure
    Fail,
    Panic(&'static str),
}

pub struct ScriptedBoard {
    steps: VecDeque<Step>,
    /// Played once the script runs out
    fallback: Step,
    size: Size,
    head: Position,
}

impl ScriptedBoard {
    pub fn new(steps: impl IntoIterator<Item = Step>, fallback: Step) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            fallback,
            size: Size::square(10),
            head: Position::new(0, 0),
        }
    }

    /// Eats `candies` candies, then hits the wall
    pub fn eating(candies: u32) -> Self {
        Self::new((0..candies).map(|_| Step::Eat), Step::Wall)
    }

    /// `moves` plain steps, then the wall
    pub fn moving(moves: u32) -> Self {
        Self::new((0..moves).map(|_| Step::Move), Step::Wall)
    }

    pub fn endless() -> Self {
        Self::new([], Step::Move)
    }

    pub fn failing() -> Self {
        Self::new([], Step::Fail)
    }

    pub fn panicking(message: &'static str) -> Self {
        Self::new([], Step::Panic(message))
    }
}

impl SnakeBoard for ScriptedBoard {
    fn init_game_board(&mut self, size: Size) -> GameResult<()> {
        if !size.is_valid() {
            return Err(GameError::validation("invalid size"));
        }
        self.size = size;
        Ok(())
    }

    fn board_size(&self) -> Size {
        self.size
    }

    fn create_snake(&mut self, position: Position, _direction: Direction) -> GameResult<Sprite> {
        self.head = position;
        Ok(Sprite::new(position, SNAKE_HEAD))
    }

    fn create_candy(&mut self) -> GameResult<Sprite> {
        Ok(Sprite::new(Position::new(0, 0), CANDY))
    }

    fn remove_candy(&mut self) -> GameResult<()> {
        Ok(())
    }

    fn random_free_position(&mut self) -> GameResult<Position> {
        Ok(Position::new(0, 0))
    }

    fn set_snake_direction(&mut self, _direction: Direction) {}

    fn move_snake(&mut self) -> GameResult<MoveOutcome> {
        let step = self.steps.pop_front().unwrap_or(self.fallback);
        let encountered = match step {
            Step::Move => Occupant::Empty,
            Step::Eat => Occupant::Candy,
            Step::Wall => return Err(GameError::WallCollision(self.head)),
            Step::Fail => return Err(GameError::validation("scripted failure")),
            Step::Panic(message) => panic!("{}", message),
        };

        self.head = self.head.moved_by(1, 0);
        Ok(MoveOutcome {
            encountered,
            sprites: vec![Sprite::new(self.head, SNAKE_HEAD)],
        })
    }

    fn snake_size(&self) -> GameResult<usize> {
        Ok(1)
    }

    fn snake_position(&self) -> GameResult<Position> {
        Ok(self.head)
    }

    fn candy_position(&self) -> Option<Position> {
        Some(Position::new(0, 0))
    }

    fn candy_alive(&self) -> bool {
        true
    }
}
