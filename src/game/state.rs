//! Round orchestration on top of the game board.

use tracing::{debug, info};

use super::board::{Occupant, Position, Size, Sprite};
use super::direction::Direction;
use super::engine::{GameBoard, SnakeBoard};
use crate::error::{GameError, GameResult, ResultExt};

/// Where the state machine stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    GameOver,
}

/// Why the last round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOver {
    /// Snake hit a wall
    WallCollision,
    /// Snake hit itself
    SelfCollision,
    /// No cell left for a new candy
    BoardFull,
}

impl GameOver {
    fn from_error(err: &GameError) -> Option<Self> {
        match err.root() {
            GameError::WallCollision(_) => Some(Self::WallCollision),
            GameError::SelfCollision(_) => Some(Self::SelfCollision),
            GameError::NoFreeSpace => Some(Self::BoardFull),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WallCollision => "WALL",
            Self::SelfCollision => "SELF BITE",
            Self::BoardFull => "BOARD FULL - YOU WIN",
        }
    }
}

/// Complete game state
pub struct GameState {
    board: Box<dyn SnakeBoard>,
    round: u32,
    score: u32,
    high_score: u32,
    dirty: bool,
    phase: Phase,
    game_over: Option<GameOver>,
}

impl GameState {
    /// A state over a fresh [`GameBoard`]; `init_board` is still owed.
    pub fn new(size: Size) -> GameResult<Self> {
        Ok(Self::with_board(Box::new(GameBoard::new(size)?)))
    }

    pub fn with_seed(size: Size, seed: u64) -> GameResult<Self> {
        Ok(Self::with_board(Box::new(GameBoard::with_seed(size, seed)?)))
    }

    pub fn with_board(board: Box<dyn SnakeBoard>) -> Self {
        Self {
            board,
            round: 0,
            score: 0,
            high_score: 0,
            dirty: true,
            phase: Phase::NotStarted,
            game_over: None,
        }
    }

    /// Recreates the board. `dirty` stays set if this fails.
    pub fn init_board(&mut self, size: Size) -> GameResult<()> {
        self.dirty = true;
        self.board.init_game_board(size).traced("init_board")?;

        self.dirty = false;
        self.phase = Phase::NotStarted;
        self.game_over = None;
        info!(%size, "board initialized");
        Ok(())
    }

    /// Spawns the snake at the centre heading right, then the candy.
    pub fn create_objects(&mut self) -> GameResult<Vec<Sprite>> {
        let center = self.board.board_size().center();
        let snake = self
            .board
            .create_snake(center, Direction::Right)
            .traced("create_objects")?;
        let candy = self.board.create_candy().traced("create_objects")?;
        Ok(vec![snake, candy])
    }

    /// Begins a round. The high score is kept.
    pub fn start(&mut self) {
        self.round = 0;
        self.score = 0;
        self.game_over = None;
        self.phase = Phase::InProgress;
        info!(high_score = self.high_score, "round started");
    }

    /// Plays one tick and returns the sprite diff.
    ///
    /// A collision or a full board ends the round: the phase moves to
    /// `GameOver` and the error is returned so the caller can stop ticking.
    pub fn play(&mut self) -> GameResult<Vec<Sprite>> {
        match self.board.move_snake() {
            Ok(outcome) => {
                if outcome.encountered == Occupant::Candy {
                    self.add_point();
                }
                self.round += 1;
                Ok(outcome.sprites)
            }
            Err(err) => {
                if let Some(reason) = GameOver::from_error(&err) {
                    if reason == GameOver::BoardFull {
                        // the last candy was eaten before the board saturated
                        self.add_point();
                    }
                    self.end_round(reason);
                }
                Err(err.traced("play"))
            }
        }
    }

    fn add_point(&mut self) {
        self.score += 1;
        self.high_score = self.high_score.max(self.score);
        debug!(score = self.score, "candy eaten");
    }

    fn end_round(&mut self, reason: GameOver) {
        info!(?reason, score = self.score, round = self.round, "round over");
        self.phase = Phase::GameOver;
        self.game_over = Some(reason);
        self.dirty = true;
    }

    pub fn turn(&mut self, direction: Direction) {
        self.board.set_snake_direction(direction);
    }

    pub fn move_up(&mut self) {
        self.turn(Direction::Up);
    }

    pub fn move_down(&mut self) {
        self.turn(Direction::Down);
    }

    pub fn move_left(&mut self) {
        self.turn(Direction::Left);
    }

    pub fn move_right(&mut self) {
        self.turn(Direction::Right);
    }

    pub fn in_progress(&self) -> bool {
        self.phase == Phase::InProgress
    }

    /// Clearing the flag mid-round ends the round without a reason.
    pub fn set_in_progress(&mut self, in_progress: bool) {
        match (in_progress, self.phase) {
            (true, _) => self.phase = Phase::InProgress,
            (false, Phase::InProgress) => {
                self.phase = Phase::GameOver;
                self.dirty = true;
            }
            (false, _) => {}
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> Option<GameOver> {
        self.game_over
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn board_size(&self) -> Size {
        self.board.board_size()
    }

    pub fn snake_size(&self) -> GameResult<usize> {
        self.board.snake_size()
    }

    pub fn snake_position(&self) -> GameResult<Position> {
        self.board.snake_position()
    }

    pub fn candy_position(&self) -> Option<Position> {
        self.board.candy_position()
    }
}
