//! The game board: sole owner and mutator of spatial state.
//!
//! [`GameBoard`] composes the occupancy [`Board`], the [`Snake`] and the
//! [`Candy`], and implements the per-tick movement and collision step.
//! [`GameState`](super::GameState) only sees it through the [`SnakeBoard`]
//! trait.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::board::{Board, Occupant, Position, Size, Sprite, CANDY, EMPTY, SNAKE_BODY, SNAKE_HEAD};
use super::candy::Candy;
use super::direction::Direction;
use super::snake::Snake;
use crate::error::{GameError, GameResult, ResultExt};

/// Result of one successful movement step
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    /// What was in the cell the head moved into
    pub encountered: Occupant,
    /// Cells to redraw, in drawing order
    pub sprites: Vec<Sprite>,
}

/// Operations the game state is allowed to use on the board
pub trait SnakeBoard: Send {
    /// Resets the grid to `size` with every cell empty
    fn init_game_board(&mut self, size: Size) -> GameResult<()>;

    fn board_size(&self) -> Size;

    fn create_snake(&mut self, position: Position, direction: Direction) -> GameResult<Sprite>;

    /// Places a new candy on a random free cell
    fn create_candy(&mut self) -> GameResult<Sprite>;

    /// Clears the candy cell, if any
    fn remove_candy(&mut self) -> GameResult<()>;

    fn random_free_position(&mut self) -> GameResult<Position>;

    /// Records a heading change for the next step
    fn set_snake_direction(&mut self, direction: Direction);

    /// Advances the snake by one cell
    fn move_snake(&mut self) -> GameResult<MoveOutcome>;

    fn snake_size(&self) -> GameResult<usize>;

    fn snake_position(&self) -> GameResult<Position>;

    fn candy_position(&self) -> Option<Position>;

    fn candy_alive(&self) -> bool;

    fn is_candy(&self, glyph: char) -> bool {
        glyph == CANDY
    }

    fn is_snake_part(&self, glyph: char) -> bool {
        glyph == SNAKE_HEAD || glyph == SNAKE_BODY
    }
}

pub struct GameBoard {
    board: Board,
    snake: Option<Snake>,
    candy: Option<Candy>,
    rng: StdRng,
}

impl GameBoard {
    /// A board of the given size seeded from entropy
    pub fn new(size: Size) -> GameResult<Self> {
        Self::with_rng(size, StdRng::from_entropy())
    }

    /// A reproducible board, candies land on the same cells for a seed
    pub fn with_seed(size: Size, seed: u64) -> GameResult<Self> {
        Self::with_rng(size, StdRng::seed_from_u64(seed))
    }

    fn with_rng(size: Size, rng: StdRng) -> GameResult<Self> {
        Ok(Self {
            board: Board::new(size).traced("new_game_board")?,
            snake: None,
            candy: None,
            rng,
        })
    }

    /// Places a candy on a chosen free cell
    pub fn place_candy(&mut self, position: Position) -> GameResult<Sprite> {
        self.remove_candy().traced("place_candy")?;
        if self.board.occupant(position) != Occupant::Empty {
            return Err(GameError::validation(format!(
                "cannot place candy on {position}: cell is not free"
            ))
            .traced("place_candy"));
        }

        self.board.set(position, Occupant::Candy).traced("place_candy")?;
        self.candy = Some(Candy::new(position));
        Ok(Sprite::new(position, CANDY))
    }

    pub fn occupant(&self, pos: Position) -> Occupant {
        self.board.occupant(pos)
    }

    pub fn snake(&self) -> Option<&Snake> {
        self.snake.as_ref()
    }

    fn clear_snake(&mut self) -> GameResult<()> {
        if let Some(snake) = self.snake.take() {
            for segment in snake.body() {
                self.board.set(*segment, Occupant::Empty)?;
            }
        }
        Ok(())
    }
}

impl SnakeBoard for GameBoard {
    fn init_game_board(&mut self, size: Size) -> GameResult<()> {
        self.board = Board::new(size).traced("init_game_board")?;
        self.snake = None;
        self.candy = None;
        Ok(())
    }

    fn board_size(&self) -> Size {
        self.board.size()
    }

    fn create_snake(&mut self, position: Position, direction: Direction) -> GameResult<Sprite> {
        self.clear_snake().traced("create_snake")?;

        match self.board.occupant(position) {
            Occupant::Empty => {}
            Occupant::Wall => {
                return Err(GameError::validation(format!(
                    "snake position {position} is out of bounds"
                ))
                .traced("create_snake"))
            }
            occupant => {
                return Err(GameError::validation(format!(
                    "snake position {position} is occupied by {occupant:?}"
                ))
                .traced("create_snake"))
            }
        }

        self.board
            .set(position, Occupant::SnakeBody)
            .traced("create_snake")?;
        self.snake = Some(Snake::new(position, direction));
        Ok(Sprite::new(position, SNAKE_HEAD))
    }

    fn create_candy(&mut self) -> GameResult<Sprite> {
        self.remove_candy().traced("create_candy")?;
        let position = self.random_free_position().traced("create_candy")?;
        self.place_candy(position).traced("create_candy")
    }

    fn remove_candy(&mut self) -> GameResult<()> {
        if let Some(candy) = self.candy.take() {
            if self.board.occupant(candy.position()) == Occupant::Candy {
                self.board
                    .set(candy.position(), Occupant::Empty)
                    .traced("remove_candy")?;
            }
        }
        Ok(())
    }

    fn random_free_position(&mut self) -> GameResult<Position> {
        self.board
            .random_free_position(&mut self.rng)
            .traced("random_free_position")
    }

    fn set_snake_direction(&mut self, direction: Direction) {
        if let Some(snake) = self.snake.as_mut() {
            snake.request_direction(direction);
        }
    }

    fn move_snake(&mut self) -> GameResult<MoveOutcome> {
        let snake = self
            .snake
            .as_mut()
            .ok_or_else(|| GameError::NoSnake.traced("move_snake"))?;
        snake.resolve_direction();

        let old_head = snake.head();
        let next = snake.next_head();
        if !self.board.contains(next) {
            return Err(GameError::WallCollision(next).traced("move_snake"));
        }

        let grows = self.candy.is_some_and(|candy| candy.is_at(next));
        if snake.hits_body(next, grows) {
            return Err(GameError::SelfCollision(next).traced("move_snake"));
        }

        let encountered = self.board.occupant(next);
        let vacated = snake.advance(next, grows);
        let long = snake.len() > 1;

        let mut sprites = Vec::with_capacity(4);
        if let Some(tail) = vacated.filter(|tail| *tail != next) {
            self.board.set(tail, Occupant::Empty).traced("move_snake")?;
            sprites.push(Sprite::new(tail, EMPTY));
        }
        if long {
            sprites.push(Sprite::new(old_head, SNAKE_BODY));
        }
        self.board
            .set(next, Occupant::SnakeBody)
            .traced("move_snake")?;
        sprites.push(Sprite::new(next, SNAKE_HEAD));

        if grows {
            if let Some(candy) = self.candy.as_mut() {
                candy.consume();
            }
            sprites.push(self.create_candy().traced("move_snake")?);
        }

        Ok(MoveOutcome {
            encountered,
            sprites,
        })
    }

    fn snake_size(&self) -> GameResult<usize> {
        self.snake
            .as_ref()
            .map(Snake::len)
            .ok_or(GameError::NoSnake)
            .traced("snake_size")
    }

    fn snake_position(&self) -> GameResult<Position> {
        self.snake
            .as_ref()
            .map(Snake::head)
            .ok_or(GameError::NoSnake)
            .traced("snake_position")
    }

    fn candy_position(&self) -> Option<Position> {
        self.candy.map(|candy| candy.position())
    }

    fn candy_alive(&self) -> bool {
        self.candy.is_some_and(|candy| candy.is_alive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_at(size: Size, head: Position, direction: Direction) -> GameBoard {
        let mut board = GameBoard::with_seed(size, 7).unwrap();
        board.create_snake(head, direction).unwrap();
        board
    }

    /// Turns, then drops a candy right in front of the head and eats it.
    fn grow_along(board: &mut GameBoard, turns: &[Direction]) {
        for direction in turns {
            board.set_snake_direction(*direction);
            let mut ahead = board.snake().unwrap().clone();
            ahead.resolve_direction();
            board.place_candy(ahead.next_head()).unwrap();
            assert_eq!(board.move_snake().unwrap().encountered, Occupant::Candy);
        }
    }

    #[test]
    fn test_init_rejects_non_positive_size() {
        let mut board = GameBoard::with_seed(Size::square(5), 1).unwrap();
        let err = board.init_game_board(Size::new(0, 5)).unwrap_err();
        assert!(matches!(err.root(), GameError::Validation(_)));
        assert!(GameBoard::new(Size::new(4, -1)).is_err());
    }

    #[test]
    fn test_create_snake_rejects_bad_positions() {
        let mut board = GameBoard::with_seed(Size::square(5), 1).unwrap();
        assert!(board
            .create_snake(Position::new(5, 0), Direction::Right)
            .is_err());

        board.place_candy(Position::new(2, 2)).unwrap();
        let err = board
            .create_snake(Position::new(2, 2), Direction::Right)
            .unwrap_err();
        assert!(matches!(err.root(), GameError::Validation(_)));
    }

    #[test]
    fn test_create_candy_avoids_snake() {
        let mut board = GameBoard::with_seed(Size::new(2, 1), 1).unwrap();
        board
            .create_snake(Position::new(0, 0), Direction::Right)
            .unwrap();

        let sprite = board.create_candy().unwrap();
        assert_eq!(sprite, Sprite::new(Position::new(1, 0), CANDY));
        assert!(board.candy_alive());
    }

    #[test]
    fn test_create_candy_fails_on_full_board() {
        let mut board = GameBoard::with_seed(Size::new(1, 1), 1).unwrap();
        board
            .create_snake(Position::new(0, 0), Direction::Right)
            .unwrap();

        let err = board.create_candy().unwrap_err();
        assert!(matches!(err.root(), GameError::NoFreeSpace));
    }

    #[test]
    fn test_queries_without_snake() {
        let board = GameBoard::with_seed(Size::square(3), 1).unwrap();
        assert!(matches!(
            board.snake_size().unwrap_err().root(),
            GameError::NoSnake
        ));
        assert!(board.snake_position().is_err());
        assert_eq!(board.candy_position(), None);
    }

    #[test]
    fn test_move_without_snake() {
        let mut board = GameBoard::with_seed(Size::square(3), 1).unwrap();
        let err = board.move_snake().unwrap_err();
        assert!(matches!(err.root(), GameError::NoSnake));
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut board = snake_at(Size::square(10), Position::new(5, 5), Direction::Right);
        board.place_candy(Position::new(0, 0)).unwrap();

        let outcome = board.move_snake().unwrap();

        assert_eq!(outcome.encountered, Occupant::Empty);
        assert_eq!(board.snake_size().unwrap(), 1);
        assert_eq!(board.snake_position().unwrap(), Position::new(6, 5));
        assert_eq!(
            outcome.sprites,
            vec![
                Sprite::new(Position::new(5, 5), EMPTY),
                Sprite::new(Position::new(6, 5), SNAKE_HEAD),
            ]
        );
        assert_eq!(board.occupant(Position::new(5, 5)), Occupant::Empty);
        assert_eq!(board.occupant(Position::new(6, 5)), Occupant::SnakeBody);
    }

    #[test]
    fn test_growth_move() {
        let mut board = snake_at(Size::square(10), Position::new(5, 5), Direction::Right);
        board.place_candy(Position::new(6, 5)).unwrap();

        let outcome = board.move_snake().unwrap();

        assert_eq!(outcome.encountered, Occupant::Candy);
        assert_eq!(board.snake_size().unwrap(), 2);
        let candy = board.candy_position().unwrap();
        assert!(board.candy_alive());
        assert!(!board.snake().unwrap().contains(candy));
        assert_eq!(board.occupant(candy), Occupant::Candy);
        assert_eq!(outcome.sprites.last(), Some(&Sprite::new(candy, CANDY)));
        assert_eq!(outcome.sprites[0], Sprite::new(Position::new(5, 5), SNAKE_BODY));
    }

    #[test]
    fn test_remove_candy_frees_its_cell() {
        let mut board = snake_at(Size::square(5), Position::new(2, 2), Direction::Right);
        board.place_candy(Position::new(0, 0)).unwrap();
        board.place_candy(Position::new(4, 4)).unwrap();
        assert_eq!(board.occupant(Position::new(0, 0)), Occupant::Empty);

        board.remove_candy().unwrap();

        assert_eq!(board.candy_position(), None);
        assert_eq!(board.occupant(Position::new(4, 4)), Occupant::Empty);
        // nothing left to remove
        board.remove_candy().unwrap();
    }

    #[test]
    fn test_reversal_keeps_heading_without_biting() {
        let mut board = snake_at(Size::square(10), Position::new(2, 2), Direction::Right);
        grow_along(&mut board, &[Direction::Right, Direction::Right]);
        board.place_candy(Position::new(0, 9)).unwrap();
        // body: (4,2) (3,2) (2,2)

        board.set_snake_direction(Direction::Left);
        let outcome = board.move_snake().unwrap();

        assert_eq!(outcome.encountered, Occupant::Empty);
        assert_eq!(board.snake().unwrap().direction(), Direction::Right);
        assert_eq!(board.snake_position().unwrap(), Position::new(5, 2));
        assert_eq!(board.snake_size().unwrap(), 3);
    }

    #[test]
    fn test_wall_collision_at_far_corner() {
        let size = Size::square(10);
        for direction in [Direction::Right, Direction::Down] {
            let mut board = GameBoard::with_seed(size, 1).unwrap();
            board.create_snake(Position::new(9, 9), direction).unwrap();

            let err = board.move_snake().unwrap_err();
            assert!(matches!(err.root(), GameError::WallCollision(_)));
            // board untouched
            assert_eq!(board.snake_position().unwrap(), Position::new(9, 9));
        }
    }

    #[test]
    fn test_moving_into_tail_is_allowed() {
        let mut board = snake_at(Size::square(10), Position::new(2, 2), Direction::Right);
        grow_along(
            &mut board,
            &[Direction::Right, Direction::Down, Direction::Left],
        );
        // body: (2,3) (3,3) (3,2) (2,2), tail right above the head
        assert_eq!(board.snake_size().unwrap(), 4);
        board.place_candy(Position::new(9, 9)).unwrap();

        board.set_snake_direction(Direction::Up);
        let outcome = board.move_snake().unwrap();

        assert_eq!(outcome.encountered, Occupant::SnakeBody);
        assert_eq!(board.snake_size().unwrap(), 4);
        assert_eq!(board.snake_position().unwrap(), Position::new(2, 2));
        assert_eq!(board.occupant(Position::new(2, 2)), Occupant::SnakeBody);
        assert!(!outcome.sprites.contains(&Sprite::new(Position::new(2, 2), EMPTY)));
    }

    #[test]
    fn test_moving_into_body_is_self_collision() {
        let mut board = snake_at(Size::square(10), Position::new(2, 2), Direction::Right);
        grow_along(&mut board, &[Direction::Right; 4]);
        board.place_candy(Position::new(0, 9)).unwrap();
        // body: (6,2) (5,2) (4,2) (3,2) (2,2)
        for direction in [Direction::Down, Direction::Left] {
            board.set_snake_direction(direction);
            board.move_snake().unwrap();
        }

        board.set_snake_direction(Direction::Up);
        let err = board.move_snake().unwrap_err();

        assert!(matches!(err.root(), GameError::SelfCollision(p) if *p == Position::new(5, 2)));
        assert!(err.is_terminal());
        assert_eq!(board.snake_size().unwrap(), 5);
    }

    #[test]
    fn test_candy_never_on_snake_while_alive() {
        let mut board = GameBoard::with_seed(Size::square(4), 99).unwrap();
        board
            .create_snake(Position::new(0, 0), Direction::Right)
            .unwrap();
        board.create_candy().unwrap();

        let path = [
            Direction::Right,
            Direction::Right,
            Direction::Down,
            Direction::Left,
            Direction::Left,
            Direction::Down,
            Direction::Right,
            Direction::Right,
        ];
        for direction in path {
            board.set_snake_direction(direction);
            match board.move_snake() {
                Ok(_) => {
                    let candy = board.candy_position().unwrap();
                    assert!(!board.snake().unwrap().contains(candy));
                }
                Err(err) => {
                    assert!(err.is_terminal());
                    break;
                }
            }
        }
    }

    #[test]
    fn test_saturating_growth_reports_no_free_space() {
        let mut board = GameBoard::with_seed(Size::new(2, 1), 1).unwrap();
        board
            .create_snake(Position::new(0, 0), Direction::Right)
            .unwrap();
        board.place_candy(Position::new(1, 0)).unwrap();

        let err = board.move_snake().unwrap_err();
        assert!(matches!(err.root(), GameError::NoFreeSpace));
        assert_eq!(board.snake_size().unwrap(), 2);
        assert!(!board.candy_alive());
    }

    #[test]
    fn test_glyph_classification() {
        let board = GameBoard::with_seed(Size::square(3), 1).unwrap();
        assert!(board.is_candy(CANDY));
        assert!(board.is_snake_part(SNAKE_HEAD));
        assert!(board.is_snake_part(SNAKE_BODY));
        assert!(!board.is_snake_part(CANDY));
        assert!(!board.is_candy(EMPTY));
    }
}
