//! Error taxonomy shared by the simulation, the scheduler and the UI.
//!
//! Every operation tags the errors it returns with its own name through
//! [`ResultExt::traced`], so a failure reads as a call chain such as
//! `game_engine: play: move_snake: wall collision at (10, 4)`. Classification
//! always looks at the root of that chain.

use thiserror::Error;

use crate::game::Position;

#[derive(Debug, Error)]
pub enum GameError {
    /// Bad size or position input
    #[error("validation error: {0}")]
    Validation(String),

    /// The head left the board
    #[error("wall collision at {0}")]
    WallCollision(Position),

    /// The head ran into the body
    #[error("self collision at {0}")]
    SelfCollision(Position),

    /// Every cell of the board is occupied
    #[error("no free space left on the board")]
    NoFreeSpace,

    /// The snake was queried or moved before being created
    #[error("invalid snake reference")]
    NoSnake,

    /// The display sink refused an update
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A panic recovered at a task boundary
    #[error("runtime error: {message}")]
    RuntimeFault {
        message: String,
        #[source]
        cause: Option<Box<GameError>>,
    },

    /// Intentional exit of the UI loop
    #[error("quit")]
    Quit,

    #[error("{origin}: {source}")]
    Traced {
        origin: &'static str,
        source: Box<GameError>,
    },
}

impl GameError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn runtime_fault(message: impl Into<String>) -> Self {
        Self::RuntimeFault {
            message: message.into(),
            cause: None,
        }
    }

    pub fn display_closed() -> Self {
        Self::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "display sink is closed",
        ))
    }

    /// Wraps the error with the name of the operation it is leaving.
    pub fn traced(self, origin: &'static str) -> Self {
        Self::Traced {
            origin,
            source: Box::new(self),
        }
    }

    /// The error at the bottom of the `Traced` chain.
    pub fn root(&self) -> &GameError {
        let mut current = self;
        while let GameError::Traced { source, .. } = current {
            current = source;
        }
        current
    }

    /// Collision and saturation end a round, they are not faults.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.root(),
            GameError::WallCollision(_) | GameError::SelfCollision(_) | GameError::NoFreeSpace
        )
    }

    pub fn is_quit(&self) -> bool {
        matches!(self.root(), GameError::Quit)
    }

    pub fn is_runtime_fault(&self) -> bool {
        matches!(self.root(), GameError::RuntimeFault { .. })
    }
}

pub type GameResult<T> = Result<T, GameError>;

pub trait ResultExt<T> {
    fn traced(self, origin: &'static str) -> GameResult<T>;
}

impl<T> ResultExt<T> for GameResult<T> {
    fn traced(self, origin: &'static str) -> GameResult<T> {
        self.map_err(|err| err.traced(origin))
    }
}
