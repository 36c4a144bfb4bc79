//! The display sink the game talks to, and its queued implementation.
//!
//! Calls never draw directly: they are turned into [`DisplayCommand`]s and
//! queued to the UI task, which applies them in submission order.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::screen::ViewId;
use crate::error::{GameError, GameResult};
use crate::game::{Size, Sprite};

pub type SharedDisplay = Arc<dyn DisplaySink>;

pub trait DisplaySink: Send + Sync {
    /// Draws sprites into a view
    fn update(&self, view: ViewId, sprites: &[Sprite]) -> GameResult<()>;

    /// Appends a line of text to a view
    fn update_line(&self, view: ViewId, line: &str) -> GameResult<()>;

    /// Replaces the whole content of a view
    fn set_layout(&self, view: ViewId, layout: Vec<String>) -> GameResult<()>;

    /// Like `set_layout`, highlighted as an error
    fn display_red_layout(&self, view: ViewId, layout: Vec<String>) -> GameResult<()>;

    fn clear_view(&self, view: ViewId) -> GameResult<()>;

    /// Resizes the board view to fit a board of `size`
    fn resize_board(&self, size: Size) -> GameResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCommand {
    Sprites(ViewId, Vec<Sprite>),
    Line(ViewId, String),
    Layout(ViewId, Vec<String>),
    Alert(ViewId, Vec<String>),
    Clear(ViewId),
    ResizeBoard(Size),
}

/// Sink feeding the UI task through an unbounded queue
#[derive(Debug, Clone)]
pub struct QueuedDisplay {
    commands: UnboundedSender<DisplayCommand>,
}

impl QueuedDisplay {
    pub fn channel() -> (Self, UnboundedReceiver<DisplayCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        (Self { commands }, receiver)
    }

    fn submit(&self, command: DisplayCommand) -> GameResult<()> {
        self.commands
            .send(command)
            .map_err(|_| GameError::display_closed())
    }
}

impl DisplaySink for QueuedDisplay {
    fn update(&self, view: ViewId, sprites: &[Sprite]) -> GameResult<()> {
        self.submit(DisplayCommand::Sprites(view, sprites.to_vec()))
    }

    fn update_line(&self, view: ViewId, line: &str) -> GameResult<()> {
        self.submit(DisplayCommand::Line(view, line.to_string()))
    }

    fn set_layout(&self, view: ViewId, layout: Vec<String>) -> GameResult<()> {
        self.submit(DisplayCommand::Layout(view, layout))
    }

    fn display_red_layout(&self, view: ViewId, layout: Vec<String>) -> GameResult<()> {
        self.submit(DisplayCommand::Alert(view, layout))
    }

    fn clear_view(&self, view: ViewId) -> GameResult<()> {
        self.submit(DisplayCommand::Clear(view))
    }

    fn resize_board(&self, size: Size) -> GameResult<()> {
        self.submit(DisplayCommand::ResizeBoard(size))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Which sink operation to make fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Op {
        Update,
        UpdateLine,
        SetLayout,
        RedLayout,
        Clear,
        Resize,
    }

    /// Records every command; chosen operations fail instead.
    #[derive(Debug, Default)]
    pub struct RecordingDisplay {
        commands: Mutex<Vec<DisplayCommand>>,
        failing: Mutex<Vec<(Op, &'static str)>>,
    }

    impl RecordingDisplay {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn failing_on(op: Op, message: &'static str) -> Arc<Self> {
            let display = Self::default();
            display.fail(op, message);
            Arc::new(display)
        }

        pub fn fail(&self, op: Op, message: &'static str) {
            self.failing.lock().unwrap().push((op, message));
        }

        pub fn commands(&self) -> Vec<DisplayCommand> {
            self.commands.lock().unwrap().clone()
        }

        pub fn lines(&self, view: ViewId) -> Vec<String> {
            self.commands()
                .into_iter()
                .filter_map(|command| match command {
                    DisplayCommand::Line(v, line) if v == view => Some(line),
                    _ => None,
                })
                .collect()
        }

        pub fn alerts(&self) -> Vec<Vec<String>> {
            self.commands()
                .into_iter()
                .filter_map(|command| match command {
                    DisplayCommand::Alert(_, layout) => Some(layout),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, op: Op, command: DisplayCommand) -> GameResult<()> {
            let failure = self
                .failing
                .lock()
                .unwrap()
                .iter()
                .find(|(failing, _)| *failing == op)
                .map(|(_, message)| *message);
            if let Some(message) = failure {
                return Err(GameError::Io(std::io::Error::other(message)));
            }
            self.commands.lock().unwrap().push(command);
            Ok(())
        }
    }

    impl DisplaySink for RecordingDisplay {
        fn update(&self, view: ViewId, sprites: &[Sprite]) -> GameResult<()> {
            self.record(Op::Update, DisplayCommand::Sprites(view, sprites.to_vec()))
        }

        fn update_line(&self, view: ViewId, line: &str) -> GameResult<()> {
            self.record(Op::UpdateLine, DisplayCommand::Line(view, line.to_string()))
        }

        fn set_layout(&self, view: ViewId, layout: Vec<String>) -> GameResult<()> {
            self.record(Op::SetLayout, DisplayCommand::Layout(view, layout))
        }

        fn display_red_layout(&self, view: ViewId, layout: Vec<String>) -> GameResult<()> {
            self.record(Op::RedLayout, DisplayCommand::Alert(view, layout))
        }

        fn clear_view(&self, view: ViewId) -> GameResult<()> {
            self.record(Op::Clear, DisplayCommand::Clear(view))
        }

        fn resize_board(&self, size: Size) -> GameResult<()> {
            self.record(Op::Resize, DisplayCommand::ResizeBoard(size))
        }
    }
}
