//! Key handling for the UI task.
//!
//! [`InputContext`] carries everything the handler may touch: the shared
//! game, the display, the scheduler (which owns the input-resume flag) and
//! the board size the resize key cycles. The UI task is its only writer.

use tokio::sync::mpsc;
use tracing::{debug, info};

use super::scheduler::{lock_game, Report, Scheduler, SharedGame};
use crate::error::{GameError, GameResult, ResultExt};
use crate::game::{GameConfig, Size};
use crate::input::KeyAction;
use crate::render::views;
use crate::render::{SharedDisplay, ViewId};

pub struct InputContext {
    game: SharedGame,
    display: SharedDisplay,
    scheduler: Scheduler,
    config: GameConfig,
    board_size: Size,
    reports: mpsc::Sender<Report>,
}

impl InputContext {
    pub fn new(
        game: SharedGame,
        display: SharedDisplay,
        config: GameConfig,
        reports: mpsc::Sender<Report>,
    ) -> Self {
        let scheduler = Scheduler::new(game.clone(), display.clone(), config.tick_interval());
        Self {
            game,
            display,
            scheduler,
            board_size: config.board_size(),
            config,
            reports,
        }
    }

    pub fn board_size(&self) -> Size {
        self.board_size
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// First board, every view, and the players drawn on it.
    pub fn bootstrap(&mut self) -> GameResult<()> {
        self.init_game().traced("bootstrap")?;
        {
            let game = lock_game(&self.game);
            views::create_views(&game, self.display.as_ref(), self.board_size).traced("bootstrap")?;
        }
        views::clear_view(self.display.as_ref(), ViewId::Board).traced("bootstrap")?;
        self.display_players().traced("bootstrap")
    }

    /// Returns a traced `Quit` when the user asks to leave.
    pub fn handle_key_press(&mut self, action: KeyAction) -> GameResult<()> {
        match action {
            KeyAction::Quit => Err(GameError::Quit.traced("handle_key_press")),
            KeyAction::Turn(direction) => {
                lock_game(&self.game).turn(direction);
                Ok(())
            }
            KeyAction::Start => {
                if !self.accepts_setup() {
                    return Ok(());
                }
                let dirty = lock_game(&self.game).dirty();
                if dirty {
                    self.prepare_game().traced("handle_key_press")?;
                }
                self.scheduler
                    .start_game(self.reports.clone())
                    .traced("handle_key_press")
            }
            KeyAction::ToggleSize => {
                if !self.accepts_setup() {
                    return Ok(());
                }
                self.board_size = self.config.next_board_size(self.board_size);
                info!(size = %self.board_size, "board size toggled");
                self.prepare_game().traced("handle_key_press")
            }
            KeyAction::None => Ok(()),
        }
    }

    /// No round running and the game-over animation finished
    fn accepts_setup(&self) -> bool {
        let accepted = !lock_game(&self.game).in_progress() && self.scheduler.input_resumed();
        if !accepted {
            debug!("setup key ignored while a round is running");
        }
        accepted
    }

    fn prepare_game(&mut self) -> GameResult<()> {
        self.init_game().traced("prepare_game")?;
        views::create_board_view(self.display.as_ref(), self.board_size).traced("prepare_game")?;
        views::clear_view(self.display.as_ref(), ViewId::Board).traced("prepare_game")?;
        self.display_players().traced("prepare_game")?;

        let game = lock_game(&self.game);
        views::create_score_view(&game, self.display.as_ref()).traced("prepare_game")
    }

    fn init_game(&self) -> GameResult<()> {
        lock_game(&self.game)
            .init_board(self.board_size)
            .traced("init_game")
    }

    fn display_players(&self) -> GameResult<()> {
        let sprites = lock_game(&self.game)
            .create_objects()
            .traced("display_players")?;
        self.display
            .update(ViewId::Board, &sprites)
            .traced("display_players")
    }
}
