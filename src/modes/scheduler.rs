//! Background tasks driving a round.
//!
//! `start_game` spawns a supervisor which spawns the engine task and waits
//! for its single report on a one-slot channel. When the round ended
//! normally it spawns the game-over animation the same way, then forwards
//! the final report to the UI. Every task body runs inside
//! [`guard::catch_async`], so a panic turns into a red alert and a report
//! instead of tearing the process down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{GameError, GameResult, ResultExt};
use crate::game::{GameOver, GameState};
use crate::guard;
use crate::render::views::{self, ANIMATION_TITLE, ENGINE_TITLE, START_TITLE};
use crate::render::{DisplaySink, SharedDisplay, ViewId};

pub type SharedGame = Arc<Mutex<GameState>>;

/// What a task hands back when it ends: `Ok` or the error it stopped on
pub type Report = GameResult<()>;

/// Width of the scrolling window in the message view
const SCROLL_WIDTH: usize = 18;
/// Blank columns the message enters from
const SCROLL_LEAD: usize = SCROLL_WIDTH + 2;

pub fn lock_game(game: &SharedGame) -> MutexGuard<'_, GameState> {
    game.lock().unwrap_or_else(|poisoned| {
        warn!("game state lock poisoned by a panic, recovering");
        poisoned.into_inner()
    })
}

#[derive(Clone)]
pub struct Scheduler {
    game: SharedGame,
    display: SharedDisplay,
    tick_interval: Duration,
    scroll_over: Arc<AtomicBool>,
}

impl Scheduler {
    pub fn new(game: SharedGame, display: SharedDisplay, tick_interval: Duration) -> Self {
        Self {
            game,
            display,
            tick_interval,
            scroll_over: Arc::new(AtomicBool::new(true)),
        }
    }

    /// False while a round or its game-over animation is running
    pub fn input_resumed(&self) -> bool {
        self.scroll_over.load(Ordering::SeqCst)
    }

    /// Starts a round and returns at once; the outcome arrives on `reports`.
    pub fn start_game(&self, reports: mpsc::Sender<Report>) -> GameResult<()> {
        // drop the previous round's animation
        self.display
            .clear_view(ViewId::Message)
            .traced("start_game")?;
        lock_game(&self.game).start();
        let resume = ResumeInput::arm(Arc::clone(&self.scroll_over));
        let scheduler = self.clone();

        tokio::spawn(async move {
            let supervised = guard::catch_async("start_game", async {
                Ok::<_, GameError>(scheduler.supervise().await)
            })
            .await;
            let report = match supervised {
                Ok(report) => report,
                Err(fault) => handle_routine_error(scheduler.display.as_ref(), Err(fault), START_TITLE),
            };

            drop(resume);
            if let Err(err) = &report {
                info!(%err, "round reported an error");
            }
            if reports.send(report).await.is_err() {
                warn!("report receiver closed, dropping round report");
            }
        });

        Ok(())
    }

    async fn supervise(&self) -> Report {
        let (engine_tx, mut engine_rx) = mpsc::channel(1);
        tokio::spawn(self.clone().game_engine(engine_tx));
        let report = engine_rx
            .recv()
            .await
            .unwrap_or_else(|| Err(GameError::runtime_fault("game engine exited without a report")));

        let reason = {
            let game = lock_game(&self.game);
            if report.is_err() || game.in_progress() {
                return report;
            }
            game.game_over()
        };

        let (anim_tx, mut anim_rx) = mpsc::channel(1);
        tokio::spawn(self.clone().game_over_anim(reason, anim_tx));
        anim_rx
            .recv()
            .await
            .unwrap_or_else(|| Err(GameError::runtime_fault("animation exited without a report")))
    }

    async fn game_engine(self, reports: mpsc::Sender<Report>) {
        let result = guard::catch_async("game_engine", self.run_ticks()).await;
        lock_game(&self.game).set_in_progress(false);

        let report = handle_routine_error(self.display.as_ref(), result, ENGINE_TITLE);
        if reports.send(report).await.is_err() {
            warn!("supervisor gone before the engine reported");
        }
    }

    async fn run_ticks(&self) -> GameResult<()> {
        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.tick().traced("game_engine")? {
                return Ok(());
            }
        }
    }

    /// Plays one tick and publishes it. Returns whether the round goes on.
    fn tick(&self) -> GameResult<bool> {
        let mut game = lock_game(&self.game);
        if !game.in_progress() {
            return Ok(false);
        }

        let sprites = match game.play() {
            Ok(sprites) => sprites,
            Err(err) if err.is_terminal() => {
                debug!(%err, "round over");
                views::create_score_view(&game, self.display.as_ref())?;
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        views::create_score_view(&game, self.display.as_ref())?;
        self.display
            .update(ViewId::Board, &sprites)
            .traced("update_view")?;
        Ok(game.in_progress())
    }

    async fn game_over_anim(self, reason: Option<GameOver>, reports: mpsc::Sender<Report>) {
        let result = guard::catch_async("game_over_anim", self.scroll_message(reason)).await;

        let report = handle_routine_error(self.display.as_ref(), result, ANIMATION_TITLE);
        if reports.send(report).await.is_err() {
            warn!("supervisor gone before the animation reported");
        }
    }

    async fn scroll_message(&self, reason: Option<GameOver>) -> GameResult<()> {
        let frames = scroll_frames(reason);
        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for frame in frames {
            ticker.tick().await;
            self.display
                .update_line(ViewId::Message, &frame)
                .traced("game_over_anim")?;
        }
        Ok(())
    }
}

/// Successive windows of the game-over message, the last one leaving the
/// text in view.
pub fn scroll_frames(reason: Option<GameOver>) -> Vec<String> {
    let text = match reason {
        Some(reason) => format!("GAME OVER!!! {}", reason.label()),
        None => "GAME OVER!!!".to_string(),
    };
    let text_len = text.chars().count();
    let message: Vec<char> = " "
        .repeat(SCROLL_LEAD)
        .chars()
        .chain(text.chars())
        .chain(" ".repeat(SCROLL_WIDTH).chars())
        .collect();

    let centring = SCROLL_WIDTH.saturating_sub(text_len) / 2;
    let last = (SCROLL_LEAD + text_len + centring).saturating_sub(SCROLL_WIDTH);
    (0..=last)
        .map(|start| message[start..start + SCROLL_WIDTH].iter().collect())
        .collect()
}

/// Shows `result`'s error in the error view. A failure of the error view
/// itself is reported instead.
pub fn handle_routine_error(display: &dyn DisplaySink, result: GameResult<()>, title: &str) -> Report {
    let Err(err) = result else {
        return Ok(());
    };

    match views::update_error_view(&err, display, title) {
        Ok(()) => Err(err),
        Err(display_err) => {
            warn!(%err, %display_err, "could not show error view");
            Err(display_err)
        }
    }
}

/// Suspends input for as long as it lives
struct ResumeInput(Arc<AtomicBool>);

impl ResumeInput {
    fn arm(flag: Arc<AtomicBool>) -> Self {
        flag.store(false, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ResumeInput {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}
