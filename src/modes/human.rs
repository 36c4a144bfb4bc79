use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::{Stream, StreamExt};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend};
use std::io::{self, Stderr, stderr};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use super::controller::InputContext;
use super::scheduler::Report;
use crate::error::GameError;
use crate::game::{GameConfig, GameState};
use crate::guard;
use crate::input::InputHandler;
use crate::render::{DisplayCommand, QueuedDisplay, Renderer, Screen, SharedDisplay};

/// Redraw period of the terminal
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    config: GameConfig,
    renderer: Renderer,
    input_handler: InputHandler,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
        }
    }

    /// Plays until the user quits. Returns the error to report on exit, if
    /// any, once the terminal has been restored.
    pub async fn run(&mut self) -> Result<Option<GameError>> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_session(&mut terminal, EventStream::new()).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    /// Bootstraps the game and runs the event loop over `events`.
    pub async fn run_session<B, S>(&mut self, terminal: &mut Terminal<B>, events: S) -> Result<Option<GameError>>
    where
        B: Backend,
        S: Stream<Item = io::Result<Event>> + Unpin,
    {
        let game = self.new_game().context("Failed to create the game")?;
        let (display, commands) = QueuedDisplay::channel();
        let display: SharedDisplay = Arc::new(display);
        let (reports_tx, reports) = mpsc::channel(1);
        let mut context = InputContext::new(
            Arc::new(Mutex::new(game)),
            display,
            self.config.clone(),
            reports_tx,
        );

        let mut residual = None;
        let stop = match guard::catch("bootstrap", || context.bootstrap()) {
            Ok(()) => {
                let mut screen = Screen::new(context.board_size());
                let session = Session {
                    context: &mut context,
                    screen: &mut screen,
                    commands,
                    reports,
                    residual: &mut residual,
                };
                self.event_loop(terminal, events, session).await
            }
            Err(err) => err,
        };

        info!(%stop, "event loop stopped");
        // errors from the background tasks are reported first
        Ok(residual.or(Some(stop)))
    }

    fn new_game(&self) -> Result<GameState> {
        self.config.validate()?;
        let size = self.config.board_size();
        let game = match self.config.seed {
            Some(seed) => GameState::with_seed(size, seed)?,
            None => GameState::new(size)?,
        };
        Ok(game)
    }

    /// Returns what stopped the loop, `Quit` on a normal exit.
    async fn event_loop<B, S>(&self, terminal: &mut Terminal<B>, mut events: S, session: Session<'_>) -> GameError
    where
        B: Backend,
        S: Stream<Item = io::Result<Event>> + Unpin,
    {
        let Session {
            context,
            screen,
            mut commands,
            mut reports,
            residual,
        } = session;

        let mut render_timer = interval(RENDER_INTERVAL);
        render_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        let action = self.input_handler.handle_key_event(key);
                        if let Err(err) = guard::catch("handle_key_press", || context.handle_key_press(action)) {
                            return err;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return GameError::Io(err).traced("event_loop"),
                    None => {
                        warn!("terminal event stream ended");
                        return GameError::Quit.traced("event_loop");
                    }
                },

                // Queued display updates, in submission order
                Some(command) = commands.recv() => {
                    screen.apply(command);
                }

                // Outcome of the last round
                Some(report) = reports.recv() => {
                    *residual = report.err();
                }

                // Render frame
                _ = render_timer.tick() => {
                    let drawn = terminal.draw(|frame| self.renderer.render(frame, screen));
                    if let Err(err) = drawn {
                        return GameError::Io(err).traced("event_loop");
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    return GameError::Quit.traced("event_loop");
                }
            }
        }
    }

    fn cleanup_terminal(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// State the event loop drives, borrowed from `run_session`
struct Session<'a> {
    context: &'a mut InputContext,
    screen: &'a mut Screen,
    commands: mpsc::UnboundedReceiver<DisplayCommand>,
    reports: mpsc::Receiver<Report>,
    residual: &'a mut Option<GameError>,
}

/// Text to print once the terminal is restored. A quit is not reported.
pub fn exit_report(err: Option<&GameError>) -> Option<String> {
    let err = err?;
    if err.is_quit() {
        return None;
    }
    if err.is_runtime_fault() {
        return Some(format!("Panic occurred\n{err}"));
    }
    Some(err.to_string())
}
