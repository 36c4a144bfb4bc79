//! Content of the side panel views and the board view set-up.

use super::screen::{ViewId, PANEL_TEXT_WIDTH};
use super::sink::DisplaySink;
use crate::error::{GameError, GameResult, ResultExt};
use crate::game::{GameState, Size};

pub const ENGINE_TITLE: &str = "   Game Engine";
pub const ANIMATION_TITLE: &str = "  Game Over Anim";
pub const START_TITLE: &str = "   Start Game";

/// Lines of error text shown in the error view
pub const ERROR_LINES: usize = 4;

const HELP_LAYOUT: [&str; 13] = [
    "  The Snake Game",
    "GRAB the * CANDIES",
    "",
    "select board size",
    "   with ENTER",
    "",
    " SPACEBAR to start",
    "",
    "Keys:  BOTTOM, UP",
    "      LEFT, RIGHT",
    "",
    "",
    "  Ctrl+C to Quit",
];

/// Lays out every view for a board of `board_size`.
pub fn create_views(game: &GameState, display: &dyn DisplaySink, board_size: Size) -> GameResult<()> {
    display.clear_view(ViewId::Frame).traced("create_views")?;
    display.clear_view(ViewId::Panel).traced("create_views")?;
    display.clear_view(ViewId::Error).traced("create_views")?;
    create_help_view(display).traced("create_views")?;
    create_score_view(game, display).traced("create_views")?;
    display.clear_view(ViewId::Message).traced("create_views")?;
    create_board_view(display, board_size).traced("create_views")
}

pub fn create_board_view(display: &dyn DisplaySink, board_size: Size) -> GameResult<()> {
    display.resize_board(board_size).traced("create_board_view")
}

pub fn clear_view(display: &dyn DisplaySink, view: ViewId) -> GameResult<()> {
    display.clear_view(view).traced("clear_view")
}

pub fn create_help_view(display: &dyn DisplaySink) -> GameResult<()> {
    let layout = HELP_LAYOUT.iter().map(|line| line.to_string()).collect();
    display
        .set_layout(ViewId::Help, layout)
        .traced("create_help_view")
}

pub fn score_layout(game: &GameState) -> GameResult<Vec<String>> {
    // no snake yet: show defaults
    let (size, position) = match (game.snake_size(), game.snake_position()) {
        (Ok(size), Ok(position)) => (size.to_string(), position.to_string()),
        (Err(err), _) | (_, Err(err)) if matches!(err.root(), GameError::NoSnake) => {
            ("0".to_string(), String::new())
        }
        (Err(err), _) | (_, Err(err)) => return Err(err.traced("score_layout")),
    };

    Ok(vec![
        format!(" GAME BOARD {}", game.board_size()),
        String::new(),
        format!("ROUND: {}", game.round()),
        String::new(),
        format!("CANDIES: {}", game.score()),
        format!("SNAKE SIZE:{size}"),
        format!("POSITION:{position}"),
        String::new(),
        format!("TOP SCORE: {}", game.high_score()),
    ])
}

pub fn create_score_view(game: &GameState, display: &dyn DisplaySink) -> GameResult<()> {
    let layout = score_layout(game).traced("create_score_view")?;
    display
        .set_layout(ViewId::Score, layout)
        .traced("create_score_view")
}

/// Shows `err` in red under `title`, wrapped to the panel width.
pub fn update_error_view(err: &GameError, display: &dyn DisplaySink, title: &str) -> GameResult<()> {
    let mut layout = vec![
        String::new(),
        String::new(),
        "   Program Error".to_string(),
        String::new(),
        title.to_string(),
        "     crashed".to_string(),
        String::new(),
    ];
    layout.extend(
        chunks(&err.to_string(), PANEL_TEXT_WIDTH, ERROR_LINES)
            .into_iter()
            .take(ERROR_LINES),
    );

    display
        .display_red_layout(ViewId::Error, layout)
        .traced("update_error_view")
}

/// Splits `text` into `chunk_len`-character pieces, padding with empty
/// strings up to `count`. Never truncates; a zero `chunk_len` keeps the text whole.
pub fn chunks(text: &str, chunk_len: usize, count: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut pieces: Vec<String> = if chunk_len == 0 || chars.len() <= chunk_len {
        vec![text.to_string()]
    } else {
        chars
            .chunks(chunk_len)
            .map(|piece| piece.iter().collect())
            .collect()
    };

    if pieces.len() < count {
        pieces.resize(count, String::new());
    }
    pieces
}
