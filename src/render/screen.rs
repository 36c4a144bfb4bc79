//! In-memory model of the views, owned by the UI task.

use std::collections::HashMap;

use ratatui::layout::Rect;

use super::sink::DisplayCommand;
use crate::game::config::{MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH};
use crate::game::{Size, Sprite};

pub const LEFT_MOST: u16 = 0;
pub const RIGHT_PANEL: u16 = 43;
pub const MAX_X: u16 = 63;
pub const TOP_MOST: u16 = 0;
pub const TOP_MESSAGE_VIEW: u16 = 11;
pub const TOP_ERROR_VIEW: u16 = 14;
pub const TOP_HELP_VIEW: u16 = 27;
pub const MAX_Y: u16 = 41;

/// Appended lines a view keeps; older ones scroll out for good
pub const LINE_HISTORY: usize = 64;

/// Text columns inside the side panel views
pub const PANEL_TEXT_WIDTH: usize = (MAX_X - RIGHT_PANEL - 2) as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Frame,
    Panel,
    Score,
    Message,
    Error,
    Help,
    Board,
}

impl ViewId {
    /// Back to front
    pub const DRAW_ORDER: [ViewId; 7] = [
        ViewId::Frame,
        ViewId::Panel,
        ViewId::Score,
        ViewId::Message,
        ViewId::Error,
        ViewId::Help,
        ViewId::Board,
    ];

    /// Outer rectangle of the view, borders included
    pub fn area(&self, board: Size) -> Rect {
        let span = |from: u16, to: u16| to - from + 1;
        match self {
            ViewId::Frame => Rect::new(LEFT_MOST, TOP_MOST, span(LEFT_MOST, MAX_X), span(TOP_MOST, MAX_Y)),
            ViewId::Panel => Rect::new(RIGHT_PANEL, TOP_MOST, span(RIGHT_PANEL, MAX_X), span(TOP_MOST, MAX_Y)),
            ViewId::Score => Rect::new(
                RIGHT_PANEL,
                TOP_MOST,
                span(RIGHT_PANEL, MAX_X),
                span(TOP_MOST, TOP_MESSAGE_VIEW - 1),
            ),
            ViewId::Message => Rect::new(
                RIGHT_PANEL,
                TOP_MESSAGE_VIEW,
                span(RIGHT_PANEL, MAX_X),
                span(TOP_MESSAGE_VIEW, TOP_ERROR_VIEW - 1),
            ),
            ViewId::Error => Rect::new(
                RIGHT_PANEL,
                TOP_ERROR_VIEW,
                span(RIGHT_PANEL, MAX_X),
                span(TOP_ERROR_VIEW, TOP_HELP_VIEW - 1),
            ),
            ViewId::Help => Rect::new(RIGHT_PANEL, TOP_HELP_VIEW, span(RIGHT_PANEL, MAX_X), span(TOP_HELP_VIEW, MAX_Y)),
            ViewId::Board => {
                let width = board.width.clamp(0, MAX_BOARD_WIDTH) as u16;
                let height = board.height.clamp(0, MAX_BOARD_HEIGHT) as u16;
                Rect::new(LEFT_MOST, TOP_MOST, width + 2, height + 2)
            }
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            ViewId::Board => Some(" Snake "),
            ViewId::Score => Some(" Score "),
            ViewId::Help => Some(" Help "),
            _ => None,
        }
    }
}

/// Character content of one view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewBuffer {
    lines: Vec<Vec<char>>,
    alert: bool,
}

impl ViewBuffer {
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(|line| line.iter().collect())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_alert(&self) -> bool {
        self.alert
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.lines.get(y).and_then(|line| line.get(x)).copied()
    }

    fn put(&mut self, x: usize, y: usize, glyph: char) {
        if self.lines.len() <= y {
            self.lines.resize(y + 1, Vec::new());
        }
        let line = &mut self.lines[y];
        if line.len() <= x {
            line.resize(x + 1, ' ');
        }
        line[x] = glyph;
    }

    fn push_line(&mut self, line: &str) {
        self.lines.push(line.chars().collect());
        if self.lines.len() > LINE_HISTORY {
            let excess = self.lines.len() - LINE_HISTORY;
            self.lines.drain(..excess);
        }
    }

    fn replace(&mut self, layout: Vec<String>, alert: bool) {
        self.lines = layout.into_iter().map(|line| line.chars().collect()).collect();
        self.alert = alert;
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.alert = false;
    }
}

#[derive(Debug, Clone)]
pub struct Screen {
    board_size: Size,
    views: HashMap<ViewId, ViewBuffer>,
}

impl Screen {
    pub fn new(board_size: Size) -> Self {
        Self {
            board_size,
            views: ViewId::DRAW_ORDER
                .iter()
                .map(|view| (*view, ViewBuffer::default()))
                .collect(),
        }
    }

    pub fn board_size(&self) -> Size {
        self.board_size
    }

    pub fn view(&self, view: ViewId) -> &ViewBuffer {
        // every id is inserted by `new`
        &self.views[&view]
    }

    fn view_mut(&mut self, view: ViewId) -> &mut ViewBuffer {
        self.views.entry(view).or_default()
    }

    pub fn apply(&mut self, command: DisplayCommand) {
        match command {
            DisplayCommand::Sprites(view, sprites) => {
                let buffer = self.view_mut(view);
                for Sprite { position, glyph } in sprites {
                    if position.x >= 0 && position.y >= 0 {
                        buffer.put(position.x as usize, position.y as usize, glyph);
                    }
                }
            }
            DisplayCommand::Line(view, line) => {
                self.view_mut(view).push_line(&line);
            }
            DisplayCommand::Layout(view, layout) => self.view_mut(view).replace(layout, false),
            DisplayCommand::Alert(view, layout) => self.view_mut(view).replace(layout, true),
            DisplayCommand::Clear(view) => self.view_mut(view).clear(),
            DisplayCommand::ResizeBoard(size) => self.board_size = size,
        }
    }
}
