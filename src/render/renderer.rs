use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::screen::{Screen, ViewBuffer, ViewId};
use crate::game::board::{CANDY, SNAKE_BODY, SNAKE_HEAD};

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, screen: &Screen) {
        let bounds = frame.area();

        for view in ViewId::DRAW_ORDER {
            let area = view.area(screen.board_size()).intersection(bounds);
            if area.is_empty() {
                continue;
            }

            let buffer = screen.view(view);
            let widget = match view {
                ViewId::Board => self.render_board(area, buffer),
                _ => self.render_text(area, view, buffer),
            };
            frame.render_widget(Clear, area);
            frame.render_widget(widget, area);
        }
    }

    fn block(&self, view: ViewId, alert: bool) -> Block<'static> {
        let mut block = Block::default().borders(Borders::ALL);
        if let Some(title) = view.title() {
            block = block.title(title);
        }
        match view {
            ViewId::Board => block
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White)),
            _ if alert => block.border_style(Style::default().fg(Color::Red)),
            _ => block,
        }
    }

    /// Last lines of the buffer that fit inside the borders
    fn visible_lines(area: Rect, buffer: &ViewBuffer) -> impl Iterator<Item = String> + '_ {
        let rows = usize::from(area.height.saturating_sub(2));
        buffer.lines().skip(buffer.line_count().saturating_sub(rows))
    }

    fn render_board(&self, area: Rect, buffer: &ViewBuffer) -> Paragraph<'static> {
        let lines: Vec<Line> = Self::visible_lines(area, buffer)
            .map(|row| {
                let spans: Vec<Span> = row
                    .chars()
                    .map(|glyph| match glyph {
                        SNAKE_HEAD => Span::styled(
                            glyph.to_string(),
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        SNAKE_BODY => {
                            Span::styled(glyph.to_string(), Style::default().fg(Color::Green))
                        }
                        CANDY => Span::styled(
                            glyph.to_string(),
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        _ => Span::raw(glyph.to_string()),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(self.block(ViewId::Board, false))
    }

    fn render_text(&self, area: Rect, view: ViewId, buffer: &ViewBuffer) -> Paragraph<'static> {
        let lines: Vec<Line> = Self::visible_lines(area, buffer).map(Line::from).collect();
        let style = if buffer.is_alert() {
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };

        Paragraph::new(lines)
            .style(style)
            .block(self.block(view, buffer.is_alert()))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Size, Sprite};
    use crate::render::sink::DisplayCommand;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn draw(screen: &Screen) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(64, 42)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, screen))
            .unwrap();
        terminal.backend().buffer().clone()
    }

    fn row(buffer: &Buffer, y: u16, from: u16, to: u16) -> String {
        (from..to).map(|x| buffer[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_board_glyphs_inside_border() {
        let mut screen = Screen::new(Size::square(10));
        screen.apply(DisplayCommand::Sprites(
            ViewId::Board,
            vec![
                Sprite::new(Position::new(0, 0), SNAKE_HEAD),
                Sprite::new(Position::new(2, 1), CANDY),
            ],
        ));

        let buffer = draw(&screen);

        assert_eq!(buffer[(1, 1)].symbol(), "■");
        assert_eq!(buffer[(1, 1)].fg, Color::Cyan);
        assert_eq!(buffer[(3, 2)].symbol(), "*");
        assert_eq!(buffer[(3, 2)].fg, Color::Red);
    }

    #[test]
    fn test_message_view_shows_latest_line() {
        let mut screen = Screen::new(Size::square(10));
        for line in ["first", "second", "third"] {
            screen.apply(DisplayCommand::Line(ViewId::Message, line.to_string()));
        }

        let buffer = draw(&screen);

        // one text row between the borders
        assert!(row(&buffer, 12, 44, 63).starts_with("third"));
    }

    #[test]
    fn test_alert_is_red() {
        let mut screen = Screen::new(Size::square(10));
        screen.apply(DisplayCommand::Alert(ViewId::Error, vec!["boom".to_string()]));

        let buffer = draw(&screen);

        assert!(row(&buffer, 15, 44, 63).starts_with("boom"));
        assert_eq!(buffer[(44, 15)].bg, Color::Red);
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let screen = Screen::new(Size::square(40));
        let mut terminal = Terminal::new(TestBackend::new(20, 10)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, &screen))
            .unwrap();
    }
}
