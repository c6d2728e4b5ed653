use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::collections::HashSet;

use crate::game::{GameState, Position};

/// What a single board cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Head,
    Body,
    Food,
    Empty,
}

/// Cell lookup built once per frame from a committed state
///
/// The engine only exposes segments and food; mapping them onto a grid is
/// the renderer's business.
pub struct BoardView<'a> {
    state: &'a GameState,
    body: HashSet<Position>,
}

impl<'a> BoardView<'a> {
    pub fn new(state: &'a GameState) -> Self {
        Self {
            state,
            body: state.snake.segments().iter().copied().collect(),
        }
    }

    pub fn cell(&self, pos: Position) -> Cell {
        if pos == self.state.snake.head() {
            Cell::Head
        } else if self.body.contains(&pos) {
            Cell::Body
        } else if pos == self.state.food {
            Cell::Food
        } else {
            Cell::Empty
        }
    }

    /// Board rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        let size = self.state.board_size;
        (0..size).map(move |row| {
            (0..size)
                .map(|col| self.cell(Position::new(row as i32, col as i32)))
                .collect()
        })
    }
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Score
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Controls or restart hint
            ])
            .split(frame.area());

        frame.render_widget(self.render_score(state), chunks[0]);
        frame.render_widget(self.render_board(state), chunks[1]);
        frame.render_widget(self.render_footer(state), chunks[2]);
    }

    fn render_board(&self, state: &GameState) -> Paragraph<'static> {
        let view = BoardView::new(state);
        let lines: Vec<Line> = view
            .rows()
            .map(|row| Line::from(row.into_iter().map(cell_span).collect::<Vec<_>>()))
            .collect();

        let (title, border_color) = if state.is_game_over() {
            (" Game Over ", Color::Red)
        } else {
            (" Snake ", Color::White)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_score(&self, state: &GameState) -> Paragraph<'static> {
        let text = Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_footer(&self, state: &GameState) -> Paragraph<'static> {
        let text = if state.is_game_over() {
            Line::from(vec![
                Span::raw("Press "),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" to restart or "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        } else {
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ])
        };

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_span(cell: Cell) -> Span<'static> {
    match cell {
        Cell::Head => Span::styled(
            "■ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
        Cell::Food => Span::styled(
            "O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Cell::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
    }
}
