use std::io::{self, Stdout};

use castle_maze_core::{CellType, DoorAnswer, InputProvider, Position, Renderer};
use ratatui::{
    Terminal,
    crossterm::event::{self, Event, KeyCode, KeyEventKind},
    prelude::CrosstermBackend,
};
use tracing::warn;

use crate::{
    board::Board,
    config::Palette,
    ui::{self, PromptView},
};

pub type TerminalBackend = CrosstermBackend<Stdout>;

/// The terminal front end: draws the board and asks door questions.
pub struct Screen {
    terminal: Terminal<TerminalBackend>,
    board: Board,
    palette: Palette,
    /// Terminal failure hit inside a callback that cannot return it.
    io_error: Option<io::Error>,
}

impl Screen {
    pub fn new(terminal: Terminal<TerminalBackend>, board: Board, palette: Palette) -> Self {
        Screen {
            terminal,
            board,
            palette,
            io_error: None,
        }
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<TerminalBackend> {
        &mut self.terminal
    }

    pub fn draw(&mut self) -> io::Result<()> {
        self.draw_with(None)
    }

    fn draw_with(&mut self, prompt: Option<PromptView>) -> io::Result<()> {
        let (board, palette) = (&self.board, &self.palette);
        self.terminal
            .draw(|frame| ui::render(frame, board, palette, prompt))?;
        Ok(())
    }

    /// Returns the terminal error swallowed during the last move, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }

    /// Returns `None` when the player dismisses the question.
    fn prompt_loop(&mut self, question: &str) -> io::Result<Option<String>> {
        let mut input = String::new();
        loop {
            self.draw_with(Some(PromptView {
                question,
                input: &input,
            }))?;
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => return Ok(Some(input)),
                    KeyCode::Esc => return Ok(None),
                    KeyCode::Backspace => {
                        input.pop();
                    }
                    KeyCode::Char(c) => input.push(c),
                    // Arrow keys do nothing while a question is open.
                    _ => {}
                }
            }
        }
    }
}

impl Renderer for Screen {
    fn on_cell_changed(&mut self, position: Position, cell: CellType) {
        self.board.on_cell_changed(position, cell);
    }

    fn on_announcement(&mut self, text: &str) {
        self.board.on_announcement(text);
    }

    fn on_inventory_appended(&mut self, label: &str, index: usize) {
        self.board.on_inventory_appended(label, index);
    }

    fn on_player_moved(&mut self, position: Position) {
        self.board.on_player_moved(position);
    }

    fn on_win(&mut self) {
        self.board.on_win();
    }
}

impl InputProvider for Screen {
    fn request_door_answer(&mut self, prompt: &str) -> DoorAnswer {
        match self.prompt_loop(prompt) {
            Ok(answer) => answer.into(),
            Err(err) => {
                warn!(error = %err, "terminal failed during door prompt");
                self.io_error = Some(err);
                DoorAnswer::Cancelled
            }
        }
    }
}
