use castle_maze_core::Position;
use ratatui::{prelude::*, widgets::*};

use crate::{board::Board, config::Palette};

/// An open door question and what the player has typed so far.
#[derive(Debug, Clone, Copy)]
pub struct PromptView<'a> {
    pub question: &'a str,
    pub input: &'a str,
}

/// Renders the user interface.
pub fn render(frame: &mut Frame, board: &Board, palette: &Palette, prompt: Option<PromptView>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Announcement banner
            Constraint::Min(0),    // Plan and inventory
            Constraint::Length(1), // Help line
        ])
        .split(frame.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(main_layout[1]);

    let banner = Paragraph::new(board.banner.as_str())
        .alignment(Alignment::Center)
        .style(Style::default().bold())
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(banner, main_layout[0]);

    render_plan(frame, body[0], board, palette);
    render_inventory(frame, body[1], board);

    let help = if prompt.is_some() {
        "Type your answer, Enter to confirm, Esc to give up."
    } else if board.won {
        "You escaped the castle. Press 'q' or 'Esc' to quit."
    } else {
        "Arrow keys to move, 'q' or 'Esc' to quit."
    };
    frame.render_widget(
        Paragraph::new(help).alignment(Alignment::Center),
        main_layout[2],
    );

    if let Some(prompt) = prompt {
        render_prompt(frame, prompt);
    }
}

/// Renders the castle plan, two terminal columns per cell.
fn render_plan(frame: &mut Frame, area: Rect, board: &Board, palette: &Palette) {
    let cells = &board.cells;
    let lines: Vec<Line> = (0..cells.rows())
        .filter_map(|row| cells.row(row).map(|slice| (row, slice)))
        .map(|(row, slice)| {
            let spans: Vec<Span> = slice
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let background = Style::default().bg(palette.color(*cell));
                    if Position::new(row, col) == board.player {
                        Span::styled("()", background.fg(palette.player).bold())
                    } else {
                        Span::styled("  ", background)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let plan = Paragraph::new(lines)
        .block(Block::default().title("Castle").borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(plan, area);
}

fn render_inventory(frame: &mut Frame, area: Rect, board: &Board) {
    let items: Vec<ListItem> = board.inventory_lines().map(ListItem::new).collect();
    let inventory =
        List::new(items).block(Block::default().borders(Borders::ALL).title("Inventory"));
    frame.render_widget(inventory, area);
}

fn render_prompt(frame: &mut Frame, prompt: PromptView) {
    let area = centered_rect(60, 7, frame.area());
    let text = vec![
        Line::from(prompt.question),
        Line::default(),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(prompt.input, Style::default().bold()),
            Span::styled("_", Style::default().slow_blink()),
        ]),
    ];
    let dialog = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Question").borders(Borders::ALL));
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

/// A rectangle `percent_x` wide and `height` rows tall in the middle of `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use castle_maze_core::{DoorRegistry, ItemRegistry, Session, loader::parse_grid};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::config::ColorNames;

    fn board() -> Board {
        let session = Session::new(
            parse_grid("0 1\n0 2").unwrap(),
            ItemRegistry::new(),
            DoorRegistry::new(),
            Position::new(0, 0),
        )
        .unwrap();
        let mut board = Board::new(&session);
        board.banner = "Hello castle".to_string();
        board.inventory.push("Key".to_string());
        board
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn draws_banner_plan_and_inventory() {
        let palette = Palette::try_from(&ColorNames::default()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        let board = board();

        terminal
            .draw(|f| render(f, &board, &palette, None))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Hello castle"));
        assert!(text.contains("()"));
        assert!(text.contains("No.1: Key"));
    }

    #[test]
    fn prompt_overlays_the_question() {
        let palette = Palette::try_from(&ColorNames::default()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        let board = board();
        let prompt = PromptView {
            question: "2+2?",
            input: "4",
        };

        terminal
            .draw(|f| render(f, &board, &palette, Some(prompt)))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Question"));
        assert!(text.contains("2+2?"));
        assert!(text.contains("> 4_"));
    }
}
