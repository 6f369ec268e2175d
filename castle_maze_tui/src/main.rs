use std::{
    fs::{self, File},
    io::{self, Stdout},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use castle_maze_core::{
    Direction, Position, Session,
    loader::{parse_doors, parse_grid, parse_items},
};
use clap::Parser;
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod board;
mod config;
mod gate;
mod screen;
mod ui;

use board::Board;
use config::{GameConfig, Palette, parse_position};
use gate::MoveGate;
use screen::Screen;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Escape the castle: collect items and answer the doors' questions.",
    long_about = None
)]
struct Args {
    /// Game configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", default_value = "maps/castle.toml")]
    config: PathBuf,

    /// Plan file, overriding the configuration
    #[arg(short, long, value_name = "PLAN_FILE")]
    map: Option<PathBuf>,

    /// Item dictionary, overriding the configuration
    #[arg(long, value_name = "ITEMS_FILE")]
    items: Option<PathBuf>,

    /// Door dictionary, overriding the configuration
    #[arg(long, value_name = "DOORS_FILE")]
    doors: Option<PathBuf>,

    /// Start position as ROW,COL, overriding the configuration
    #[arg(short, long, value_name = "ROW,COL", value_parser = parse_position)]
    start: Option<Position>,

    /// Write logs to this file
    #[arg(long, value_name = "LOG_FILE")]
    log_file: Option<PathBuf>,
}

struct App {
    /// The maze state engine.
    session: Session,
    /// Renderer and input provider.
    screen: Screen,
    /// Keeps directional input shut while a move is processed.
    gate: MoveGate,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn handle_move(&mut self, direction: Direction) -> Result<()> {
        let App {
            session,
            screen,
            gate,
            ..
        } = self;
        match gate.run(|| session.request_move(direction, &mut *screen)) {
            Some(outcome) => {
                outcome.context("Maze engine failed")?;
            }
            None => debug!(?direction, "move dropped while another is in progress"),
        }
        if let Some(err) = screen.take_error() {
            return Err(err).context("Terminal failed during door prompt");
        }
        Ok(())
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    let mut config = GameConfig::load(&args.config)?;
    apply_overrides(&mut config, &args);

    init_logging(&config)?;

    let session = load_session(&config)?;
    let palette = Palette::try_from(&config.colors)?;
    let board = Board::new(&session);

    // Set up the terminal
    let terminal = setup_terminal()?;
    let mut app = App {
        session,
        screen: Screen::new(terminal, board, palette),
        gate: MoveGate::new(),
        should_quit: false,
    };
    app.session.start(&mut app.screen);

    // Run the main application loop, restoring the terminal either way
    let result = run_app(&mut app);
    restore_terminal(app.screen.terminal_mut())?;
    info!(
        won = app.session.is_won(),
        items = app.session.inventory().len(),
        "game closed"
    );
    result
}

fn apply_overrides(config: &mut GameConfig, args: &Args) {
    if let Some(map) = &args.map {
        config.files.plan = map.clone();
    }
    if let Some(items) = &args.items {
        config.files.items = items.clone();
    }
    if let Some(doors) = &args.doors {
        config.files.doors = doors.clone();
    }
    if let Some(start) = args.start {
        config.start.row = start.row;
        config.start.col = start.col;
    }
    if let Some(log_file) = &args.log_file {
        config.logging.file = Some(log_file.clone());
    }
}

/// Logs go to a file only; the alternate screen owns stdout.
fn init_logging(config: &GameConfig) -> Result<()> {
    let Some(path) = &config.logging.file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let default_filter = config.logging.filter.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Loads the plan and both dictionaries and builds the session.
fn load_session(config: &GameConfig) -> Result<Session> {
    let files = &config.files;
    let grid = parse_grid(&read_source(&files.plan)?)
        .with_context(|| format!("Invalid plan {}", files.plan.display()))?;
    let items = parse_items(
        &read_source(&files.items)?,
        &files.items.display().to_string(),
    )?;
    let doors = parse_doors(
        &read_source(&files.doors)?,
        &files.doors.display().to_string(),
    )?;
    let session = Session::new(grid, items, doors, config.start.into())
        .context("Plan and dictionaries do not match")?;
    Ok(session.with_messages(config.messages.clone()))
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?; // Put terminal in raw mode
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into) // Map io::Error to anyhow::Error
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(app: &mut App) -> Result<()> {
    loop {
        app.screen.draw()?;

        // Moves only happen on key presses, so block until the next event
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                KeyCode::Up => app.handle_move(Direction::Up)?,
                KeyCode::Down => app.handle_move(Direction::Down)?,
                KeyCode::Left => app.handle_move(Direction::Left)?,
                KeyCode::Right => app.handle_move(Direction::Right)?,
                _ => {}
            }
        }

        // Exit loop if requested
        if app.should_quit {
            break;
        }
    }
    Ok(())
}
