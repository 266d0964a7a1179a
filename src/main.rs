//! Roster - Student Management System
//!
//! A terminal form over a local SQLite table of students. Records can be
//! added, listed, updated and deleted, and exported to CSV.

use std::io;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

mod domain;
mod application;
mod infrastructure;
mod presentation;

use application::{App, AppMode};
use infrastructure::{Config, StudentRepository, DEFAULT_CONFIG_FILE};
use presentation::{render_ui, InputHandler};

/// Entry point for the student management application.
///
/// Loads configuration, starts logging, makes sure the student table
/// exists, then runs the terminal form until the user quits.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the database cannot be
/// initialized, or terminal setup fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(DEFAULT_CONFIG_FILE)?;
    config.logging.init()?;

    let repo = StudentRepository::from_config(&config.database);
    repo.initialize()?;
    info!("Starting Student Management System...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::default();
    app.status_message = Some(format!(
        "Starting Student Management System... (database: {})",
        repo.path().display()
    ));
    let res = run_app(&mut terminal, &mut app, &repo);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(%err, "terminal loop failed");
        println!("{err:?}");
    }

    info!("Student Management System stopped");
    Ok(())
}

/// Main application event loop.
///
/// Draws the form and dispatches key presses. Esc in the form, or Ctrl+Q
/// outside a dialog, ends the loop.
///
/// # Errors
///
/// Returns an IO error if terminal operations fail.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, repo: &StudentRepository) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                let quit_chord = key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'));
                match key.code {
                    KeyCode::Esc if app.mode == AppMode::Form => return Ok(()),
                    _ if quit_chord && app.mode != AppMode::Dialog => return Ok(()),
                    _ => InputHandler::handle_key_event(app, repo, key.code, key.modifiers),
                }
            }
        }
    }
}
