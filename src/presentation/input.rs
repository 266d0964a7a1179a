use crate::application::{App, AppMode, Focus};
use crate::domain::{CsvExporter, Trigger};
use crate::infrastructure::StudentRepository;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::debug;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, repo: &StudentRepository, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Form => Self::handle_form_mode(app, repo, key, modifiers),
            AppMode::Dialog => Self::handle_dialog_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::ExportCsv => Self::handle_filename_input_mode(app, repo, key),
        }
    }

    /// Runs `trigger` against the repository and hands the result to the app.
    ///
    /// Form validation happens first; a missing or malformed field
    /// short-circuits before any database access.
    pub fn fire(app: &mut App, repo: &StudentRepository, trigger: Trigger) {
        debug!(trigger = trigger.label(), "trigger fired");
        match trigger {
            Trigger::Add => {
                let result = app.form.student().and_then(|student| repo.create(&student));
                app.set_add_result(result);
            }
            Trigger::View => {
                let result = repo.list_all();
                app.set_view_result(result);
            }
            Trigger::Update => {
                let result = app.form.student().and_then(|student| repo.update(&student));
                app.set_update_result(result);
            }
            Trigger::Delete => {
                let result = app.form.student_id().and_then(|id| repo.delete(id));
                app.set_delete_result(result);
            }
        }
    }

    fn handle_form_mode(app: &mut App, repo: &StudentRepository, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('a') => Self::fire(app, repo, Trigger::Add),
                KeyCode::Char('v') => Self::fire(app, repo, Trigger::View),
                KeyCode::Char('u') => Self::fire(app, repo, Trigger::Update),
                KeyCode::Char('d') => Self::fire(app, repo, Trigger::Delete),
                KeyCode::Char('e') => app.start_csv_export(),
                KeyCode::Char('l') => app.clear_form(),
                _ => {}
            }
            return;
        }

        app.status_message = None;

        match key {
            KeyCode::Tab | KeyCode::Down => app.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
            KeyCode::Enter => match app.focus {
                Focus::Button(trigger) => Self::fire(app, repo, trigger),
                Focus::Field(_) => app.focus_next(),
            },
            KeyCode::Char(' ') if matches!(app.focus, Focus::Button(_)) => {
                if let Focus::Button(trigger) = app.focus {
                    Self::fire(app, repo, trigger);
                }
            }
            KeyCode::Char(c) => app.insert_char(c),
            KeyCode::Backspace => app.delete_before_cursor(),
            KeyCode::Delete => app.delete_at_cursor(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            KeyCode::Home => app.move_cursor_home(),
            KeyCode::End => app.move_cursor_end(),
            KeyCode::PageUp => app.scroll_output_up(5),
            KeyCode::PageDown => app.scroll_output_down(5),
            KeyCode::F(1) => app.open_help(),
            _ => {}
        }
    }

    fn handle_dialog_mode(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_dialog();
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_help();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, repo: &StudentRepository, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let filename = app.get_csv_export_filename();
                let result = repo
                    .list_all()
                    .and_then(|students| CsvExporter::export_students(&students, &filename));
                app.set_csv_export_result(result);
            }
            KeyCode::Esc => {
                app.cancel_filename_input();
            }
            KeyCode::Backspace => {
                app.delete_filename_char();
            }
            KeyCode::Left => {
                app.move_cursor_left();
            }
            KeyCode::Right => {
                app.move_cursor_right();
            }
            KeyCode::Home => {
                app.move_cursor_home();
            }
            KeyCode::End => {
                app.move_cursor_end();
            }
            KeyCode::Char(c) => {
                app.insert_filename_char(c);
            }
            _ => {}
        }
    }
}
