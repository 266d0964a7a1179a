//! Application state management for the student form.
//!
//! This module holds the form contents, focus, modal dialogs and output area,
//! and turns repository results into what the user sees.

use crate::domain::{Age, FormField, RosterError, RosterResult, Student, StudentTable, Trigger};
use tracing::warn;

/// Represents the current mode of the application.
///
/// The mode decides how key presses are interpreted and which overlays
/// are drawn on top of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Form navigation and text entry
    Form,
    /// A modal success or error dialog is open
    Dialog,
    /// Help screen is displayed
    Help,
    /// CSV export filename prompt is open
    ExportCsv,
}

/// The form element that currently receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FormField),
    Button(Trigger),
}

/// Tab order: the four inputs top to bottom, then the four buttons.
pub const FOCUS_ORDER: [Focus; 8] = [
    Focus::Field(FormField::Id),
    Focus::Field(FormField::Name),
    Focus::Field(FormField::Age),
    Focus::Field(FormField::Grade),
    Focus::Button(Trigger::Add),
    Focus::Button(Trigger::View),
    Focus::Button(Trigger::Update),
    Focus::Button(Trigger::Delete),
];

/// Raw text of the four form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub id: String,
    pub name: String,
    pub age: String,
    pub grade: String,
}

impl StudentForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Id => &self.id,
            FormField::Name => &self.name,
            FormField::Age => &self.age,
            FormField::Grade => &self.grade,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Id => &mut self.id,
            FormField::Name => &mut self.name,
            FormField::Age => &mut self.age,
            FormField::Grade => &mut self.grade,
        }
    }

    /// Builds a [`Student`] from all four inputs.
    ///
    /// Emptiness is checked first, on the raw text, so a blank form never
    /// reaches number parsing. Id and age must then parse as integers.
    pub fn student(&self) -> RosterResult<Student> {
        if FormField::ALL.iter().any(|&f| self.value(f).is_empty()) {
            return Err(RosterError::MissingField("All fields are required."));
        }
        Ok(Student {
            id: Self::parse_number(FormField::Id, &self.id)?,
            name: self.name.clone(),
            age: Age::Years(Self::parse_number(FormField::Age, &self.age)?),
            grade: self.grade.clone(),
        })
    }

    /// Parses the id input alone, which is all a delete needs.
    pub fn student_id(&self) -> RosterResult<i64> {
        if self.id.is_empty() {
            return Err(RosterError::MissingField("ID is required."));
        }
        Self::parse_number(FormField::Id, &self.id)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn parse_number(field: FormField, raw: &str) -> RosterResult<i64> {
        raw.trim().parse::<i64>().map_err(|_| RosterError::InvalidNumber {
            field: field.label(),
            value: raw.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// A modal message shown after a trigger completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: &'static str,
    pub message: String,
}

impl Dialog {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: "Success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: "Error",
            message: message.into(),
        }
    }
}

/// Main application state containing the form and UI state.
///
/// # Examples
///
/// ```
/// use roster::application::{App, AppMode};
///
/// let app = App::default();
/// assert_eq!(app.mode, AppMode::Form);
/// assert!(app.output.is_empty());
/// ```
#[derive(Debug)]
pub struct App {
    /// Text typed into the four inputs
    pub form: StudentForm,
    /// Element receiving key presses
    pub focus: Focus,
    /// Current application mode
    pub mode: AppMode,
    /// Cursor position within the focused input, in characters
    pub cursor_position: usize,
    /// Read-only output area, replaced by each View
    pub output: String,
    /// First visible line of the output area
    pub output_scroll: u16,
    /// Open modal dialog, if any
    pub dialog: Option<Dialog>,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Formatter for the View output
    pub table: StudentTable,
}

impl Default for App {
    fn default() -> Self {
        Self {
            form: StudentForm::default(),
            focus: FOCUS_ORDER[0],
            mode: AppMode::Form,
            cursor_position: 0,
            output: String::new(),
            output_scroll: 0,
            dialog: None,
            status_message: None,
            help_scroll: 0,
            filename_input: String::new(),
            table: StudentTable::new(),
        }
    }
}

impl App {
    pub fn focused_field(&self) -> Option<FormField> {
        match self.focus {
            Focus::Field(field) => Some(field),
            Focus::Button(_) => None,
        }
    }

    pub fn focus_next(&mut self) {
        let index = self.focus_index();
        self.set_focus(FOCUS_ORDER[(index + 1) % FOCUS_ORDER.len()]);
    }

    pub fn focus_previous(&mut self) {
        let index = self.focus_index();
        self.set_focus(FOCUS_ORDER[(index + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len()]);
    }

    /// Moves focus and places the cursor at the end of the new input.
    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.cursor_position = self
            .focused_field()
            .map(|field| self.form.value(field).chars().count())
            .unwrap_or(0);
    }

    fn focus_index(&self) -> usize {
        FOCUS_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0)
    }

    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else { return };
        let cursor = self.cursor_position;
        let value = self.form.value_mut(field);
        let at = byte_index(value, cursor);
        value.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        let Some(field) = self.focused_field() else { return };
        if self.cursor_position == 0 {
            return;
        }
        let cursor = self.cursor_position;
        let value = self.form.value_mut(field);
        let at = byte_index(value, cursor - 1);
        value.remove(at);
        self.cursor_position -= 1;
    }

    pub fn delete_at_cursor(&mut self) {
        let Some(field) = self.focused_field() else { return };
        let cursor = self.cursor_position;
        let value = self.form.value_mut(field);
        if cursor < value.chars().count() {
            let at = byte_index(value, cursor);
            value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.current_input_len() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.current_input_len();
    }

    fn current_input_len(&self) -> usize {
        match self.mode {
            AppMode::ExportCsv => self.filename_input.chars().count(),
            _ => self
                .focused_field()
                .map(|field| self.form.value(field).chars().count())
                .unwrap_or(0),
        }
    }

    /// Empties all four inputs and returns focus to the id field.
    pub fn clear_form(&mut self) {
        self.form.clear();
        self.set_focus(FOCUS_ORDER[0]);
        self.status_message = Some("Form cleared".to_string());
    }

    pub fn show_dialog(&mut self, dialog: Dialog) {
        self.dialog = Some(dialog);
        self.mode = AppMode::Dialog;
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
        self.mode = AppMode::Form;
    }

    fn report(&mut self, trigger: Trigger, result: RosterResult<String>) {
        match result {
            Ok(message) => self.show_dialog(Dialog::info(message)),
            Err(error) => {
                warn!(trigger = trigger.label(), %error, "trigger failed");
                self.show_dialog(Dialog::error(error.to_string()));
            }
        }
    }

    /// Processes the result of an Add trigger.
    pub fn set_add_result(&mut self, result: RosterResult<()>) {
        self.report(Trigger::Add, result.map(|_| "Student added successfully!".to_string()));
    }

    /// Processes the result of an Update trigger.
    ///
    /// Success is reported whether or not a row matched the id.
    pub fn set_update_result(&mut self, result: RosterResult<usize>) {
        self.report(Trigger::Update, result.map(|_| "Student updated successfully!".to_string()));
    }

    /// Processes the result of a Delete trigger.
    ///
    /// Success is reported whether or not a row was removed.
    pub fn set_delete_result(&mut self, result: RosterResult<usize>) {
        self.report(Trigger::Delete, result.map(|_| "Student deleted successfully!".to_string()));
    }

    /// Processes the result of a View trigger.
    ///
    /// On success the output area is replaced with the rendered table,
    /// never appended to. Failures open an error dialog and leave the
    /// previous output in place.
    pub fn set_view_result(&mut self, result: RosterResult<Vec<Student>>) {
        match result {
            Ok(students) => {
                self.output = self.table.render(&students);
                self.output_scroll = 0;
                self.status_message = Some(format!("{} student(s)", students.len()));
            }
            Err(error) => {
                warn!(trigger = Trigger::View.label(), %error, "trigger failed");
                self.show_dialog(Dialog::error(error.to_string()));
            }
        }
    }

    pub fn scroll_output_up(&mut self, lines: u16) {
        self.output_scroll = self.output_scroll.saturating_sub(lines);
    }

    pub fn scroll_output_down(&mut self, lines: u16) {
        let last_line = self.output.lines().count().saturating_sub(1);
        let max = u16::try_from(last_line).unwrap_or(u16::MAX);
        self.output_scroll = self.output_scroll.saturating_add(lines).min(max);
    }

    pub fn open_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Form;
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.filename_input = "students.csv".to_string();
        self.cursor_position = self.filename_input.chars().count();
        self.status_message = None;
    }

    /// Gets the filename for CSV export, with .csv extension added if needed.
    pub fn get_csv_export_filename(&self) -> String {
        let name = self.filename_input.trim();
        let name = if name.is_empty() { "students.csv" } else { name };
        if name.ends_with(".csv") {
            name.to_string()
        } else {
            format!("{}.csv", name)
        }
    }

    pub fn insert_filename_char(&mut self, c: char) {
        let at = byte_index(&self.filename_input, self.cursor_position);
        self.filename_input.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn delete_filename_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let at = byte_index(&self.filename_input, self.cursor_position - 1);
        self.filename_input.remove(at);
        self.cursor_position -= 1;
    }

    /// Cancels filename input and returns to the form.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Form;
        self.filename_input.clear();
        self.set_focus(self.focus);
    }

    /// Processes the result of a CSV export.
    pub fn set_csv_export_result(&mut self, result: RosterResult<String>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                warn!(%error, "csv export failed");
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }
        self.cancel_filename_input();
    }
}

fn byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> StudentForm {
        StudentForm {
            id: "1".into(),
            name: "Amy".into(),
            age: "20".into(),
            grade: "A".into(),
        }
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.focus, Focus::Field(FormField::Id));
        assert_eq!(app.cursor_position, 0);
        assert!(app.output.is_empty());
        assert!(app.dialog.is_none());
        assert!(app.status_message.is_none());
        assert_eq!(app.form, StudentForm::default());
    }

    #[test]
    fn test_form_student_parses_all_fields() {
        assert_eq!(filled_form().student().unwrap(), Student::new(1, "Amy", 20, "A"));
    }

    #[test]
    fn test_form_student_requires_every_field() {
        for field in FormField::ALL {
            let mut form = filled_form();
            form.value_mut(field).clear();
            assert!(matches!(
                form.student(),
                Err(RosterError::MissingField("All fields are required."))
            ));
        }
    }

    #[test]
    fn test_form_student_rejects_non_numeric_age() {
        let mut form = filled_form();
        form.age = "twenty".into();
        match form.student() {
            Err(RosterError::InvalidNumber { field, value }) => {
                assert_eq!(field, "Age");
                assert_eq!(value, "twenty");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_form_numbers_tolerate_surrounding_spaces() {
        let mut form = filled_form();
        form.id = " 7 ".into();
        assert_eq!(form.student().unwrap().id, 7);
    }

    #[test]
    fn test_form_student_id_only_needs_id() {
        let form = StudentForm { id: "4".into(), ..StudentForm::default() };
        assert_eq!(form.student_id().unwrap(), 4);
        assert!(matches!(
            StudentForm::default().student_id(),
            Err(RosterError::MissingField("ID is required."))
        ));
    }

    #[test]
    fn test_focus_cycles_through_fields_and_buttons() {
        let mut app = App::default();
        for expected in FOCUS_ORDER.iter().skip(1) {
            app.focus_next();
            assert_eq!(app.focus, *expected);
        }
        app.focus_next();
        assert_eq!(app.focus, Focus::Field(FormField::Id));

        app.focus_previous();
        assert_eq!(app.focus, Focus::Button(Trigger::Delete));
    }

    #[test]
    fn test_focus_moves_cursor_to_end_of_input() {
        let mut app = App::default();
        app.form.name = "Amy".into();
        app.focus_next();
        assert_eq!(app.cursor_position, 3);
        app.set_focus(Focus::Button(Trigger::Add));
        assert_eq!(app.cursor_position, 0);
    }

    #[test]
    fn test_editing_handles_multibyte_characters() {
        let mut app = App::default();
        app.set_focus(Focus::Field(FormField::Name));
        for c in "Zoe".chars() {
            app.insert_char(c);
        }
        app.delete_before_cursor();
        app.insert_char('ë');
        assert_eq!(app.form.name, "Zoë");

        app.move_cursor_left();
        app.insert_char('x');
        assert_eq!(app.form.name, "Zoxë");

        app.delete_at_cursor();
        assert_eq!(app.form.name, "Zox");
        app.move_cursor_home();
        app.delete_before_cursor();
        assert_eq!(app.form.name, "Zox");
        app.move_cursor_end();
        assert_eq!(app.cursor_position, 3);
    }

    #[test]
    fn test_typing_on_button_is_ignored() {
        let mut app = App::default();
        app.set_focus(Focus::Button(Trigger::View));
        app.insert_char('x');
        app.delete_before_cursor();
        assert_eq!(app.form, StudentForm::default());
    }

    #[test]
    fn test_set_add_result_success_and_duplicate() {
        let mut app = App::default();
        app.set_add_result(Ok(()));
        assert_eq!(app.mode, AppMode::Dialog);
        assert_eq!(app.dialog, Some(Dialog::info("Student added successfully!")));

        app.dismiss_dialog();
        app.set_add_result(Err(RosterError::DuplicateKey(1)));
        let dialog = app.dialog.clone().unwrap();
        assert_eq!(dialog.kind, DialogKind::Error);
        assert_eq!(dialog.message, "A student with this ID already exists.");
    }

    #[test]
    fn test_update_and_delete_report_success_even_without_match() {
        let mut app = App::default();
        app.set_update_result(Ok(0));
        assert_eq!(app.dialog.as_ref().unwrap().message, "Student updated successfully!");

        app.dismiss_dialog();
        app.set_delete_result(Ok(0));
        assert_eq!(app.dialog.as_ref().unwrap().message, "Student deleted successfully!");
    }

    #[test]
    fn test_storage_busy_becomes_error_dialog() {
        let mut app = App::default();
        app.set_update_result(Err(RosterError::StorageBusy));
        assert_eq!(app.mode, AppMode::Dialog);
        assert_eq!(app.dialog.as_ref().unwrap().kind, DialogKind::Error);
    }

    #[test]
    fn test_view_replaces_output() {
        let mut app = App::default();
        app.output = "stale".into();
        app.output_scroll = 4;

        app.set_view_result(Ok(vec![Student::new(1, "Amy", 20, "A")]));

        assert!(!app.output.contains("stale"));
        assert!(app.output.contains("Amy"));
        assert_eq!(app.output_scroll, 0);
        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.status_message.as_deref(), Some("1 student(s)"));
    }

    #[test]
    fn test_view_failure_keeps_output() {
        let mut app = App::default();
        app.output = "previous".into();
        app.set_view_result(Err(RosterError::StorageBusy));
        assert_eq!(app.output, "previous");
        assert_eq!(app.mode, AppMode::Dialog);
    }

    #[test]
    fn test_output_scroll_is_clamped() {
        let mut app = App::default();
        app.output = "a\nb\nc".into();
        app.scroll_output_down(10);
        assert_eq!(app.output_scroll, 2);
        app.scroll_output_up(5);
        assert_eq!(app.output_scroll, 0);
    }

    #[test]
    fn test_output_scroll_saturates_on_huge_output() {
        let mut app = App::default();
        app.output = "row\n".repeat(70_000);
        app.scroll_output_down(u16::MAX);
        app.scroll_output_down(10);
        assert_eq!(app.output_scroll, u16::MAX);
    }

    #[test]
    fn test_clear_form() {
        let mut app = App::default();
        app.form = filled_form();
        app.set_focus(Focus::Field(FormField::Grade));
        app.clear_form();
        assert_eq!(app.form, StudentForm::default());
        assert_eq!(app.focus, Focus::Field(FormField::Id));
    }

    #[test]
    fn test_csv_export_filename() {
        let mut app = App::default();
        app.start_csv_export();
        assert_eq!(app.mode, AppMode::ExportCsv);
        assert_eq!(app.get_csv_export_filename(), "students.csv");

        app.filename_input = "roster".into();
        assert_eq!(app.get_csv_export_filename(), "roster.csv");
        app.filename_input = "   ".into();
        assert_eq!(app.get_csv_export_filename(), "students.csv");
    }

    #[test]
    fn test_set_csv_export_result() {
        let mut app = App::default();
        app.start_csv_export();
        app.set_csv_export_result(Ok("students.csv".into()));
        assert_eq!(app.mode, AppMode::Form);
        assert!(app.filename_input.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Exported to students.csv"));

        app.start_csv_export();
        app.set_csv_export_result(Err(RosterError::Io(std::io::Error::other("disk full"))));
        assert!(app.status_message.as_deref().unwrap().starts_with("Export failed"));
    }
}
