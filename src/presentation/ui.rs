use crate::application::{App, AppMode, DialogKind, Focus};
use crate::domain::{FormField, Trigger};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const LABEL_WIDTH: u16 = 7;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(FormField::ALL.len() as u16 + 2),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_form(f, app, chunks[1]);
    render_buttons(f, app, chunks[2]);
    render_output(f, app, chunks[3]);
    render_status_bar(f, app, chunks[4]);

    match app.mode {
        AppMode::Dialog => render_dialog(f, app),
        AppMode::Help => render_help_popup(f, app.help_scroll),
        _ => {}
    }
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("Student Management System").style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = app.focus == Focus::Field(field);
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let value_style = if focused {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{:<width$}", field.label(), width = LABEL_WIDTH as usize), label_style),
                Span::styled(app.form.value(field).to_string(), value_style),
            ])
        })
        .collect();

    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Student"));
    f.render_widget(form, area);

    if app.mode == AppMode::Form {
        if let Focus::Field(field) = app.focus {
            let row = FormField::ALL.iter().position(|&candidate| candidate == field).unwrap_or(0);
            let x = area.x.saturating_add(1 + LABEL_WIDTH).saturating_add(to_u16(app.cursor_position));
            let y = area.y.saturating_add(1).saturating_add(to_u16(row));
            f.set_cursor_position((x.min(area.right().saturating_sub(2)), y));
        }
    }
}

fn render_buttons(f: &mut Frame, app: &App, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (trigger, cell) in Trigger::ALL.iter().zip(cells.iter()) {
        let style = if app.focus == Focus::Button(*trigger) {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default()
        };
        let button = Paragraph::new(trigger.label())
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(button, *cell);
    }
}

fn render_output(f: &mut Frame, app: &App, area: Rect) {
    let output = Paragraph::new(app.output.as_str())
        .block(Block::default().borders(Borders::ALL).title("Output"))
        .scroll((app.output_scroll, 0));
    f.render_widget(output, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Form | AppMode::Dialog => app.status_message.clone().unwrap_or_else(|| {
            "Tab: next | Enter: press | ^A add | ^V view | ^U update | ^D delete | ^E export CSV | F1: help | Esc: quit"
                .to_string()
        }),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
    };

    let status = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Form | AppMode::Dialog => Style::default(),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
        });
    f.render_widget(status, area);

    if app.mode == AppMode::ExportCsv {
        let prefix = to_u16("Export CSV as: ".chars().count());
        let x = area.x
            .saturating_add(1)
            .saturating_add(prefix)
            .saturating_add(to_u16(app.cursor_position));
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y.saturating_add(1)));
    }
}

fn render_dialog(f: &mut Frame, app: &App) {
    let Some(dialog) = app.dialog.as_ref() else { return };
    let area = centered_rect(f.area(), 50, 7);
    let color = match dialog.kind {
        DialogKind::Info => Color::Green,
        DialogKind::Error => Color::Red,
    };

    f.render_widget(Clear, area);
    let text = vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("[ OK ]", Style::default().add_modifier(Modifier::REVERSED))),
    ];
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(dialog.title)
                .style(Style::default().fg(color)),
        );
    f.render_widget(widget, area);
}

/// Converts a length to terminal cells, clamping at `u16::MAX`.
fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"STUDENT MANAGEMENT SYSTEM

=== FORM ===
Tab / Down      Next field or button
Shift+Tab / Up  Previous field or button
Enter           Press focused button, or move to next field
Space           Press focused button
Left/Right      Move cursor within a field
Home/End        Jump to start/end of a field
Backspace/Del   Delete characters
Ctrl+L          Clear the form

=== ACTIONS ===
Ctrl+A          Add Student (all fields required, ID must be new)
Ctrl+V          View Students (replaces the output area)
Ctrl+U          Update Student (all fields required)
Ctrl+D          Delete Student (ID required)
Ctrl+E          Export all students to a CSV file
                Update and Delete succeed even when no student
                has the given ID.

=== OUTPUT ===
PgUp/PgDn       Scroll the output area

=== DIALOGS ===
Enter/Esc/Space Close the message

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window

Esc or Ctrl+Q   Quit"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Dialog;
    use crate::domain::Student;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render_shows_form_and_buttons() {
        let mut app = App::default();
        app.form.name = "Amy".into();
        let screen = draw(&app);

        assert!(screen.contains("Student Management System"));
        for label in ["ID", "Name", "Age", "Grade"] {
            assert!(screen.contains(label));
        }
        assert!(screen.contains("Amy"));
        assert!(screen.contains("Add Student"));
        assert!(screen.contains("Delete Student"));
    }

    #[test]
    fn test_render_output_and_dialog() {
        let mut app = App::default();
        app.set_view_result(Ok(vec![Student::new(1, "Amy", 20, "A")]));
        let screen = draw(&app);
        assert!(screen.contains("| ID | Name | Age | Grade |"));
        assert!(screen.contains("| 1  | Amy  | 20  |   A   |"));

        app.show_dialog(Dialog::error("A student with this ID already exists."));
        let screen = draw(&app);
        assert!(screen.contains("A student with this ID already exists."));
        assert!(screen.contains("[ OK ]"));
    }

    #[test]
    fn test_render_with_very_long_input_keeps_cursor_inside() {
        let mut app = App::default();
        app.form.id = "9".repeat(70_000);
        app.set_focus(Focus::Field(FormField::Id));
        assert_eq!(app.cursor_position, 70_000);

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render_ui(f, &app)).unwrap();
        let cursor = terminal.get_cursor_position().unwrap();
        assert!(cursor.x < 80);
        assert_eq!(cursor.y, 2);

        app.start_csv_export();
        app.filename_input = "x".repeat(70_000);
        app.cursor_position = 70_000;
        terminal.draw(|f| render_ui(f, &app)).unwrap();
        assert!(terminal.get_cursor_position().unwrap().x < 80);
    }

    #[test]
    fn test_to_u16_clamps() {
        assert_eq!(to_u16(12), 12);
        assert_eq!(to_u16(70_000), u16::MAX);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 4);
        let rect = centered_rect(area, 50, 7);
        assert_eq!(rect, Rect::new(0, 0, 20, 4));
    }
}
