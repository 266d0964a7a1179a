//! Formatting and export services for student records.
//!
//! [`StudentTable`] renders rows as the bordered text block shown in the
//! output area, and [`CsvExporter`] writes the same rows to a CSV file.

use super::errors::RosterResult;
use super::models::Student;
use std::path::Path;

const HEADERS: [&str; 4] = ["ID", "Name", "Age", "Grade"];

/// Renders students as an aligned, bordered text table.
///
/// Cells are centered within their column and every column is as wide as its
/// widest cell or header, plus one space of padding on each side.
///
/// # Examples
///
/// ```
/// use roster::domain::{Student, StudentTable};
///
/// let rendered = StudentTable::new().render(&[Student::new(1, "Amy", 20, "A")]);
/// assert!(rendered.contains("| Amy  |"));
/// ```
#[derive(Debug, Clone)]
pub struct StudentTable {
    headers: [&'static str; 4],
}

impl Default for StudentTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentTable {
    pub fn new() -> Self {
        Self { headers: HEADERS }
    }

    /// Formats `students` into a table with a header row.
    ///
    /// An empty slice still yields the header and its borders.
    pub fn render(&self, students: &[Student]) -> String {
        let rows: Vec<[String; 4]> = students
            .iter()
            .map(|s| [s.id.to_string(), s.name.clone(), s.age.to_string(), s.grade.clone()])
            .collect();

        let mut widths = self.headers.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let border = Self::border(&widths);
        let mut lines = vec![border.clone()];
        lines.push(Self::line(&self.headers.map(String::from), &widths));
        lines.push(border.clone());
        if !rows.is_empty() {
            for row in &rows {
                lines.push(Self::line(row, &widths));
            }
            lines.push(border);
        }
        lines.join("\n")
    }

    fn border(widths: &[usize; 4]) -> String {
        let mut out = String::from("+");
        for width in widths {
            out.push_str(&"-".repeat(width + 2));
            out.push('+');
        }
        out
    }

    fn line(cells: &[String; 4], widths: &[usize; 4]) -> String {
        let mut out = String::from("|");
        for (cell, width) in cells.iter().zip(widths.iter()) {
            out.push_str(&format!(" {:^width$} |", cell, width = *width));
        }
        out
    }
}

/// Writes student rows to CSV files.
pub struct CsvExporter;

impl CsvExporter {
    /// Writes `students` to `filename` with an `id,name,age,grade` header.
    ///
    /// Returns the filename on success so the caller can report it.
    pub fn export_students(students: &[Student], filename: &str) -> RosterResult<String> {
        let mut writer = csv::Writer::from_path(Path::new(filename))?;
        for student in students {
            writer.serialize(student)?;
        }
        writer.flush()?;
        Ok(filename.to_string())
    }
}
