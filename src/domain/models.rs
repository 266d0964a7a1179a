use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub age: Age,
    pub grade: String,
}

impl Student {
    pub fn new(id: i64, name: impl Into<String>, age: i64, grade: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            age: Age::Years(age),
            grade: grade.into(),
        }
    }
}

/// A student's age as stored.
///
/// The form only writes whole numbers, but older databases may hold free
/// text in the `age` column. Such rows are read back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Age {
    Years(i64),
    Text(String),
}

impl From<i64> for Age {
    fn from(years: i64) -> Self {
        Age::Years(years)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Years(years) => write!(f, "{}", years),
            Age::Text(text) => f.write_str(text),
        }
    }
}

/// The four text inputs of the student form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Id,
    Name,
    Age,
    Grade,
}

impl FormField {
    pub const ALL: [FormField; 4] = [FormField::Id, FormField::Name, FormField::Age, FormField::Grade];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Id => "ID",
            FormField::Name => "Name",
            FormField::Age => "Age",
            FormField::Grade => "Grade",
        }
    }
}

/// User-initiated actions bound to the persistence operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Add,
    View,
    Update,
    Delete,
}

impl Trigger {
    pub const ALL: [Trigger; 4] = [Trigger::Add, Trigger::View, Trigger::Update, Trigger::Delete];

    pub fn label(self) -> &'static str {
        match self {
            Trigger::Add => "Add Student",
            Trigger::View => "View Students",
            Trigger::Update => "Update Student",
            Trigger::Delete => "Delete Student",
        }
    }
}
