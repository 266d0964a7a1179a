//! SQLite persistence for student records.
//!
//! Every operation opens its own connection, runs one statement set, commits
//! and drops the connection before returning, whether it succeeded or not.

use crate::domain::{Age, RosterError, RosterResult, Student};
use crate::infrastructure::DatabaseConfig;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    grade TEXT NOT NULL
)";

impl ToSql for Age {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Age::Years(years) => ToSqlOutput::Owned(Value::Integer(*years)),
            Age::Text(text) => ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes())),
        })
    }
}

// SQLite's INTEGER affinity already turned numeric text into integers, so
// anything still stored as text is kept as text.
impl FromSql for Age {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Integer(years) => Age::Years(years),
            ValueRef::Real(real) => Age::Text(real.to_string()),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Age::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            ValueRef::Null => Age::Text(String::new()),
        })
    }
}

/// Repository over the `students` table of a single database file.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    path: PathBuf,
    busy_timeout: Duration,
}

impl StudentRepository {
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            busy_timeout,
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.path.clone(), config.busy_timeout())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the table if it does not exist yet. Safe to call on every startup.
    pub fn initialize(&self) -> RosterResult<()> {
        let conn = self.connect()?;
        conn.execute_batch(CREATE_TABLE).map_err(|e| self.log_failure("initialize", e))?;
        info!(path = %self.path.display(), "student table ready");
        Ok(())
    }

    /// Inserts `student`, failing with [`RosterError::DuplicateKey`] when its id is taken.
    ///
    /// The existence lookup runs before the insert inside one write transaction,
    /// so the duplicate check decides the error rather than the primary key.
    pub fn create(&self, student: &Student) -> RosterResult<()> {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| self.log_failure("create", e))?;

        let existing: Option<i64> = tx
            .query_row("SELECT id FROM students WHERE id = ?1", params![student.id], |row| row.get(0))
            .optional()
            .map_err(|e| self.log_failure("create", e))?;
        if existing.is_some() {
            warn!(id = student.id, "rejected duplicate student id");
            return Err(RosterError::DuplicateKey(student.id));
        }

        tx.execute(
            "INSERT INTO students (id, name, age, grade) VALUES (?1, ?2, ?3, ?4)",
            params![student.id, student.name, student.age, student.grade],
        )
        .map_err(|e| self.log_failure("create", e))?;
        tx.commit().map_err(|e| self.log_failure("create", e))?;

        info!(id = student.id, "student added");
        Ok(())
    }

    /// Returns every row, ordered by id.
    pub fn list_all(&self) -> RosterResult<Vec<Student>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, name, age, grade FROM students ORDER BY id")
            .map_err(|e| self.log_failure("list_all", e))?;
        let students = stmt
            .query_map([], |row| {
                Ok(Student {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    age: row.get(2)?,
                    grade: row.get(3)?,
                })
            })
            .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
            .map_err(|e| self.log_failure("list_all", e))?;

        debug!(count = students.len(), "listed students");
        Ok(students)
    }

    /// Overwrites name, age and grade for the row with `student.id`.
    ///
    /// A missing id is not an error: nothing changes and 0 is returned.
    pub fn update(&self, student: &Student) -> RosterResult<usize> {
        let conn = self.connect()?;
        let changed = conn
            .execute(
                "UPDATE students SET name = ?1, age = ?2, grade = ?3 WHERE id = ?4",
                params![student.name, student.age, student.grade, student.id],
            )
            .map_err(|e| self.log_failure("update", e))?;

        info!(id = student.id, changed, "student update applied");
        Ok(changed)
    }

    /// Removes the row with `id`. Returns 0 when there was no such row.
    pub fn delete(&self, id: i64) -> RosterResult<usize> {
        let conn = self.connect()?;
        let changed = conn
            .execute("DELETE FROM students WHERE id = ?1", params![id])
            .map_err(|e| self.log_failure("delete", e))?;

        info!(id, changed, "student delete applied");
        Ok(changed)
    }

    fn connect(&self) -> RosterResult<Connection> {
        let conn = Connection::open(&self.path).map_err(|e| self.log_failure("open", e))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| self.log_failure("open", e))?;
        debug!(path = %self.path.display(), "opened connection");
        Ok(conn)
    }

    fn log_failure(&self, operation: &str, err: rusqlite::Error) -> RosterError {
        let err = RosterError::from(err);
        match &err {
            RosterError::StorageBusy => {
                warn!(operation, timeout_ms = self.busy_timeout.as_millis() as u64, "database busy");
            }
            other => warn!(operation, error = %other, "database operation failed"),
        }
        err
    }
}
