use thiserror::Error;

/// Errors surfaced to the user at a trigger boundary.
///
/// None of these are fatal: the event loop reports them and keeps running.
#[derive(Error, Debug)]
pub enum RosterError {
    /// A required form field was left empty. Carries the user-facing message.
    #[error("{0}")]
    MissingField(&'static str),

    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("A student with this ID already exists.")]
    DuplicateKey(i64),

    #[error("The student database is busy. Try again in a moment.")]
    StorageBusy,

    #[error("database error: {0}")]
    Storage(#[source] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for RosterError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
                RosterError::StorageBusy
            }
            _ => RosterError::Storage(err),
        }
    }
}

pub type RosterResult<T> = Result<T, RosterError>;
