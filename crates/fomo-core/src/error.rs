use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The row changed between read and write; the caller should reload and retry.
    #[error("Task '{0}' was modified concurrently")]
    Conflict(String),

    #[error("Group '{0}' is a default group and cannot be deleted")]
    ProtectedGroup(String),

    #[error("Ambiguous short ID. Did you mean one of these?")]
    AmbiguousId(Vec<(String, String)>), // Vec of (ID, Title)

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}
