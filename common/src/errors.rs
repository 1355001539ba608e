// Error handling framework

use thiserror::Error;

/// Event-time and timezone errors
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid event time '{value}': {reason}")]
    InvalidEventTime { value: String, reason: String },

    #[error("Unknown reminder category: {0}")]
    UnknownCategory(String),
}

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Notification transport errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    RequestFailed(String),

    #[error("Notification rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Errors that abort a reminder cycle
///
/// Notification failures are handled inside the cycle and never surface here.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

// Implement From for common external errors
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => DatabaseError::QueryFailed(db_err.message().to_string()),
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}
