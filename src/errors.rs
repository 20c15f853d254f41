//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Persistence failure when interacting with `SQLite`. Distinct from
    /// `Validation`: the caller's input was fine, the store was not.
    Db(String),
    /// File-system or I/O operation failure.
    Io(String),
    /// Requested entity does not exist or is not owned by the caller.
    NotFound(String),
    /// Submission attempted against a deactivated survey.
    Inactive(String),
    /// A submitted answer is malformed, missing, or out of range.
    Validation {
        /// Field key of the offending input (`question_<id>`).
        field: String,
        /// Human-readable description of the violation.
        message: String,
    },
    /// Uniqueness or referential-integrity violation.
    Conflict(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Db(msg) => write!(f, "db: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Inactive(msg) => write!(f, "inactive: {msg}"),
            Self::Validation { field, message } => {
                write!(f, "validation: {field}: {message}")
            }
            Self::Conflict(msg) => write!(f, "conflict: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // UNIQUE and FOREIGN KEY failures are integrity signals, not
        // generic storage errors; callers treat them as `Conflict`.
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
                return Self::Conflict(db_err.to_string());
            }
        }
        Self::Db(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl AppError {
    /// Construct a `Validation` error for a named field.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
