//! Error types for resource and submission storage.

use std::fmt;

use thiserror::Error;

/// How a database failure should be reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Lock contention or an exhausted pool; the same call may succeed shortly.
    Contention,
    /// A schema constraint rejected the write.
    Constraint,
    Other,
}

// Primary SQLite result codes; extended codes carry these in the low byte.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_CONSTRAINT: i32 = 19;

impl DbErrorKind {
    #[must_use]
    pub fn from_sqlx(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => Self::Contention,
            sqlx::Error::Database(database_error) => {
                let primary = database_error
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .map(|code| code & 0xff);
                match primary {
                    Some(SQLITE_BUSY | SQLITE_LOCKED) => Self::Contention,
                    Some(SQLITE_CONSTRAINT) => Self::Constraint,
                    _ => Self::Other,
                }
            }
            _ => Self::Other,
        }
    }

    /// True when retrying the same operation later can succeed.
    #[must_use]
    pub fn is_transient(self) -> bool {
        self == Self::Contention
    }
}

impl fmt::Display for DbErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Contention => "contention",
            Self::Constraint => "constraint",
            Self::Other => "other",
        })
    }
}

/// Record types addressed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Resource,
    Submission,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resource => "resource",
            Self::Submission => "submission",
        })
    }
}

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error ({kind}): {message}")]
    Database {
        /// Decides the HTTP status a failure maps to.
        kind: DbErrorKind,
        /// Human-readable database error text.
        message: String,
    },

    /// No row with this id.
    #[error("{entity} not found: id {id}")]
    NotFound { entity: Entity, id: i64 },

    /// Another resource is already registered for this post.
    #[error(
        "a resource is already registered for post key {key}\n  Suggestion: Edit the existing resource instead of adding a new one"
    )]
    DuplicateKey { key: String },

    /// Input rejected before any write was attempted.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Offending input field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database {
            kind: DbErrorKind::from_sqlx(&err),
            message: err.to_string(),
        }
    }
}

impl StoreError {
    /// Creates a `Validation` error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Maps an insert/update failure, turning a unique violation into `DuplicateKey`.
    pub(crate) fn from_write(err: sqlx::Error, key: &str) -> Self {
        if let sqlx::Error::Database(database_error) = &err
            && database_error.is_unique_violation()
        {
            return Self::DuplicateKey {
                key: key.to_string(),
            };
        }
        Self::from(err)
    }

    /// Returns the typed database error kind, when this is a database error.
    #[must_use]
    pub fn database_kind(&self) -> Option<DbErrorKind> {
        match self {
            Self::Database { kind, .. } => Some(*kind),
            Self::NotFound { .. } | Self::DuplicateKey { .. } | Self::Validation { .. } => None,
        }
    }
}
