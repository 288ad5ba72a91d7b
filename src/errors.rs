use deadpool_diesel::InteractError;
use deadpool_diesel::postgres::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tracing::error;

/// Failures surfaced by the data-model layer.
///
/// Constraint violations are classified from the storage engine's report so
/// callers can tell them apart; nothing is retried or swallowed here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated ({}): {message}", .constraint.as_deref().unwrap_or("unknown"))]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("Foreign key violated ({}): {message}", .constraint.as_deref().unwrap_or("unknown"))]
    ForeignKeyViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("Not-null constraint violated ({}): {message}", .column.as_deref().unwrap_or("unknown"))]
    NotNullViolation {
        column: Option<String>,
        message: String,
    },

    #[error("Database connection failure: {0}")]
    Connection(String),

    #[error("Database interaction failed: {0}")]
    Interaction(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Authoring contract violated: {0}")]
    Invariant(String),

    #[error("Database query error: {0}")]
    Query(#[source] DieselError),
}

impl StoreError {
    /// Name of the violated constraint, when the storage engine reported one.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            StoreError::UniqueViolation { constraint, .. }
            | StoreError::ForeignKeyViolation { constraint, .. } => constraint.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        StoreError::Invariant(message.into())
    }
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => StoreError::UniqueViolation {
                    constraint: info.constraint_name().map(str::to_string),
                    message: info.message().to_string(),
                },
                DatabaseErrorKind::ForeignKeyViolation => StoreError::ForeignKeyViolation {
                    constraint: info.constraint_name().map(str::to_string),
                    message: info.message().to_string(),
                },
                DatabaseErrorKind::NotNullViolation => StoreError::NotNullViolation {
                    column: info.column_name().map(str::to_string),
                    message: info.message().to_string(),
                },
                DatabaseErrorKind::ClosedConnection => {
                    error!("Database connection closed: {}", info.message());
                    StoreError::Connection(info.message().to_string())
                }
                other => {
                    error!("Unhandled database error ({:?}): {}", other, info.message());
                    StoreError::Query(DieselError::DatabaseError(other, info))
                }
            },
            DieselError::NotFound => StoreError::NotFound("Row not found".to_string()),
            other => {
                error!("Unhandled Diesel error encountered: {:?}", other);
                StoreError::Query(other)
            }
        }
    }
}

impl From<PoolError> for StoreError {
    fn from(err: PoolError) -> Self {
        error!("Database pool error encountered: {:?}", err);
        StoreError::Connection(err.to_string())
    }
}

impl From<InteractError> for StoreError {
    fn from(err: InteractError) -> Self {
        error!("Database interaction error encountered: {:?}", err);
        StoreError::Interaction(err.to_string())
    }
}
