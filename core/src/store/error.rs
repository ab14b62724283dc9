// storefront/src/store/error.rs

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Failures reported by a store implementation.
///
/// Constraint violations carry the name of the violated constraint (see
/// `store::constraints`) so callers can translate them into business errors.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("unique constraint '{constraint}' violated")]
  UniqueViolation { constraint: String },

  #[error("foreign key constraint '{constraint}' violated")]
  ForeignKeyViolation { constraint: String },

  #[error("check constraint '{constraint}' violated")]
  CheckViolation { constraint: String },

  #[error("database error: {0}")]
  Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
  fn from(err: sqlx::Error) -> Self {
    let classified = err
      .as_database_error()
      .map(|db_err| (db_err.kind(), db_err.constraint().unwrap_or_default().to_string()));

    match classified {
      Some((ErrorKind::UniqueViolation, constraint)) => StoreError::UniqueViolation { constraint },
      Some((ErrorKind::ForeignKeyViolation, constraint)) => StoreError::ForeignKeyViolation { constraint },
      Some((ErrorKind::CheckViolation, constraint)) => StoreError::CheckViolation { constraint },
      _ => StoreError::Database(err),
    }
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
