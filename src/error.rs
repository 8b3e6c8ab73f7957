//! Error types shared by every layer of the crate.
//!
//! `BuoyError` follows the propagation policy of the engine: metadata and
//! generation errors are returned immediately, execution errors are returned
//! to the caller unchanged (a transaction only intercepts them to roll back).

use crate::connection::ConnectionError;
use may_postgres::Error as PostgresError;
use thiserror::Error;

/// SQLSTATE class reported by PostgreSQL for integrity constraint violations.
const INTEGRITY_CONSTRAINT_CLASS: &str = "23";

/// Main error type for lifebuoy operations.
#[derive(Error, Debug)]
pub enum BuoyError {
    /// The entity type lacks a table or primary-key declaration
    #[error("Missing metadata: {0}")]
    MissingMetadata(String),

    /// The store rejected a write (unique, not-null, foreign key, check)
    #[error("Constraint violation ({code}): {message}")]
    ConstraintViolation { code: String, message: String },

    /// A row value could not be coerced into its target field
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// The entity accessor does not know a declared column
    #[error("Unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// Auto-migration target table has no live columns
    #[error("Table '{0}' does not exist in the database")]
    MissingTable(String),

    /// Connection could not be established
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Any other `PostgreSQL` failure
    #[error("PostgreSQL error: {0}")]
    Postgres(PostgresError),

    /// Query construction or execution error without a driver error attached
    #[error("Query error: {0}")]
    Query(String),
}

impl BuoyError {
    /// Create a `MissingMetadata` error
    pub fn missing_metadata(message: impl Into<String>) -> Self {
        BuoyError::MissingMetadata(message.into())
    }

    /// Create a `Conversion` error
    pub fn conversion(message: impl Into<String>) -> Self {
        BuoyError::Conversion(message.into())
    }

    /// Create an `UnknownColumn` error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        BuoyError::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Whether the caller may retry this operation with different input.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, BuoyError::ConstraintViolation { .. })
    }
}

impl From<PostgresError> for BuoyError {
    fn from(err: PostgresError) -> Self {
        let code = err.code().map(|state| state.code().to_string());
        match code {
            Some(code) if code.starts_with(INTEGRITY_CONSTRAINT_CLASS) => {
                let message = err
                    .as_db_error()
                    .map(|db| db.message().to_string())
                    .unwrap_or_else(|| err.to_string());
                BuoyError::ConstraintViolation { code, message }
            }
            _ => BuoyError::Postgres(err),
        }
    }
}
