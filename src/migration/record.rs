//! `MigrationRecord` - one row of the `migrations` ledger table

use crate::error::BuoyError;
use crate::schema::ColumnKind;
use crate::value::{coerce, Row, Value};
use chrono::NaiveDateTime;

/// A migration recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    /// Ledger row id (insertion order)
    pub id: i64,

    /// Unique migration name
    pub name: String,

    /// When the migration was recorded; `None` if the column was null
    pub executed_at: Option<NaiveDateTime>,
}

impl MigrationRecord {
    /// Create a `MigrationRecord` from a ledger row
    ///
    /// Expects `id`, `name` and `executed_at` columns. Timestamps may arrive
    /// as native values or as text in any of the usual PostgreSQL forms.
    ///
    /// # Errors
    ///
    /// Returns `Conversion` if a column is missing or cannot be parsed.
    pub fn from_row(row: &Row) -> Result<Self, BuoyError> {
        let id = coerce(required(row, "id")?, &ColumnKind::Integer)?.decode()?;
        let name = coerce(required(row, "name")?, &ColumnKind::Text)?.decode()?;
        let executed_at = coerce(required(row, "executed_at")?, &ColumnKind::Timestamp)?
            .decode::<Option<NaiveDateTime>>()?;

        Ok(Self {
            id,
            name,
            executed_at,
        })
    }
}

fn required(row: &Row, column: &str) -> Result<Value, BuoyError> {
    row.get(column)
        .cloned()
        .ok_or_else(|| BuoyError::conversion(format!("ledger row has no '{column}' column")))
}
