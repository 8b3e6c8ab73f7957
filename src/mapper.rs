//! Row mapper: builds entities from result rows.
//!
//! Each declared column is looked up by name, coerced to its declared kind
//! and handed to [`Entity::set`]. SQL `NULL` leaves the field at its default.

use crate::error::BuoyError;
use crate::model::Entity;
use crate::schema::{table_of, TableDescriptor};
use crate::value::{coerce, Row};

/// Map one row into a new `E`.
///
/// # Errors
///
/// `Conversion` if a declared column is missing from the row or a value
/// cannot be coerced (including enum values with no matching name).
pub fn map_row<E: Entity>(row: &Row) -> Result<E, BuoyError> {
    let table = table_of::<E>()?;
    map_columns(&table, row, |column| column.to_string())
}

/// Map many rows, failing on the first bad one
pub fn map_rows<E: Entity>(rows: &[Row]) -> Result<Vec<E>, BuoyError> {
    rows.iter().map(map_row::<E>).collect()
}

/// Map the `{prefix}_{column}` columns of a joined row.
///
/// Returns `Ok(None)` when the prefixed primary key is null or absent, which
/// is how an outer join reports "no matching row on this side".
pub fn map_aliased<E: Entity>(row: &Row, prefix: &str) -> Result<Option<E>, BuoyError> {
    let table = table_of::<E>()?;
    let pk = table.require_primary_key()?;
    if row.is_null(&alias(prefix, pk.name())) {
        return Ok(None);
    }
    map_columns(&table, row, |column| alias(prefix, column)).map(Some)
}

/// Alias of `column` under `prefix`: `p` + `id` → `p_id`
pub fn alias(prefix: &str, column: &str) -> String {
    format!("{prefix}_{column}")
}

fn map_columns<E: Entity>(
    table: &TableDescriptor,
    row: &Row,
    row_name: impl Fn(&str) -> String,
) -> Result<E, BuoyError> {
    let mut entity = E::default();
    for column in table.columns() {
        let name = row_name(column.name());
        let raw = row.get(&name).ok_or_else(|| {
            BuoyError::conversion(format!(
                "row has no column '{name}' for {}.{}",
                table.name(),
                column.name()
            ))
        })?;
        if raw.is_null() {
            continue;
        }
        let value = coerce(raw.clone(), &column.kind()).map_err(|e| match e {
            BuoyError::Conversion(msg) => {
                BuoyError::conversion(format!("{}.{}: {msg}", table.name(), column.name()))
            }
            other => other,
        })?;
        entity.set(column.name(), value)?;
    }
    Ok(entity)
}
