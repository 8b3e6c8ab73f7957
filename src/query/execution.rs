//! CRUD helpers that run generated SQL on any [`Executor`].
//!
//! Pass a connection for a standalone call or a
//! [`Transaction`](crate::Transaction) to take part in one.

use super::generator::{
    delete_sql, delete_where_sql, insert_sql, select_all_sql, select_sql, update_sql,
    SelectOptions,
};
use crate::error::BuoyError;
use crate::executor::Executor;
use crate::mapper::map_rows;
use crate::model::Entity;
use crate::schema::ColumnKind;
use crate::value::{coerce, Value};

/// Insert `entity` and return the generated primary key
///
/// # Errors
///
/// [`BuoyError::ConstraintViolation`] on duplicate unique values, or
/// `Query` if the statement returned no key.
pub fn insert_with<E: Entity>(executor: &impl Executor, entity: &E) -> Result<i64, BuoyError> {
    let sql = insert_sql(entity)?;
    log::debug!("Insert: {sql}");
    let key = executor.query_scalar(&sql)?;
    if key.is_null() {
        return Err(BuoyError::Query(format!("insert returned no key: {sql}")));
    }
    coerce(key, &ColumnKind::Integer)?.decode()
}

/// Update the row matching `entity`'s key, returning rows affected
pub fn update_with<E: Entity>(executor: &impl Executor, entity: &E) -> Result<u64, BuoyError> {
    let sql = update_sql(entity)?;
    log::debug!("Update: {sql}");
    executor.execute(&sql)
}

/// Delete the row matching `entity`'s key, returning rows affected
pub fn delete_with<E: Entity>(executor: &impl Executor, entity: &E) -> Result<u64, BuoyError> {
    let sql = delete_sql(entity)?;
    log::debug!("Delete: {sql}");
    executor.execute(&sql)
}

/// Delete every `E` row whose `column` equals `value`
pub fn delete_where<E: Entity>(
    executor: &impl Executor,
    column: &str,
    value: &Value,
) -> Result<u64, BuoyError> {
    let sql = delete_where_sql::<E>(column, value)?;
    log::debug!("Delete where: {sql}");
    executor.execute(&sql)
}

/// Every `E` row
pub fn select_all_with<E: Entity>(executor: &impl Executor) -> Result<Vec<E>, BuoyError> {
    let sql = select_all_sql::<E>()?;
    log::debug!("Select: {sql}");
    map_rows(&executor.query_all(&sql)?)
}

/// `E` rows matching `options`
pub fn select_with<E: Entity>(
    executor: &impl Executor,
    options: &SelectOptions,
) -> Result<Vec<E>, BuoyError> {
    let sql = select_sql::<E>(options)?;
    log::debug!("Select: {sql}");
    map_rows(&executor.query_all(&sql)?)
}
