//! Ledger table DDL and the statements that read and write it

use crate::error::BuoyError;
use sea_query::{Expr, ExprTrait, Order, PostgresQueryBuilder, Query};

/// Name of the ledger table
pub const LEDGER_TABLE: &str = "migrations";

/// DDL creating the ledger table if absent
///
/// - `id`: serial key, insertion order
/// - `name`: unique migration name
/// - `executed_at`: set by the database on insert
pub const CREATE_LEDGER_SQL: &str = "CREATE TABLE IF NOT EXISTS migrations (\
    id SERIAL PRIMARY KEY, \
    name VARCHAR(255) UNIQUE NOT NULL, \
    executed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP);";

/// Select the ledger row named `name`, if any
pub fn find_by_name(name: &str) -> String {
    Query::select()
        .column("name")
        .from(LEDGER_TABLE)
        .and_where(Expr::col("name").eq(name))
        .limit(1)
        .to_string(PostgresQueryBuilder)
}

/// Record `name` as applied
pub fn insert_record(name: &str) -> Result<String, BuoyError> {
    let mut insert = Query::insert();
    insert.into_table(LEDGER_TABLE).columns(["name"]);
    insert
        .values([name.into()])
        .map_err(|e| BuoyError::Query(format!("Failed to build ledger insert: {e}")))?;
    Ok(insert.to_string(PostgresQueryBuilder))
}

/// Remove the ledger row named `name`
pub fn delete_record(name: &str) -> String {
    Query::delete()
        .from_table(LEDGER_TABLE)
        .and_where(Expr::col("name").eq(name))
        .to_string(PostgresQueryBuilder)
}

/// Most recently applied migration: latest `executed_at`, ties broken by highest `id`
pub fn latest_record() -> String {
    Query::select()
        .columns(["id", "name", "executed_at"])
        .from(LEDGER_TABLE)
        .order_by("executed_at", Order::Desc)
        .order_by("id", Order::Desc)
        .limit(1)
        .to_string(PostgresQueryBuilder)
}

/// Every ledger row, oldest first
pub fn list_records() -> String {
    Query::select()
        .columns(["id", "name", "executed_at"])
        .from(LEDGER_TABLE)
        .order_by("executed_at", Order::Asc)
        .order_by("id", Order::Asc)
        .to_string(PostgresQueryBuilder)
}
