//! SQL text generation for entity types and instances.
//!
//! Every statement is terminated with `;` and embeds values as literals
//! rendered by [`format_value`].

use super::format::{format_prefix_pattern, format_value};
use crate::error::BuoyError;
use crate::model::Entity;
use crate::schema::{table_of, ColumnDescriptor, TableDescriptor};
use crate::value::Value;

/// Filter and ordering for [`select_sql`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectOptions {
    filter: Option<(String, Value)>,
    order_by: Option<String>,
    descending: bool,
}

impl SelectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on `column`: prefix match for text, equality otherwise.
    /// A null value leaves the query unfiltered.
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((column.into(), value.into()));
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order_by = Some(column.into());
        self
    }

    #[must_use]
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }
}

/// `CREATE TABLE IF NOT EXISTS` statement for `E`
pub fn create_table_sql<E: Entity>() -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    let definitions: Vec<String> = table.columns().iter().map(column_definition).collect();
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        table.name(),
        definitions.join(", ")
    ))
}

fn column_definition(column: &ColumnDescriptor) -> String {
    if column.is_primary_key() {
        let db_type = column.explicit_db_type().unwrap_or("SERIAL");
        return format!("{} {} PRIMARY KEY", column.name(), db_type);
    }

    let mut definition = format!("{} {}", column.name(), column.sql_type());
    if column.is_unique() {
        definition.push_str(" UNIQUE");
    }
    if !column.is_nullable() {
        definition.push_str(" NOT NULL");
    }
    if let Some(default) = column.default_literal() {
        definition.push_str(" DEFAULT ");
        definition.push_str(default);
    }
    definition
}

/// `INSERT ... RETURNING <pk>` statement; the key column is never written.
pub fn insert_sql<E: Entity>(entity: &E) -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    let pk = table.require_primary_key()?;

    let mut columns = Vec::new();
    let mut values = Vec::new();
    for column in table.data_columns() {
        columns.push(column.name());
        values.push(format_value(&read_column(entity, &table, column)?));
    }

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {};",
        table.name(),
        columns.join(", "),
        values.join(", "),
        pk.name()
    ))
}

/// `UPDATE ... WHERE <pk> = <value>` statement; the key is only used in the WHERE clause.
pub fn update_sql<E: Entity>(entity: &E) -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    let pk = table.require_primary_key()?;

    let assignments = table
        .data_columns()
        .map(|column| {
            read_column(entity, &table, column)
                .map(|value| format!("{} = {}", column.name(), format_value(&value)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!(
        "UPDATE {} SET {} WHERE {} = {};",
        table.name(),
        assignments.join(", "),
        pk.name(),
        format_value(&read_column(entity, &table, pk)?)
    ))
}

/// `DELETE ... WHERE <pk> = <value>` statement for one entity
pub fn delete_sql<E: Entity>(entity: &E) -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    let pk = table.require_primary_key()?;
    Ok(format!(
        "DELETE FROM {} WHERE {} = {};",
        table.name(),
        pk.name(),
        format_value(&read_column(entity, &table, pk)?)
    ))
}

/// `DELETE FROM <table> WHERE <column> = <value>;` for bulk child cleanup
pub fn delete_where_sql<E: Entity>(column: &str, value: &Value) -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    let column = declared_column(&table, column)?;
    Ok(format!(
        "DELETE FROM {} WHERE {} = {};",
        table.name(),
        column.name(),
        format_value(value)
    ))
}

/// `SELECT * FROM <table>;`
pub fn select_all_sql<E: Entity>() -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    Ok(format!("SELECT * FROM {};", table.name()))
}

/// `SELECT *` with an optional filter and ordering
///
/// ```
/// use lifebuoy::query::{select_sql, SelectOptions};
/// use lifebuoy::tests_cfg::Patient;
///
/// let sql = select_sql::<Patient>(&SelectOptions::new().filter("first_name", "Jo")).unwrap();
/// assert_eq!(sql, "SELECT * FROM patients WHERE first_name LIKE 'Jo%';");
/// ```
pub fn select_sql<E: Entity>(options: &SelectOptions) -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    let mut sql = format!("SELECT * FROM {}", table.name());

    if let Some((column, value)) = &options.filter {
        match value {
            Value::Null => {}
            Value::Text(prefix) => {
                sql.push_str(&format!(" WHERE {column} LIKE {}", format_prefix_pattern(prefix)));
            }
            other => sql.push_str(&format!(" WHERE {column} = {}", format_value(other))),
        }
    }

    if let Some(column) = &options.order_by {
        let direction = if options.descending { "DESC" } else { "ASC" };
        sql.push_str(&format!(" ORDER BY {column} {direction}"));
    }

    sql.push(';');
    Ok(sql)
}

/// `SELECT * FROM <table> WHERE <column> = <value>;` (always equality, never `LIKE`)
pub fn select_by_column_sql<E: Entity>(column: &str, value: &Value) -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    let column = declared_column(&table, column)?;
    Ok(format!(
        "SELECT * FROM {} WHERE {} = {};",
        table.name(),
        column.name(),
        format_value(value)
    ))
}

/// `SELECT * FROM <table> WHERE <pk> = <value>;`
pub fn select_by_key_sql<E: Entity>(key: &Value) -> Result<String, BuoyError> {
    let table = table_of::<E>()?;
    let pk = table.require_primary_key()?;
    select_by_column_sql::<E>(pk.name(), key)
}

/// Read a declared column from an entity, failing if the accessor does not map it.
pub(crate) fn read_column<E: Entity>(
    entity: &E,
    table: &TableDescriptor,
    column: &ColumnDescriptor,
) -> Result<Value, BuoyError> {
    entity
        .get(column.name())
        .ok_or_else(|| BuoyError::unknown_column(table.name(), column.name()))
}

fn declared_column<'t>(
    table: &'t TableDescriptor,
    column: &str,
) -> Result<&'t ColumnDescriptor, BuoyError> {
    table
        .column(column)
        .ok_or_else(|| BuoyError::unknown_column(table.name(), column))
}
