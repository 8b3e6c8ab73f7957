//! Executor seam between the engine and a database driver
//!
//! Everything above this module speaks SQL text and [`Row`]s. The traits
//! here are the only place a driver is plugged in:
//!
//! - [`Executor`] runs statements (side effect, scalar, rows)
//! - [`Connection`] adds `BEGIN` / `COMMIT` / `ROLLBACK`
//! - [`Connector`] opens a fresh connection per top-level operation
//!
//! [`PgConnection`] implements them over `may_postgres`; tests use
//! `test_helpers::MockConnector` (feature `test-helpers`).

use crate::error::BuoyError;
use crate::value::{Row, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use may_postgres::types::{FromSql, Type};
use may_postgres::{Client, Error as PostgresError, Row as PgRow};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::error::Error as StdError;
use std::time::Instant;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Trait for running SQL text against a database
///
/// Implemented by connections and by [`Transaction`](crate::Transaction), so
/// the same helper works inside and outside a transaction.
pub trait Executor {
    /// Run a statement for its side effect, returning rows affected
    ///
    /// # Errors
    ///
    /// Returns `BuoyError` if execution fails. Integrity violations surface as
    /// [`BuoyError::ConstraintViolation`].
    fn execute(&self, sql: &str) -> Result<u64, BuoyError>;

    /// Run a query and return the first column of the first row
    ///
    /// Returns [`Value::Null`] when the query yields no rows.
    fn query_scalar(&self, sql: &str) -> Result<Value, BuoyError>;

    /// Run a query and return every row in the order produced
    fn query_all(&self, sql: &str) -> Result<Vec<Row>, BuoyError>;

    /// Run a script of one or more `;`-separated statements
    ///
    /// Defaults to [`execute`](Self::execute). Drivers that prepare single
    /// statements override it with an unprepared batch call.
    fn execute_batch(&self, sql: &str) -> Result<(), BuoyError> {
        self.execute(sql).map(|_| ())
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, sql: &str) -> Result<u64, BuoyError> {
        (**self).execute(sql)
    }

    fn query_scalar(&self, sql: &str) -> Result<Value, BuoyError> {
        (**self).query_scalar(sql)
    }

    fn query_all(&self, sql: &str) -> Result<Vec<Row>, BuoyError> {
        (**self).query_all(sql)
    }

    fn execute_batch(&self, sql: &str) -> Result<(), BuoyError> {
        (**self).execute_batch(sql)
    }
}

/// An open connection that can also delimit a transaction.
///
/// The default implementations issue the plain SQL commands.
pub trait Connection: Executor {
    fn begin(&self) -> Result<(), BuoyError> {
        self.execute("BEGIN").map(|_| ())
    }

    fn commit(&self) -> Result<(), BuoyError> {
        self.execute("COMMIT").map(|_| ())
    }

    fn rollback(&self) -> Result<(), BuoyError> {
        self.execute("ROLLBACK").map(|_| ())
    }
}

/// Opens connections on demand
pub trait Connector {
    type Connection: Connection;

    /// Open a new connection, closed when the returned value is dropped
    fn connect(&self) -> Result<Self::Connection, BuoyError>;
}

/// `Connection` over a `may_postgres::Client`
pub struct PgConnection {
    client: Client,
}

impl PgConnection {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Run `call` on the client inside a query span, recording duration and errors
    fn instrumented<T>(
        &self,
        sql: &str,
        call: impl FnOnce(&Client) -> Result<T, PostgresError>,
    ) -> Result<T, BuoyError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(sql).entered();

        let start = Instant::now();
        let result = call(&self.client).map_err(|e| {
            #[cfg(feature = "metrics")]
            METRICS.record_query_error();
            BuoyError::from(e)
        });

        let duration = start.elapsed();
        #[cfg(feature = "metrics")]
        METRICS.record_query_duration(duration);
        log::trace!("Finished in {duration:?}: {sql}");

        result
    }
}

impl Executor for PgConnection {
    fn execute(&self, sql: &str) -> Result<u64, BuoyError> {
        self.instrumented(sql, |client| client.execute(sql, &[]))
    }

    fn query_scalar(&self, sql: &str) -> Result<Value, BuoyError> {
        let rows = self.instrumented(sql, |client| client.query(sql, &[]))?;
        match rows.first() {
            Some(row) if !row.is_empty() => column_value(row, 0),
            _ => Ok(Value::Null),
        }
    }

    fn query_all(&self, sql: &str) -> Result<Vec<Row>, BuoyError> {
        self.instrumented(sql, |client| client.query(sql, &[]))?
            .iter()
            .map(convert_row)
            .collect()
    }

    /// Simple-query protocol, so multi-statement scripts are accepted
    fn execute_batch(&self, sql: &str) -> Result<(), BuoyError> {
        self.instrumented(sql, |client| client.batch_execute(sql))
    }
}

impl Connection for PgConnection {}

fn convert_row(row: &PgRow) -> Result<Row, BuoyError> {
    let mut converted = Row::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        converted.push(column.name(), column_value(row, index)?);
    }
    Ok(converted)
}

fn column_value(row: &PgRow, index: usize) -> Result<Value, BuoyError> {
    let column = &row.columns()[index];
    let ty = column.type_();
    let value = if *ty == Type::INT2 {
        row.try_get::<_, Option<i16>>(index).map(Value::from)
    } else if *ty == Type::INT4 {
        row.try_get::<_, Option<i32>>(index).map(Value::from)
    } else if *ty == Type::INT8 {
        row.try_get::<_, Option<i64>>(index).map(Value::from)
    } else if *ty == Type::FLOAT4 {
        row.try_get::<_, Option<f32>>(index)
            .map(|v| Value::from(v.map(f64::from)))
    } else if *ty == Type::FLOAT8 {
        row.try_get::<_, Option<f64>>(index).map(Value::from)
    } else if *ty == Type::NUMERIC {
        row.try_get::<_, Option<Decimal>>(index)
            .map(|v| v.map_or(Value::Null, decimal_value))
    } else if *ty == Type::BOOL {
        row.try_get::<_, Option<bool>>(index).map(Value::from)
    } else if *ty == Type::TIMESTAMP {
        row.try_get::<_, Option<NaiveDateTime>>(index).map(Value::from)
    } else if *ty == Type::TIMESTAMPTZ {
        row.try_get::<_, Option<DateTime<Utc>>>(index)
            .map(|v| Value::from(v.map(|ts| ts.naive_utc())))
    } else if *ty == Type::DATE {
        row.try_get::<_, Option<NaiveDate>>(index)
            .map(|v| Value::from(v.map(|date| date.and_time(NaiveTime::MIN))))
    } else if *ty == Type::TIME {
        row.try_get::<_, Option<NaiveTime>>(index)
            .map(|v| Value::from(v.map(|time| time.format("%H:%M:%S%.f").to_string())))
    } else if <String as FromSql<'_>>::accepts(ty) {
        row.try_get::<_, Option<String>>(index).map(Value::from)
    } else {
        row.try_get::<_, Option<RawText>>(index)
            .map(|v| Value::from(v.map(|raw| raw.0)))
    };
    value.map_err(|e| {
        BuoyError::conversion(format!(
            "column '{}' of type {}: {e}",
            column.name(),
            ty
        ))
    })
}

/// Integral decimals become `Int`, everything else `Float`
fn decimal_value(decimal: Decimal) -> Value {
    if decimal.fract().is_zero() {
        if let Some(int) = decimal.to_i64() {
            return Value::Int(int);
        }
    }
    decimal.to_f64().map_or(Value::Null, Value::Float)
}

/// Catch-all for column types without a dedicated branch
///
/// Accepts any type whose wire form is UTF-8 text (user enums, `citext`,
/// `xml`, `json`, `jsonb` after its version byte). Binary-only types fail
/// with a conversion error naming the column type.
struct RawText(String);

impl<'a> FromSql<'a> for RawText {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let raw = match raw.split_first() {
            Some((&1, rest)) if *ty == Type::JSONB => rest,
            _ => raw,
        };
        let text = std::str::from_utf8(raw)
            .map_err(|_| format!("no text form for values of type {ty}"))?;
        Ok(RawText(text.to_string()))
    }

    fn accepts(_: &Type) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_decimal_integral_becomes_int() {
        assert_eq!(decimal_value(Decimal::from_str("42.00").unwrap()), Value::Int(42));
        assert_eq!(decimal_value(Decimal::from(-7)), Value::Int(-7));
    }

    #[test]
    fn test_decimal_fraction_becomes_float() {
        assert_eq!(decimal_value(Decimal::from_str("12.50").unwrap()), Value::Float(12.5));
    }

    #[test]
    fn test_raw_text_reads_text_wire_forms() {
        let mood = RawText::from_sql(&Type::TEXT, b"happy").unwrap();
        assert_eq!(mood.0, "happy");
        let json = RawText::from_sql(&Type::JSONB, b"\x01{\"a\":1}").unwrap();
        assert_eq!(json.0, "{\"a\":1}");
    }

    #[test]
    fn test_raw_text_rejects_binary_forms() {
        let err = RawText::from_sql(&Type::BYTEA, &[0xff, 0xfe]).unwrap_err();
        assert!(err.to_string().contains("bytea"));
    }
}
