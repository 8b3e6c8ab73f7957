//! Lenient coercion of raw row values into a column's declared kind.
//!
//! Drivers do not always report the exact type a field expects (`BIGINT`
//! where the field is `i32`, text from a catalog view, `NUMERIC` for an
//! integer column), so the row mapper coerces before handing values to
//! [`Entity::set`](crate::Entity::set).

use super::types::{parse_enum_name, TIMESTAMP_FORMAT};
use super::Value;
use crate::error::BuoyError;
use crate::schema::ColumnKind;
use chrono::NaiveDateTime;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Coerce a non-null value into `kind`.
///
/// `NULL` is returned unchanged; callers decide whether null is acceptable.
pub fn coerce(value: Value, kind: &ColumnKind) -> Result<Value, BuoyError> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match kind {
        ColumnKind::Integer => to_integer(value).map(Value::Int),
        ColumnKind::Text => Ok(Value::Text(value.to_text().unwrap_or_default())),
        ColumnKind::Timestamp => to_timestamp(value).map(Value::Timestamp),
        ColumnKind::Boolean => to_boolean(value).map(Value::Bool),
        ColumnKind::Enum(names) => {
            parse_enum_name(&value, names).map(|name| Value::Text(name.to_string()))
        }
    }
}

fn to_integer(value: Value) -> Result<i64, BuoyError> {
    match value {
        Value::Int(i) => Ok(i),
        Value::Bool(b) => Ok(i64::from(b)),
        // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive
        Value::Float(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            Ok(f as i64)
        }
        Value::Text(ref s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| BuoyError::conversion(format!("'{s}' is not an integer: {e}"))),
        other => Err(BuoyError::conversion(format!(
            "cannot convert {} value '{other}' to integer",
            other.type_name()
        ))),
    }
}

fn to_timestamp(value: Value) -> Result<NaiveDateTime, BuoyError> {
    match value {
        Value::Timestamp(ts) => Ok(ts),
        Value::Text(ref s) => TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s.trim(), format).ok())
            .ok_or_else(|| {
                BuoyError::conversion(format!(
                    "failed to parse timestamp '{s}': unrecognized format"
                ))
            }),
        other => Err(BuoyError::conversion(format!(
            "cannot convert {} value '{other}' to timestamp",
            other.type_name()
        ))),
    }
}

fn to_boolean(value: Value) -> Result<bool, BuoyError> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Int(i) => Ok(i != 0),
        Value::Text(ref s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "1" => Ok(true),
            "false" | "f" | "0" => Ok(false),
            _ => Err(BuoyError::conversion(format!("'{s}' is not a boolean"))),
        },
        other => Err(BuoyError::conversion(format!(
            "cannot convert {} value '{other}' to boolean",
            other.type_name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce(Value::Int(5), &ColumnKind::Integer).unwrap(), Value::Int(5));
        assert_eq!(
            coerce(Value::Text(" 42 ".into()), &ColumnKind::Integer).unwrap(),
            Value::Int(42)
        );
        assert_eq!(coerce(Value::Float(3.0), &ColumnKind::Integer).unwrap(), Value::Int(3));
        assert_eq!(coerce(Value::Bool(true), &ColumnKind::Integer).unwrap(), Value::Int(1));
        assert!(coerce(Value::Float(3.5), &ColumnKind::Integer).is_err());
        assert!(coerce(Value::Text("forty".into()), &ColumnKind::Integer).is_err());
    }

    #[test]
    fn test_coerce_out_of_range_float_is_rejected() {
        assert!(matches!(
            coerce(Value::Float(1e20), &ColumnKind::Integer),
            Err(BuoyError::Conversion(_))
        ));
        assert!(coerce(Value::Float(-1e19), &ColumnKind::Integer).is_err());
        assert!(coerce(Value::Float(f64::INFINITY), &ColumnKind::Integer).is_err());
        assert_eq!(
            coerce(Value::Float(-9_007_199_254_740_992.0), &ColumnKind::Integer).unwrap(),
            Value::Int(-9_007_199_254_740_992)
        );
    }

    #[test]
    fn test_coerce_text_accepts_anything() {
        assert_eq!(coerce(Value::Int(7), &ColumnKind::Text).unwrap(), Value::Text("7".into()));
        assert_eq!(
            coerce(Value::Bool(false), &ColumnKind::Text).unwrap(),
            Value::Text("false".into())
        );
    }

    #[test]
    fn test_coerce_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 31)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        for raw in ["2025-01-31 14:30:00", "2025-01-31T14:30:00", "2025-01-31 14:30:00.000"] {
            assert_eq!(
                coerce(Value::Text(raw.into()), &ColumnKind::Timestamp).unwrap(),
                Value::Timestamp(expected),
                "format {raw}"
            );
        }
        assert!(coerce(Value::Text("31/01/2025".into()), &ColumnKind::Timestamp).is_err());
        assert!(coerce(Value::Int(0), &ColumnKind::Timestamp).is_err());
    }

    #[test]
    fn test_coerce_boolean() {
        assert_eq!(
            coerce(Value::Text("t".into()), &ColumnKind::Boolean).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(coerce(Value::Int(0), &ColumnKind::Boolean).unwrap(), Value::Bool(false));
        assert!(coerce(Value::Text("maybe".into()), &ColumnKind::Boolean).is_err());
    }

    #[test]
    fn test_coerce_enum_by_name() {
        let kind = ColumnKind::Enum(&["GP", "BLOOD"]);
        assert_eq!(
            coerce(Value::Text("BLOOD".into()), &kind).unwrap(),
            Value::Text("BLOOD".into())
        );
        assert!(matches!(
            coerce(Value::Text("blood".into()), &kind),
            Err(BuoyError::Conversion(_))
        ));
        assert!(coerce(Value::Int(1), &kind).is_err());
    }

    #[test]
    fn test_coerce_null_passthrough() {
        assert_eq!(coerce(Value::Null, &ColumnKind::Integer).unwrap(), Value::Null);
    }
}
