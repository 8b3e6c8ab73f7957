//! `Value` and the `ValueType` trait for type-safe field conversions
//!
//! `Value` is the raw scalar carried by a result [`Row`](super::Row) and the
//! input to SQL literal formatting. `ValueType` maps Rust field types onto it:
//!
//! - Integer types: `i16`, `i32`, `i64`
//! - Boolean: `bool`
//! - String: `String`
//! - Timestamp: `chrono::NaiveDateTime`
//! - Enumerations declared with [`column_enum!`](crate::column_enum)
//! - `Option<T>` for all of the above

use crate::error::BuoyError;
use crate::schema::ColumnKind;
use chrono::NaiveDateTime;
use std::fmt;

/// Format used for timestamps in SQL literals and textual conversions.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A raw scalar value as produced by an executor or read from an entity.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL `NULL`
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Whether this value represents SQL `NULL`
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Textual form used by coercion and enum parsing.
    ///
    /// Returns `None` for `NULL`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Timestamp(ts) => Some(ts.format(TIMESTAMP_FORMAT).to_string()),
        }
    }

    /// Short name of the variant, used in conversion error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
        }
    }

    /// Decode this value into a field type.
    pub fn decode<T: ValueType>(self) -> Result<T, BuoyError> {
        T::from_value(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(text) => f.write_str(&text),
            None => f.write_str("NULL"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Trait for mapping Rust field types to and from [`Value`].
///
/// `KIND` is the column kind inferred for a field of this type when a
/// [`ColumnDescriptor`](crate::schema::ColumnDescriptor) is declared with
/// `ColumnDescriptor::of::<T>()`.
///
/// `from_value` expects a value already coerced to `KIND` by the row mapper;
/// it does not repeat the lenient coercion rules.
pub trait ValueType: Sized {
    /// Column kind used for schema generation and row coercion
    const KIND: ColumnKind;

    /// Convert this field value into a [`Value`]
    fn into_value(self) -> Value;

    /// Convert a [`Value`] into this field type
    fn from_value(value: Value) -> Result<Self, BuoyError>;
}

fn mismatch<T>(expected: &str, value: &Value) -> Result<T, BuoyError> {
    Err(BuoyError::conversion(format!(
        "expected {expected}, found {} value '{value}'",
        value.type_name()
    )))
}

impl ValueType for i16 {
    const KIND: ColumnKind = ColumnKind::Integer;

    fn into_value(self) -> Value {
        Value::from(self)
    }

    fn from_value(value: Value) -> Result<Self, BuoyError> {
        match value {
            Value::Int(v) => i16::try_from(v)
                .map_err(|_| BuoyError::conversion(format!("{v} is out of range for i16"))),
            other => mismatch("integer", &other),
        }
    }
}

impl ValueType for i32 {
    const KIND: ColumnKind = ColumnKind::Integer;

    fn into_value(self) -> Value {
        Value::from(self)
    }

    fn from_value(value: Value) -> Result<Self, BuoyError> {
        match value {
            Value::Int(v) => i32::try_from(v)
                .map_err(|_| BuoyError::conversion(format!("{v} is out of range for i32"))),
            other => mismatch("integer", &other),
        }
    }
}

impl ValueType for i64 {
    const KIND: ColumnKind = ColumnKind::Integer;

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: Value) -> Result<Self, BuoyError> {
        match value {
            Value::Int(v) => Ok(v),
            other => mismatch("integer", &other),
        }
    }
}

impl ValueType for bool {
    const KIND: ColumnKind = ColumnKind::Boolean;

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: Value) -> Result<Self, BuoyError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => mismatch("boolean", &other),
        }
    }
}

impl ValueType for String {
    const KIND: ColumnKind = ColumnKind::Text;

    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: Value) -> Result<Self, BuoyError> {
        match value {
            Value::Text(v) => Ok(v),
            other => mismatch("text", &other),
        }
    }
}

impl ValueType for NaiveDateTime {
    const KIND: ColumnKind = ColumnKind::Timestamp;

    fn into_value(self) -> Value {
        Value::Timestamp(self)
    }

    fn from_value(value: Value) -> Result<Self, BuoyError> {
        match value {
            Value::Timestamp(v) => Ok(v),
            other => mismatch("timestamp", &other),
        }
    }
}

impl<T: ValueType> ValueType for Option<T> {
    const KIND: ColumnKind = T::KIND;

    fn into_value(self) -> Value {
        self.map_or(Value::Null, ValueType::into_value)
    }

    fn from_value(value: Value) -> Result<Self, BuoyError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

/// Parse an enumeration value by its symbolic name.
///
/// Matching is exact and case-sensitive; ordinals are not accepted.
pub fn parse_enum_name<'a>(value: &Value, names: &[&'a str]) -> Result<&'a str, BuoyError> {
    let text = value
        .to_text()
        .ok_or_else(|| BuoyError::conversion("cannot parse an enumeration from NULL"))?;
    names
        .iter()
        .copied()
        .find(|name| *name == text)
        .ok_or_else(|| {
            BuoyError::conversion(format!(
                "'{text}' is not one of the symbolic names [{}]",
                names.join(", ")
            ))
        })
}

/// Declare an enumeration stored as text by its symbolic variant names.
///
/// The first variant is the `Default`.
///
/// ```
/// lifebuoy::column_enum! {
///     pub enum Shift { Day, Night }
/// }
///
/// assert_eq!(Shift::default(), Shift::Day);
/// assert_eq!(Shift::Night.name(), "Night");
/// assert_eq!(Shift::from_name("Day"), Some(Shift::Day));
/// ```
#[macro_export]
macro_rules! column_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident { $first:ident $(, $variant:ident)* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $name {
            #[default]
            $first,
            $($variant,)*
        }

        impl $name {
            /// Symbolic names in declaration order
            pub const NAMES: &'static [&'static str] =
                &[stringify!($first) $(, stringify!($variant))*];

            /// Symbolic name of this variant
            pub fn name(&self) -> &'static str {
                match self {
                    Self::$first => stringify!($first),
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            /// Variant with exactly this symbolic name
            pub fn from_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    stringify!($first) => ::std::option::Option::Some(Self::$first),
                    $(stringify!($variant) => ::std::option::Option::Some(Self::$variant),)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl $crate::ValueType for $name {
            const KIND: $crate::ColumnKind = $crate::ColumnKind::Enum(Self::NAMES);

            fn into_value(self) -> $crate::Value {
                $crate::Value::Text(self.name().to_string())
            }

            fn from_value(value: $crate::Value) -> ::std::result::Result<Self, $crate::BuoyError> {
                let name = $crate::value::parse_enum_name(&value, Self::NAMES)?;
                Self::from_name(name).ok_or_else(|| {
                    $crate::BuoyError::conversion(format!(
                        "unknown {} '{}'",
                        stringify!($name),
                        name
                    ))
                })
            }
        }
    };
}
