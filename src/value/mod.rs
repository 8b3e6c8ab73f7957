//! Value type system for lifebuoy
//!
//! - **`Value`** - raw scalar carried by rows and SQL literals
//! - **`Row`** - ordered column-name → value mapping returned by executors
//! - **`ValueType`** - maps Rust field types onto `Value`
//! - **`coerce`** - lenient conversion of a raw value into a column kind

pub mod coerce;
pub mod row;
pub mod types;

pub use coerce::coerce;
pub use row::Row;
pub use types::{parse_enum_name, Value, ValueType, TIMESTAMP_FORMAT};
