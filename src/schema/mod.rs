//! Schema registry: per-entity table and column metadata
//!
//! - [`ColumnDescriptor`] / [`ColumnKind`] - one column and its SQL type
//! - [`TableBuilder`] / [`TableDescriptor`] - declaration and frozen form
//! - [`table_of`] - cached lookup by entity type

pub mod column;
pub mod registry;
pub mod table;

pub use column::{ColumnDescriptor, ColumnKind};
pub use registry::{table_of, SchemaRegistry};
pub use table::{TableBuilder, TableDescriptor};
