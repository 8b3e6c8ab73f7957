//! Entity trait for declaring and accessing mapped records
//!
//! An entity is a plain struct whose table and columns are declared once
//! through [`Entity::declare`]. The engine reads and writes fields by column
//! name at runtime, so no derive or reflection is needed.

use crate::error::BuoyError;
use crate::schema::TableBuilder;
use crate::value::Value;

/// Trait implemented by every mapped record type
///
/// # Example
///
/// ```
/// use lifebuoy::{BuoyError, ColumnDescriptor, Entity, TableBuilder, Value};
///
/// #[derive(Debug, Clone, Default)]
/// struct Ward {
///     id: i32,
///     label: String,
/// }
///
/// impl Entity for Ward {
///     fn declare() -> TableBuilder {
///         TableBuilder::new()
///             .table("wards")
///             .column(ColumnDescriptor::of::<i32>("id").primary_key())
///             .column(ColumnDescriptor::of::<String>("label"))
///     }
///
///     fn get(&self, column: &str) -> Option<Value> {
///         match column {
///             "id" => Some(self.id.into()),
///             "label" => Some(self.label.clone().into()),
///             _ => None,
///         }
///     }
///
///     fn set(&mut self, column: &str, value: Value) -> Result<(), BuoyError> {
///         match column {
///             "id" => self.id = value.decode()?,
///             "label" => self.label = value.decode()?,
///             _ => return Err(BuoyError::unknown_column("wards", column)),
///         }
///         Ok(())
///     }
/// }
///
/// let mut ward = Ward::default();
/// ward.set("label", Value::from("East")).unwrap();
/// assert_eq!(ward.get("label"), Some(Value::from("East")));
/// ```
pub trait Entity: Default + Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Table and column declaration for this type.
    ///
    /// Called once per type; the result is cached by the
    /// [schema registry](crate::schema::table_of).
    fn declare() -> TableBuilder;

    /// Current value of the field mapped to `column`, `None` if unmapped
    fn get(&self, column: &str) -> Option<Value>;

    /// Store an already-coerced value into the field mapped to `column`
    ///
    /// Returns [`BuoyError::UnknownColumn`] for names the entity does not map.
    fn set(&mut self, column: &str, value: Value) -> Result<(), BuoyError>;
}
