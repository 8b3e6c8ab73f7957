//! Table descriptors and the declaration builder.

use super::column::ColumnDescriptor;
use crate::error::BuoyError;

/// Table-level metadata for one entity type: name plus ordered columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    name: String,
    columns: Vec<ColumnDescriptor>,
    primary_key: Option<usize>,
}

impl TableDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in declaration order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name() == name)
    }

    pub fn primary_key(&self) -> Option<&ColumnDescriptor> {
        self.primary_key.map(|index| &self.columns[index])
    }

    /// The primary key, or `MissingMetadata` when none is declared.
    pub fn require_primary_key(&self) -> Result<&ColumnDescriptor, BuoyError> {
        self.primary_key().ok_or_else(|| {
            BuoyError::missing_metadata(format!(
                "table '{}' declares no primary key column",
                self.name
            ))
        })
    }

    /// Columns written by INSERT and UPDATE (everything but the key)
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|column| !column.is_primary_key())
    }
}

/// Declaration of an entity's table, returned by [`Entity::declare`](crate::Entity::declare).
///
/// ```
/// use lifebuoy::{ColumnDescriptor, TableBuilder};
///
/// let table = TableBuilder::new()
///     .table("wards")
///     .column(ColumnDescriptor::of::<i32>("id").primary_key())
///     .column(ColumnDescriptor::of::<String>("label").not_null())
///     .build("Ward")
///     .unwrap();
/// assert_eq!(table.primary_key().unwrap().name(), "id");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    name: Option<String>,
    columns: Vec<ColumnDescriptor>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Freeze the declaration.
    ///
    /// `type_name` only feeds error messages. Fails with `MissingMetadata`
    /// when no table name was declared, when more than one column is marked
    /// as the key, or when a column name repeats.
    pub fn build(self, type_name: &str) -> Result<TableDescriptor, BuoyError> {
        let name = self.name.ok_or_else(|| {
            BuoyError::missing_metadata(format!("type {type_name} has no table declaration"))
        })?;

        let mut primary_key = None;
        for (index, column) in self.columns.iter().enumerate() {
            if self.columns[..index].iter().any(|c| c.name() == column.name()) {
                return Err(BuoyError::missing_metadata(format!(
                    "table '{name}' declares column '{}' twice",
                    column.name()
                )));
            }
            if column.is_primary_key() {
                if primary_key.is_some() {
                    return Err(BuoyError::missing_metadata(format!(
                        "table '{name}' declares more than one primary key column"
                    )));
                }
                primary_key = Some(index);
            }
        }

        Ok(TableDescriptor {
            name,
            columns: self.columns,
            primary_key,
        })
    }
}
