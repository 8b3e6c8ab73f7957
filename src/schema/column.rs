//! Column descriptors and SQL type inference.

use crate::value::ValueType;

/// Declared value kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Text,
    Timestamp,
    Boolean,
    /// Enumeration stored as text, with its symbolic names in declaration order
    Enum(&'static [&'static str]),
}

impl ColumnKind {
    /// SQL type used when the column declares no explicit db type.
    ///
    /// Only integer, text and timestamp have a dedicated mapping; every other
    /// kind (booleans and enumerations included) is stored as `TEXT`.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "INT",
            ColumnKind::Text => "VARCHAR(255)",
            ColumnKind::Timestamp => "TIMESTAMP",
            ColumnKind::Boolean | ColumnKind::Enum(_) => "TEXT",
        }
    }
}

/// Column metadata
///
/// Built alongside the entity type with the builder methods below and frozen
/// once the owning [`TableDescriptor`](super::TableDescriptor) is registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    name: String,
    kind: ColumnKind,
    nullable: bool,
    unique: bool,
    default_value: Option<String>,
    primary_key: bool,
    auto_increment: bool,
    db_type: Option<String>,
}

impl ColumnDescriptor {
    /// Create a nullable, non-unique column of the given kind
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: true,
            unique: false,
            default_value: None,
            primary_key: false,
            auto_increment: false,
            db_type: None,
        }
    }

    /// Create a column whose kind is inferred from the field type
    ///
    /// ```
    /// use lifebuoy::{ColumnDescriptor, ColumnKind};
    ///
    /// let age = ColumnDescriptor::of::<i32>("age");
    /// assert_eq!(age.kind(), ColumnKind::Integer);
    /// ```
    pub fn of<T: ValueType>(name: impl Into<String>) -> Self {
        Self::new(name, T::KIND)
    }

    /// Mark as the primary key (auto-increment unless told otherwise)
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.auto_increment = true;
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn auto_increment(mut self, auto_increment: bool) -> Self {
        self.auto_increment = auto_increment;
        self
    }

    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Default literal, emitted verbatim (quote text literals yourself: `"'GP'"`)
    #[must_use]
    pub fn default_value(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }

    /// Explicit db type overriding [`ColumnKind::sql_type`]
    #[must_use]
    pub fn db_type(mut self, db_type: impl Into<String>) -> Self {
        self.db_type = Some(db_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn default_literal(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn explicit_db_type(&self) -> Option<&str> {
        self.db_type.as_deref()
    }

    /// Explicit db type if declared, otherwise the inferred one
    pub fn sql_type(&self) -> &str {
        self.db_type.as_deref().unwrap_or_else(|| self.kind.sql_type())
    }
}
