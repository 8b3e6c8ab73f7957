//! # Lifebuoy
//!
//! Lightweight object mapper for PostgreSQL on `may_postgres`.
//!
//! Entities declare their table once through [`Entity::declare`]; the crate
//! then generates literal SQL for CRUD and filtered selects, maps rows back
//! into entities, rebuilds parent/child trees from joined rows, groups work
//! in transactions and tracks named migrations in a ledger table.
//!
//! ```no_run
//! use lifebuoy::{DatabaseConfig, DatabaseManager};
//! use lifebuoy::tests_cfg::{Checkup, Patient, Prescription};
//!
//! let db = DatabaseManager::from_config(&DatabaseConfig::load()?)?;
//! db.create_table::<Patient>()?;
//!
//! let patient: Option<Patient> =
//!     db.get_eager_joined::<Patient, Checkup, Prescription>(1, "patient_id", "patient_id")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod manager;
pub mod mapper;
pub mod metrics;
pub mod migration;
pub mod model;
pub mod query;
pub mod relation;
pub mod schema;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
#[cfg(any(test, feature = "test-helpers"))]
pub mod tests_cfg;
pub mod transaction;
pub mod value;

pub use config::DatabaseConfig;
pub use connection::{ConnectionError, PgConnector};
pub use error::BuoyError;
pub use executor::{Connection, Connector, Executor, PgConnection};
pub use manager::DatabaseManager;
pub use mapper::{map_row, map_rows};
pub use migration::{
    AutoMigrateReport, MigrationLedger, MigrationOutcome, MigrationRecord, OrphanedColumn,
};
pub use model::Entity;
pub use query::SelectOptions;
pub use relation::Related;
pub use schema::{table_of, ColumnDescriptor, ColumnKind, TableBuilder, TableDescriptor};
pub use transaction::{execute_transaction, run_in_transaction, Transaction};
pub use value::{Row, Value, ValueType};
