//! Migration ledger
//!
//! Named migrations are recorded in a `migrations` table created on demand:
//!
//! - [`MigrationLedger::apply_migration`] runs SQL once per name
//! - [`MigrationLedger::rollback_last_migration`] undoes the latest one
//! - [`MigrationLedger::auto_migrate`] adds declared columns missing from the
//!   live table and offers to drop orphaned ones
//!
//! The ledger's own statements are built with `sea_query`.

pub mod auto;
pub mod ledger;
pub mod record;
pub mod state_table;

pub use auto::{live_columns_sql, AutoMigrateReport, OrphanedColumn};
pub use ledger::{ensure_ledger, is_applied, MigrationLedger, MigrationOutcome};
pub use record::MigrationRecord;
pub use state_table::{CREATE_LEDGER_SQL, LEDGER_TABLE};
