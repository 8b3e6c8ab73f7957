//! Migration ledger: apply, roll back and list named migrations
//!
//! State per migration name: `Unapplied → Applied`. Only the most recently
//! applied migration (by `executed_at`) can be rolled back.

use super::record::MigrationRecord;
use super::state_table::{
    delete_record, find_by_name, insert_record, latest_record, list_records, CREATE_LEDGER_SQL,
};
use crate::error::BuoyError;
use crate::executor::{Connection, Connector, Executor};
use crate::transaction::run_in_transaction;

/// Result of [`MigrationLedger::apply_migration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// SQL ran (unless skipped) and the name was recorded
    Applied,
    /// The name was already recorded; nothing ran
    AlreadyApplied,
}

/// Tracks applied migrations in the `migrations` table.
///
/// Every call opens its own connection through the connector.
///
/// ```no_run
/// use lifebuoy::{MigrationLedger, MigrationOutcome, PgConnector};
///
/// let ledger = MigrationLedger::new(PgConnector::new("host=localhost dbname=clinic")?);
/// let outcome = ledger.apply_migration(
///     "002_add_phone",
///     "ALTER TABLE patients ADD COLUMN phone VARCHAR(20);",
///     true,
/// )?;
/// assert_eq!(outcome, MigrationOutcome::Applied);
///
/// ledger.rollback_last_migration("ALTER TABLE patients DROP COLUMN phone;")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct MigrationLedger<C: Connector> {
    connector: C,
}

impl<C: Connector> MigrationLedger<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Run `sql` and record `name`, unless `name` is already recorded.
    ///
    /// With `execute_sql = false` only the ledger row is written; the caller
    /// has already applied the change. The SQL and the ledger insert commit
    /// together or not at all.
    pub fn apply_migration(
        &self,
        name: &str,
        sql: &str,
        execute_sql: bool,
    ) -> Result<MigrationOutcome, BuoyError> {
        let conn = self.connector.connect()?;
        apply_on(&conn, name, sql, execute_sql)
    }

    /// Undo the most recently applied migration.
    ///
    /// Runs `undo_sql` and deletes the ledger row in one transaction.
    /// Returns the name rolled back, or `None` if the ledger is empty.
    pub fn rollback_last_migration(&self, undo_sql: &str) -> Result<Option<String>, BuoyError> {
        let conn = self.connector.connect()?;
        ensure_ledger(&conn)?;

        let latest = conn
            .query_all(&latest_record())?
            .first()
            .map(MigrationRecord::from_row)
            .transpose()?;
        let Some(record) = latest else {
            log::info!("No migrations found to roll back");
            return Ok(None);
        };

        let delete = delete_record(&record.name);
        run_in_transaction(&conn, |tx| {
            tx.execute_batch(undo_sql)?;
            tx.execute(&delete)?;
            Ok(())
        })?;
        log::info!("Rolled back migration {}", record.name);
        Ok(Some(record.name))
    }

    /// Every recorded migration, oldest first
    pub fn applied_migrations(&self) -> Result<Vec<MigrationRecord>, BuoyError> {
        let conn = self.connector.connect()?;
        ensure_ledger(&conn)?;
        conn.query_all(&list_records())?
            .iter()
            .map(MigrationRecord::from_row)
            .collect()
    }
}

/// Create the ledger table if it does not exist
pub fn ensure_ledger(executor: &impl Executor) -> Result<(), BuoyError> {
    executor.execute(CREATE_LEDGER_SQL).map(|_| ())
}

/// Whether `name` is recorded in the ledger
pub fn is_applied(executor: &impl Executor, name: &str) -> Result<bool, BuoyError> {
    Ok(!executor.query_all(&find_by_name(name))?.is_empty())
}

/// [`MigrationLedger::apply_migration`] on an already open connection
pub(crate) fn apply_on<K: Connection>(
    conn: &K,
    name: &str,
    sql: &str,
    execute_sql: bool,
) -> Result<MigrationOutcome, BuoyError> {
    ensure_ledger(conn)?;
    if is_applied(conn, name)? {
        log::info!("Migration {name} already applied, skipping");
        return Ok(MigrationOutcome::AlreadyApplied);
    }

    let insert = insert_record(name)?;
    run_in_transaction(conn, |tx| {
        if execute_sql {
            tx.execute_batch(sql)?;
        }
        tx.execute(&insert)?;
        Ok(())
    })
    .map_err(|e| {
        log::warn!("Migration {name} failed: {e}");
        e
    })?;

    if execute_sql {
        log::info!("Applied migration {name}");
    } else {
        log::info!("Recorded migration {name}");
    }
    Ok(MigrationOutcome::Applied)
}
