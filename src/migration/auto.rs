//! Auto-migration: diff an entity declaration against the live table.
//!
//! Column names are compared case-insensitively (PostgreSQL folds unquoted
//! identifiers to lower case) but written verbatim into the generated DDL.

use super::ledger::{apply_on, ensure_ledger, MigrationLedger};
use crate::error::BuoyError;
use crate::executor::{Connector, Executor};
use crate::model::Entity;
use crate::query::format::quote;
use crate::schema::table_of;

/// Live column that no longer has a declared counterpart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedColumn {
    pub table: String,
    pub column: String,
}

/// What [`MigrationLedger::auto_migrate`] changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoMigrateReport {
    /// Declared columns added to the live table
    pub added: Vec<String>,
    /// Live columns missing from the declaration
    pub orphaned: Vec<OrphanedColumn>,
    /// Orphaned columns the caller confirmed and that were dropped
    pub dropped: Vec<String>,
}

impl AutoMigrateReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.orphaned.is_empty()
    }
}

/// Catalog query listing the live columns of `table`
pub fn live_columns_sql(table: &str) -> String {
    format!(
        "SELECT column_name FROM information_schema.columns WHERE table_name = {};",
        quote(&table.to_lowercase())
    )
}

impl<C: Connector> MigrationLedger<C> {
    /// Bring the live table for `E` in line with its declaration.
    ///
    /// - declared columns missing live are added with
    ///   `ALTER TABLE .. ADD COLUMN IF NOT EXISTS` and recorded as
    ///   `AutoAdd_<table>_<column>`
    /// - live columns not declared (other than the primary key and the
    ///   `keep` list, typically foreign keys) are reported as orphaned; each
    ///   one `confirm` accepts is dropped and recorded as `AutoDrop_<table>_<column>`
    ///
    /// # Errors
    ///
    /// [`BuoyError::MissingTable`] when the table has no live columns.
    pub fn auto_migrate<E, F>(
        &self,
        keep: &[&str],
        mut confirm: F,
    ) -> Result<AutoMigrateReport, BuoyError>
    where
        E: Entity,
        F: FnMut(&OrphanedColumn) -> bool,
    {
        let table = table_of::<E>()?;
        let conn = self.connector().connect()?;
        ensure_ledger(&conn)?;

        let live: Vec<String> = conn
            .query_all(&live_columns_sql(table.name()))?
            .iter()
            .filter_map(|row| row.first().and_then(|v| v.to_text()))
            .collect();
        if live.is_empty() {
            return Err(BuoyError::MissingTable(table.name().to_string()));
        }
        let live_lower: Vec<String> = live.iter().map(|c| c.to_lowercase()).collect();

        let mut report = AutoMigrateReport::default();

        for column in table.columns() {
            if live_lower.contains(&column.name().to_lowercase()) {
                continue;
            }
            let sql = format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {};",
                table.name(),
                column.name(),
                column.sql_type()
            );
            conn.execute(&sql)?;
            apply_on(&conn, &format!("AutoAdd_{}_{}", table.name(), column.name()), &sql, false)?;
            log::info!("Auto-migration added column {} to {}", column.name(), table.name());
            report.added.push(column.name().to_string());
        }

        let declared: Vec<String> =
            table.columns().iter().map(|c| c.name().to_lowercase()).collect();
        let pk = table.primary_key().map(|c| c.name().to_lowercase());
        let kept: Vec<String> = keep.iter().map(|c| c.to_lowercase()).collect();

        for (column, lower) in live.iter().zip(&live_lower) {
            if declared.contains(lower) || pk.as_ref() == Some(lower) || kept.contains(lower) {
                continue;
            }
            let orphan = OrphanedColumn {
                table: table.name().to_string(),
                column: column.clone(),
            };
            log::warn!("Orphaned column {} found in {}", orphan.column, orphan.table);

            if confirm(&orphan) {
                let sql = format!("ALTER TABLE {} DROP COLUMN IF EXISTS {};", table.name(), column);
                conn.execute(&sql)?;
                apply_on(&conn, &format!("AutoDrop_{}_{}", table.name(), column), &sql, false)?;
                log::info!("Auto-migration dropped column {} from {}", column, table.name());
                report.dropped.push(column.clone());
            }
            report.orphaned.push(orphan);
        }

        Ok(report)
    }
}
