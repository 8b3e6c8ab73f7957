//! Ledger workflow: apply, re-apply, auto-migrate, roll back.

mod common;

use lifebuoy::migration::CREATE_LEDGER_SQL;
use lifebuoy::test_helpers::MockConnector;
use lifebuoy::tests_cfg::Patient;
use lifebuoy::{MigrationLedger, MigrationOutcome, Row};

const FIND: &str = r#"SELECT "name" FROM "migrations""#;
const LATEST: &str = r#"ORDER BY "executed_at" DESC"#;
const CATALOG: &str = "information_schema.columns";

fn live(columns: &[&str]) -> Vec<Row> {
    columns.iter().map(|c| Row::new().with("column_name", *c)).collect()
}

#[test]
fn test_second_apply_is_skipped() {
    common::init_logs();
    let db = MockConnector::new();
    let ledger = MigrationLedger::new(db.clone());
    let sql = "CREATE INDEX idx_patients_email ON patients (email);";

    assert_eq!(
        ledger.apply_migration("003_email_idx", sql, true).unwrap(),
        MigrationOutcome::Applied
    );
    db.on_query(FIND, vec![Row::new().with("name", "003_email_idx")]);
    assert_eq!(
        ledger.apply_migration("003_email_idx", sql, true).unwrap(),
        MigrationOutcome::AlreadyApplied
    );

    assert_eq!(db.count(sql), 1);
    assert_eq!(db.count(CREATE_LEDGER_SQL), 2);
}

#[test]
fn test_rollback_with_nothing_applied() {
    let db = MockConnector::new();
    let rolled = MigrationLedger::new(db.clone())
        .rollback_last_migration("DROP INDEX idx_patients_email;")
        .unwrap();
    assert!(rolled.is_none());
    assert_eq!(db.count("DROP INDEX"), 0);
}

#[test]
fn test_auto_migrate_adds_and_drops_with_confirmation() {
    let db = MockConnector::new();
    db.on_query(CATALOG, live(&["id", "first_name", "email", "legacy_code", "clinic_id"]));
    let report = MigrationLedger::new(db.clone())
        .auto_migrate::<Patient, _>(&["clinic_id"], |_| true)
        .unwrap();

    assert_eq!(report.added, vec!["age"]);
    assert_eq!(report.dropped, vec!["legacy_code"]);
    assert_eq!(report.orphaned.len(), 1);
    assert_eq!(report.orphaned[0].table, "patients");

    assert_eq!(db.count("ALTER TABLE patients ADD COLUMN IF NOT EXISTS age INT;"), 1);
    assert_eq!(db.count("ALTER TABLE patients DROP COLUMN IF EXISTS legacy_code;"), 1);
    assert_eq!(db.count("'AutoAdd_patients_age'"), 1);
    assert_eq!(db.count("'AutoDrop_patients_legacy_code'"), 1);
    assert_eq!(db.count("clinic_id"), 0);
}

#[test]
fn test_auto_migrate_then_roll_back_latest() {
    let db = MockConnector::new();
    db.on_query(CATALOG, live(&["id", "first_name", "email"]));
    let ledger = MigrationLedger::new(db.clone());
    ledger.auto_migrate::<Patient, _>(&[], |_| false).unwrap();

    db.on_query(
        LATEST,
        vec![Row::new()
            .with("id", 1)
            .with("name", "AutoAdd_patients_age")
            .with("executed_at", "2025-06-01 12:00:00")],
    );
    let rolled = ledger
        .rollback_last_migration("ALTER TABLE patients DROP COLUMN age;")
        .unwrap();
    assert_eq!(rolled.as_deref(), Some("AutoAdd_patients_age"));
    assert_eq!(db.count("ALTER TABLE patients DROP COLUMN age;"), 1);
    assert_eq!(db.count(r#"DELETE FROM "migrations""#), 1);
}
