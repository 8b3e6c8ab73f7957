//! Insert, read back, update and delete through `DatabaseManager` against
//! the scripted connector.

mod common;

use chrono::NaiveDate;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::FirstName;
use fake::Fake;
use lifebuoy::test_helpers::{MockConnector, MockFailure};
use lifebuoy::tests_cfg::{Checkup, CheckupKind, Patient};
use lifebuoy::{BuoyError, DatabaseManager, Row, SelectOptions};

fn random_patient() -> Patient {
    Patient {
        first_name: FirstName().fake(),
        age: (18..90).fake::<i32>(),
        email: SafeEmail().fake(),
        ..Default::default()
    }
}

#[test]
fn test_inserted_patient_reads_back_equal() {
    common::init_logs();
    let db = MockConnector::new();
    let manager = DatabaseManager::new(db.clone());

    let patient = random_patient();
    db.on_scalar("INSERT INTO patients", 12);
    let id = manager.insert(&patient).unwrap();
    assert_eq!(id, 12);

    let insert = db.statements().pop().unwrap();
    assert!(!insert.contains("(id,"), "{insert}");
    assert!(insert.ends_with("RETURNING id;"), "{insert}");

    db.on_query("SELECT * FROM patients", vec![common::stored_row(&patient, id)]);
    let all: Vec<Patient> = manager.get_all().unwrap();
    assert_eq!(all, vec![Patient { id: 12, ..patient }]);
}

#[test]
fn test_enum_and_timestamp_survive_round_trip() {
    let db = MockConnector::new();
    let manager = DatabaseManager::new(db.clone());
    let checkup = Checkup {
        patient_id: 3,
        date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap().and_hms_opt(8, 30, 0).unwrap(),
        notes: "O'Brien referred".into(),
        kind: CheckupKind::BLOOD,
        ..Default::default()
    };

    db.on_scalar("INSERT INTO checkups", 40);
    manager.insert(&checkup).unwrap();
    assert_eq!(
        db.statements(),
        vec![
            "INSERT INTO checkups (patient_id, checkup_date, doctor_notes, checkup_type) \
             VALUES (3, '2025-03-14 08:30:00', 'O''Brien referred', 'BLOOD') RETURNING id;"
        ]
    );

    db.on_query("WHERE patient_id = 3", vec![common::stored_row(&checkup, 40)]);
    let found: Vec<Checkup> = manager
        .get_with_filter(&SelectOptions::new().filter("patient_id", 3))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, CheckupKind::BLOOD);
    assert_eq!(found[0].notes, "O'Brien referred");
    assert_eq!(found[0].date, checkup.date);
}

#[test]
fn test_update_then_delete_by_key() {
    let db = MockConnector::new();
    let manager = DatabaseManager::new(db.clone());
    let mut patient = Patient { id: 9, ..random_patient() };
    patient.age = 50;

    manager.update(&patient).unwrap();
    manager.delete(&patient).unwrap();

    let statements = db.statements();
    assert!(statements[0].starts_with("UPDATE patients SET first_name = "));
    assert!(statements[0].contains("age = 50"));
    assert!(statements[0].ends_with("WHERE id = 9;"));
    assert_eq!(statements[1], "DELETE FROM patients WHERE id = 9;");
}

#[test]
fn test_duplicate_email_surfaces_constraint_violation() {
    let db = MockConnector::new();
    db.fail_on("INSERT INTO patients", MockFailure::ConstraintViolation);
    let err = DatabaseManager::new(db).insert(&random_patient()).unwrap_err();
    match err {
        BuoyError::ConstraintViolation { code, .. } => assert_eq!(code, "23505"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_enum_name_fails_mapping() {
    let db = MockConnector::new();
    let row = Row::new()
        .with("id", 1)
        .with("patient_id", 3)
        .with("checkup_date", "2025-03-14 08:30:00")
        .with("doctor_notes", "")
        .with("checkup_type", "PHYSIO");
    db.on_query("FROM checkups", vec![row]);
    let err = DatabaseManager::new(db).get_all::<Checkup>().unwrap_err();
    assert!(matches!(err, BuoyError::Conversion(_)), "{err}");
}
