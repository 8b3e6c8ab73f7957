//! Loading a patient with both child lists, eagerly and lazily.

mod common;

use lifebuoy::mapper::alias;
use lifebuoy::relation::eager::{FIRST_CHILD_ALIAS, PARENT_ALIAS, SECOND_CHILD_ALIAS};
use lifebuoy::test_helpers::MockConnector;
use lifebuoy::tests_cfg::{Checkup, CheckupKind, Patient, Prescription};
use lifebuoy::{DatabaseManager, Entity, Row, Value};

fn patient() -> Patient {
    Patient {
        id: 4,
        first_name: "Ana".into(),
        age: 41,
        email: "ana@example.com".into(),
        ..Default::default()
    }
}

fn checkup(id: i32, kind: CheckupKind) -> Checkup {
    Checkup {
        id,
        patient_id: 4,
        notes: format!("visit {id}"),
        kind,
        ..Default::default()
    }
}

fn prescription(id: i32, medication: &str) -> Prescription {
    Prescription {
        id,
        patient_id: 4,
        medication: medication.into(),
        dosage: "1/day".into(),
        ..Default::default()
    }
}

/// Append `entity` under `prefix`, or nulls for every column when absent
fn push_side<E: Entity>(row: &mut Row, prefix: &str, entity: Option<&E>) {
    let template = common::stored_row(&E::default(), 0);
    for (column, _) in template.iter() {
        let value = entity
            .and_then(|e| e.get(column))
            .unwrap_or(Value::Null);
        row.push(alias(prefix, column), value);
    }
}

fn joined(checkup: Option<&Checkup>, prescription: Option<&Prescription>) -> Row {
    let mut row = Row::new();
    push_side(&mut row, PARENT_ALIAS, Some(&patient()));
    push_side(&mut row, FIRST_CHILD_ALIAS, checkup);
    push_side(&mut row, SECOND_CHILD_ALIAS, prescription);
    row
}

#[test]
fn test_two_by_three_fan_out_folds_to_distinct_children() {
    common::init_logs();
    let checkups = [checkup(10, CheckupKind::GP), checkup(11, CheckupKind::MRI)];
    let prescriptions = [
        prescription(20, "Ibuprofen"),
        prescription(21, "Amoxicillin"),
        prescription(22, "Cetirizine"),
    ];
    let rows: Vec<Row> = checkups
        .iter()
        .flat_map(|c| prescriptions.iter().map(move |p| joined(Some(c), Some(p))))
        .collect();
    assert_eq!(rows.len(), 6);

    let db = MockConnector::new();
    db.on_query("LEFT JOIN checkups c", rows);
    let loaded = DatabaseManager::new(db.clone())
        .get_eager_joined::<Patient, Checkup, Prescription>(4, "patient_id", "patient_id")
        .unwrap()
        .unwrap();

    assert_eq!(db.statements().len(), 1);
    assert_eq!(loaded.first_name, "Ana");
    assert_eq!(loaded.checkups, checkups.to_vec());
    assert_eq!(loaded.prescriptions, prescriptions.to_vec());
}

#[test]
fn test_parent_without_children_has_empty_lists() {
    let db = MockConnector::new();
    db.on_query("LEFT JOIN", vec![joined(None, None)]);
    let loaded = DatabaseManager::new(db)
        .get_eager_joined::<Patient, Checkup, Prescription>(4, "patient_id", "patient_id")
        .unwrap()
        .unwrap();
    assert!(loaded.checkups.is_empty());
    assert!(loaded.prescriptions.is_empty());
}

#[test]
fn test_unknown_parent_is_none() {
    let db = MockConnector::new();
    let loaded = DatabaseManager::new(db)
        .get_eager_joined::<Patient, Checkup, Prescription>(99, "patient_id", "patient_id")
        .unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_lazy_details_issue_two_queries() {
    let db = MockConnector::new();
    db.on_query("FROM patients WHERE id = 4", vec![common::stored_row(&patient(), 4)]);
    db.on_query(
        "FROM checkups WHERE patient_id = 4",
        vec![
            common::stored_row(&checkup(10, CheckupKind::EKG), 10),
            common::stored_row(&checkup(11, CheckupKind::ECHO), 11),
        ],
    );

    let loaded = DatabaseManager::new(db.clone())
        .get_entity_with_details::<Patient, Checkup>(4, "patient_id")
        .unwrap()
        .unwrap();
    assert_eq!(
        db.statements(),
        vec![
            "SELECT * FROM patients WHERE id = 4;",
            "SELECT * FROM checkups WHERE patient_id = 4;",
        ]
    );
    assert_eq!(loaded.checkups.len(), 2);
    assert_eq!(loaded.checkups[1].kind, CheckupKind::ECHO);
    assert!(loaded.prescriptions.is_empty());
}
