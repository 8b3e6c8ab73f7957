//! An entity declared outside the crate, written in one transaction.

mod common;

use lifebuoy::query::{create_table_sql, insert_with, select_sql};
use lifebuoy::test_helpers::MockConnector;
use lifebuoy::{
    column_enum, BuoyError, ColumnDescriptor, DatabaseManager, Entity, SelectOptions, TableBuilder,
    Value,
};

column_enum! {
    pub enum Shift { Day, Night }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Nurse {
    id: i64,
    name: String,
    on_call: bool,
    shift: Shift,
}

impl Entity for Nurse {
    fn declare() -> TableBuilder {
        TableBuilder::new()
            .table("nurses")
            .column(ColumnDescriptor::of::<i64>("id").primary_key().db_type("BIGSERIAL"))
            .column(ColumnDescriptor::of::<String>("name").not_null())
            .column(ColumnDescriptor::of::<bool>("on_call"))
            .column(ColumnDescriptor::of::<Shift>("shift").default_value("'Day'"))
    }

    fn get(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "on_call" => Some(self.on_call.into()),
            "shift" => Some(lifebuoy::ValueType::into_value(self.shift)),
            _ => None,
        }
    }

    fn set(&mut self, column: &str, value: Value) -> Result<(), BuoyError> {
        match column {
            "id" => self.id = value.decode()?,
            "name" => self.name = value.decode()?,
            "on_call" => self.on_call = value.decode()?,
            "shift" => self.shift = value.decode()?,
            _ => return Err(BuoyError::unknown_column("nurses", column)),
        }
        Ok(())
    }
}

#[test]
fn test_ddl_for_external_entity() {
    assert_eq!(
        create_table_sql::<Nurse>().unwrap(),
        "CREATE TABLE IF NOT EXISTS nurses (id BIGSERIAL PRIMARY KEY, name VARCHAR(255) NOT NULL, \
         on_call TEXT, shift TEXT DEFAULT 'Day');"
    );
}

#[test]
fn test_boolean_filter_uses_equality() {
    assert_eq!(
        select_sql::<Nurse>(&SelectOptions::new().filter("on_call", true).order_by("name"))
            .unwrap(),
        "SELECT * FROM nurses WHERE on_call = TRUE ORDER BY name ASC;"
    );
}

#[test]
fn test_text_booleans_map_back() {
    let db = MockConnector::new();
    db.on_query(
        "FROM nurses",
        vec![common::stored_row(
            &Nurse {
                name: "Kim".into(),
                on_call: true,
                shift: Shift::Night,
                ..Default::default()
            },
            3,
        )
        .iter()
        .map(|(name, value)| {
            // TEXT columns come back as text
            let value = match value {
                Value::Bool(b) => Value::Text(b.to_string()),
                other => other.clone(),
            };
            (name.to_string(), value)
        })
        .collect()],
    );
    let nurses: Vec<Nurse> = DatabaseManager::new(db).get_all().unwrap();
    assert_eq!(
        nurses,
        vec![Nurse {
            id: 3,
            name: "Kim".into(),
            on_call: true,
            shift: Shift::Night,
        }]
    );
}

#[test]
fn test_insert_pair_commits_together() {
    let db = MockConnector::new();
    db.on_scalar("INSERT INTO nurses", 1);
    db.on_scalar("INSERT INTO nurses", 2);
    let ids = DatabaseManager::new(db.clone())
        .execute_transaction(|tx| {
            let day = insert_with(tx, &Nurse { name: "Lee".into(), ..Default::default() })?;
            let night = insert_with(
                tx,
                &Nurse {
                    name: "Ola".into(),
                    shift: Shift::Night,
                    ..Default::default()
                },
            )?;
            Ok((day, night))
        })
        .unwrap();
    assert_eq!(ids, (1, 2));
    let statements = db.statements();
    assert_eq!(statements.first().map(String::as_str), Some("BEGIN"));
    assert_eq!(statements.last().map(String::as_str), Some("COMMIT"));
    assert!(statements[2].ends_with("VALUES ('Ola', FALSE, 'Night') RETURNING id;"));
}
