#![allow(dead_code)]

use lifebuoy::{table_of, Entity, Row, Value};
use log::LevelFilter;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger.is_test(true).format_file(true).format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Row a database would return for `entity` once stored under key `id`
pub fn stored_row<E: Entity>(entity: &E, id: i64) -> Row {
    let table = table_of::<E>().unwrap();
    let pk = table.primary_key().map(|c| c.name().to_string());
    table
        .columns()
        .iter()
        .map(|column| {
            let value = if pk.as_deref() == Some(column.name()) {
                Value::Int(id)
            } else {
                entity.get(column.name()).unwrap_or(Value::Null)
            };
            (column.name().to_string(), value)
        })
        .collect()
}
