//! SQL generation and execution helpers
//!
//! - [`format`] - the single literal formatter every statement uses
//! - [`generator`] - CREATE / INSERT / UPDATE / DELETE / SELECT text
//! - [`execution`] - run generated statements on any executor

pub mod execution;
pub mod format;
pub mod generator;

pub use execution::{
    delete_where, delete_with, insert_with, select_all_with, select_with, update_with,
};
pub use format::format_value;
pub use generator::{
    create_table_sql, delete_sql, delete_where_sql, insert_sql, select_all_sql,
    select_by_column_sql, select_by_key_sql, select_sql, update_sql, SelectOptions,
};
