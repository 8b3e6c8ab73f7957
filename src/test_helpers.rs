//! Scripted in-memory connector for testing code built on lifebuoy
//!
//! [`MockConnector`] records every statement it receives and answers queries
//! from results queued per SQL fragment. Compiled under the `test-helpers`
//! feature:
//!
//! ```
//! use lifebuoy::test_helpers::MockConnector;
//! use lifebuoy::{Connector, Executor, Row, Value};
//!
//! let db = MockConnector::new();
//! db.on_query("FROM patients", vec![Row::new().with("id", 1)]);
//! db.on_scalar("RETURNING id", 42);
//!
//! let conn = db.connect().unwrap();
//! assert_eq!(conn.query_all("SELECT * FROM patients;").unwrap().len(), 1);
//! assert_eq!(conn.query_scalar("INSERT ... RETURNING id;").unwrap(), Value::Int(42));
//! assert_eq!(db.statements().len(), 2);
//! ```

use crate::error::BuoyError;
use crate::executor::{Connection, Connector, Executor};
use crate::value::{Row, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Failure injected by [`MockConnector::fail_on`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    /// Surfaces as [`BuoyError::ConstraintViolation`] with SQLSTATE `23505`
    ConstraintViolation,
    /// Surfaces as [`BuoyError::Query`] with this message
    Database(String),
}

impl MockFailure {
    fn to_error(&self) -> BuoyError {
        match self {
            MockFailure::ConstraintViolation => BuoyError::ConstraintViolation {
                code: "23505".to_string(),
                message: "duplicate key value violates unique constraint".to_string(),
            },
            MockFailure::Database(message) => BuoyError::Query(message.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    statements: Vec<String>,
    batches: Vec<String>,
    queries: Vec<(String, VecDeque<Vec<Row>>)>,
    scalars: Vec<(String, VecDeque<Value>)>,
    failures: Vec<(String, MockFailure)>,
    connections: usize,
}

impl MockState {
    /// Log the statement and return the injected failure, if any
    fn record(&mut self, sql: &str) -> Result<(), BuoyError> {
        self.statements.push(sql.to_string());
        match self.failures.iter().find(|(fragment, _)| sql.contains(fragment.as_str())) {
            Some((_, failure)) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

fn enqueue<T>(queues: &mut Vec<(String, VecDeque<T>)>, fragment: &str, item: T) {
    match queues.iter_mut().find(|(f, _)| f == fragment) {
        Some((_, queue)) => queue.push_back(item),
        None => queues.push((fragment.to_string(), VecDeque::from([item]))),
    }
}

fn dequeue<T>(queues: &mut [(String, VecDeque<T>)], sql: &str) -> Option<T> {
    queues
        .iter_mut()
        .filter(|(fragment, queue)| sql.contains(fragment.as_str()) && !queue.is_empty())
        .find_map(|(_, queue)| queue.pop_front())
}

/// Connector handing out [`MockConnection`]s that share one script and log
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a result set for the next `query_all` whose SQL contains `fragment`.
    ///
    /// Result sets for the same fragment are returned first-in first-out.
    /// Queries matching nothing queued return no rows.
    pub fn on_query(&self, fragment: &str, rows: Vec<Row>) {
        enqueue(&mut self.state().queries, fragment, rows);
    }

    /// Queue a value for the next `query_scalar` whose SQL contains `fragment`.
    ///
    /// Unmatched scalar queries return `NULL`.
    pub fn on_scalar(&self, fragment: &str, value: impl Into<Value>) {
        enqueue(&mut self.state().scalars, fragment, value.into());
    }

    /// Fail every statement containing `fragment` (the statement is still logged)
    pub fn fail_on(&self, fragment: &str, failure: MockFailure) {
        self.state().failures.push((fragment.to_string(), failure));
    }

    /// Every statement received so far, in order, across all connections
    pub fn statements(&self) -> Vec<String> {
        self.state().statements.clone()
    }

    /// Scripts received through [`Executor::execute_batch`], in order
    ///
    /// Each is also part of [`statements`](Self::statements).
    pub fn batches(&self) -> Vec<String> {
        self.state().batches.clone()
    }

    /// Number of logged statements containing `fragment`
    pub fn count(&self, fragment: &str) -> usize {
        self.state()
            .statements
            .iter()
            .filter(|sql| sql.contains(fragment))
            .count()
    }

    pub fn connections_opened(&self) -> usize {
        self.state().connections
    }
}

impl Connector for MockConnector {
    type Connection = MockConnection;

    fn connect(&self) -> Result<MockConnection, BuoyError> {
        self.state().connections += 1;
        Ok(MockConnection {
            state: Arc::clone(&self.state),
        })
    }
}

/// One connection from a [`MockConnector`]
#[derive(Debug)]
pub struct MockConnection {
    state: Arc<Mutex<MockState>>,
}

impl MockConnection {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Executor for MockConnection {
    fn execute(&self, sql: &str) -> Result<u64, BuoyError> {
        self.state().record(sql)?;
        Ok(0)
    }

    fn query_scalar(&self, sql: &str) -> Result<Value, BuoyError> {
        let mut state = self.state();
        state.record(sql)?;
        Ok(dequeue(&mut state.scalars, sql).unwrap_or_default())
    }

    fn query_all(&self, sql: &str) -> Result<Vec<Row>, BuoyError> {
        let mut state = self.state();
        state.record(sql)?;
        Ok(dequeue(&mut state.queries, sql).unwrap_or_default())
    }

    fn execute_batch(&self, sql: &str) -> Result<(), BuoyError> {
        let mut state = self.state();
        state.batches.push(sql.to_string());
        state.record(sql)
    }
}

impl Connection for MockConnection {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_are_fifo_per_fragment() {
        let db = MockConnector::new();
        db.on_query("FROM migrations", vec![]);
        db.on_query("FROM migrations", vec![Row::new().with("name", "001")]);
        let conn = db.connect().unwrap();

        assert!(conn.query_all("SELECT name FROM migrations;").unwrap().is_empty());
        assert_eq!(conn.query_all("SELECT name FROM migrations;").unwrap().len(), 1);
        assert!(conn.query_all("SELECT name FROM migrations;").unwrap().is_empty());
    }

    #[test]
    fn test_unmatched_scalar_is_null() {
        let db = MockConnector::new();
        let conn = db.connect().unwrap();
        assert_eq!(conn.query_scalar("SELECT 1;").unwrap(), Value::Null);
    }

    #[test]
    fn test_failures_are_logged_and_persistent() {
        let db = MockConnector::new();
        db.fail_on("patients", MockFailure::ConstraintViolation);
        let conn = db.connect().unwrap();
        assert!(conn
            .execute("INSERT INTO patients VALUES (1);")
            .unwrap_err()
            .is_constraint_violation());
        assert!(conn.execute("INSERT INTO patients VALUES (2);").is_err());
        assert!(conn.execute("INSERT INTO checkups VALUES (1);").is_ok());
        assert_eq!(db.count("patients"), 2);
    }

    #[test]
    fn test_batches_are_logged_separately() {
        let db = MockConnector::new();
        let conn = db.connect().unwrap();
        conn.execute("SELECT 1;").unwrap();
        conn.execute_batch("CREATE TABLE a (id INT); CREATE TABLE b (id INT);").unwrap();
        assert_eq!(db.batches(), vec!["CREATE TABLE a (id INT); CREATE TABLE b (id INT);"]);
        assert_eq!(db.statements().len(), 2);
    }

    #[test]
    fn test_transaction_commands_are_logged() {
        let db = MockConnector::new();
        let conn = db.connect().unwrap();
        conn.begin().unwrap();
        conn.commit().unwrap();
        conn.rollback().unwrap();
        assert_eq!(db.statements(), vec!["BEGIN", "COMMIT", "ROLLBACK"]);
        assert_eq!(db.connections_opened(), 1);
    }
}
