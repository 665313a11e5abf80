//! Executor trait for running compiled queries against a triple store
//!
//! Implementations include:
//! - HttpDriver (SPARQL 1.1 protocol over HTTP)

use crate::drivers::results::Row;
use crate::errors::Result;
use crate::query::{AskQuery, InsertQuery, SelectQuery};

/// Runs built queries against a dataset.
///
/// Every call is one blocking round trip. Nothing is retried; a failure is
/// returned to the caller with its cause.
pub trait QueryExecutor {
    /// True when the pattern has at least one match
    fn ask(&self, query: &AskQuery) -> Result<bool>;

    /// Result rows in store order, each keyed by projection variable.
    /// Rows with no bound variable are dropped.
    fn select(&self, query: &SelectQuery) -> Result<Vec<Row>>;

    /// `Ok(true)` once the store has accepted the update
    fn insert(&self, query: &InsertQuery) -> Result<bool>;
}
