//! Drivers module for query execution
//!
//! Provides the executor interface (QueryExecutor trait) and implementations:
//! - HttpDriver: SPARQL 1.1 protocol over HTTP

mod http;
pub mod results;
mod traits;

pub use http::{HttpDriver, SPARQL_RESULTS_ACCEPT};
pub use results::{Row, SparqlResults};
pub use traits::QueryExecutor;
