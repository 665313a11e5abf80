//! SPARQL 1.1 JSON results envelope
//!
//! ```json
//! { "head": { "vars": ["s"] },
//!   "results": { "bindings": [ { "s": { "type": "uri", "value": "http://..." } } ] } }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::errors::{OntologyError, Result};

/// One result row: projection variable name to the bound value's lexical form
pub type Row = IndexMap<String, String>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoundValue {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub value: String,
    #[serde(default)]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", default)]
    pub lang: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultSet {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, BoundValue>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: Head,
    #[serde(default)]
    pub results: Option<ResultSet>,
    #[serde(default)]
    pub boolean: Option<bool>,
}

impl SparqlResults {
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|e| OntologyError::ResultDecoding(format!("invalid SPARQL results document: {}", e)))
    }

    /// Values of the head variables per row, skipping rows where none is bound
    pub fn rows(&self) -> Vec<Row> {
        let Some(results) = &self.results else {
            return Vec::new();
        };

        let mut rows = Vec::with_capacity(results.bindings.len());
        for binding in &results.bindings {
            let row: Row = self
                .head
                .vars
                .iter()
                .filter_map(|var| binding.get(var).map(|v| (var.clone(), v.value.clone())))
                .collect();

            if row.is_empty() {
                debug!("Skipping result row with no bound projection variable");
                continue;
            }
            rows.push(row);
        }
        rows
    }

    /// Answer of an ASK query
    pub fn boolean(&self) -> Result<bool> {
        self.boolean.ok_or_else(|| {
            OntologyError::ResultDecoding("ASK response carries no boolean field".to_string())
        })
    }
}
