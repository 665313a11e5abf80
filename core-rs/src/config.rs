/**
 * config.rs
 * Dataset configuration (YAML format)
 *
 * Format:
 * ```yaml
 * storeUrl: http://localhost:3030/mci
 * ontologyLocation: ./ontology/mci.owl
 * ontologyType: RDF/XML
 * ontologyName: mci
 * namespace: http://www.semanticweb.org/mci#
 * prefix: mci
 * timeoutSecs: 300
 * ```
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{OntologyError, Result};
use crate::query::standard_prefixes;

/// Five minutes, the store's default query budget.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_ontology_type() -> String {
    "RDF/XML".to_string()
}

/// Where the dataset lives and how its ontology is named
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetProperties {
    /// Base URL of the dataset; `/query` and `/update` are appended
    pub store_url: String,
    pub ontology_location: PathBuf,
    #[serde(default = "default_ontology_type")]
    pub ontology_type: String,
    #[serde(default)]
    pub ontology_name: String,
    /// Namespace IRI every class name is resolved inside
    pub namespace: String,
    pub prefix: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DatasetProperties {
    pub fn new(store_url: impl Into<String>, namespace: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            ontology_location: PathBuf::new(),
            ontology_type: default_ontology_type(),
            ontology_name: String::new(),
            namespace: namespace.into(),
            prefix: prefix.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load dataset properties from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let props: DatasetProperties = serde_yaml::from_str(&content)?;
        props.validate()?;
        Ok(props)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store_url.is_empty() {
            return Err(OntologyError::Config("storeUrl cannot be empty".to_string()));
        }
        if self.namespace.is_empty() {
            return Err(OntologyError::Config("namespace cannot be empty".to_string()));
        }
        if self.prefix.is_empty() || self.prefix.contains(':') {
            return Err(OntologyError::Config(format!(
                "Invalid prefix: '{}'",
                self.prefix
            )));
        }
        if self.timeout_secs == 0 {
            return Err(OntologyError::Config("timeoutSecs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fixed prefix table every compiled query starts from
    pub fn default_prefixes(&self) -> IndexMap<String, String> {
        let mut prefixes = IndexMap::new();
        prefixes.insert(self.prefix.clone(), self.namespace.clone());
        prefixes.extend(standard_prefixes());
        prefixes
    }

    /// Save dataset properties as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }
}
