//! Error types for the ontology core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Model resolution error: {0}")]
    ModelResolution(String),

    #[error("Restriction decoding error: {0}")]
    RestrictionDecoding(String),

    #[error("Query construction error: {0}")]
    QueryConstruction(String),

    #[error("Query execution failed ({context}): {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Query execution failed: store answered HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Result decoding error: {0}")]
    ResultDecoding(String),

    #[error("Failed to load ontology: {0}")]
    Load(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OntologyError {
    /// True for every failure raised while talking to the store.
    pub fn is_transport(&self) -> bool {
        matches!(self, OntologyError::Transport { .. } | OntologyError::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, OntologyError>;
