//! # OWLQ Core - OWL schema introspection and parameterized SPARQL
//!
//! Reads what an OWL class requires of its individuals straight from the
//! ontology's axioms, and talks to a SPARQL 1.1 triple store through query
//! builders that never splice values into query text.
//!
//! ## Core Principle
//!
//! **Text and data travel separately**: builders emit command text that only
//! names variables; concrete values sit in a typed binding table and are
//! substituted by a parameterized statement right before the request is sent.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────┐      ┌──────────────────────────┐
//! │  OntologyLibrary   │      │  Select / Ask / Insert   │
//! │  (loaded OWL)      │      │  builders                │
//! └─────────┬──────────┘      └────────────┬─────────────┘
//!           │                              │ command + bindings
//!   SchemaIntrospector            ParameterizedStatement
//!           │                              │ final SPARQL
//!      ClassSchema                    HttpDriver ──► /query, /update
//! ```

pub mod config;
pub mod drivers;
pub mod errors;
pub mod ontology;
pub mod query;
pub mod service;

pub use config::DatasetProperties;
pub use drivers::{HttpDriver, QueryExecutor, Row};
pub use errors::{OntologyError, Result};
pub use ontology::{
    CardinalitySchema, ClassSchema, DataRangeRestrictionSchema, OntologyGraph, OntologyLibrary,
    PropertySchema, RdfSyntax, RestrictionSchema, RestrictionType, SchemaIntrospector,
};
pub use query::{
    AskBuilder, AskQuery, InsertBuilder, InsertParam, InsertQuery, Operator, ParamValue,
    ParameterizedStatement, SelectBuilder, SelectQuery,
};
pub use service::{OntologyService, RangeKind};
