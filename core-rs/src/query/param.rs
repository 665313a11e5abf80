//! Triple & Parameter Model
//!
//! Command text only ever names variables; concrete values live in [`Bindings`]
//! and are substituted by the parameterized statement at execution time.

use indexmap::IndexMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::errors::{OntologyError, Result};

static PLACEHOLDER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Strip any `?`/`$` sigils from a variable name
pub fn bare_name(name: &str) -> String {
    name.replace(['?', '$'], "")
}

/// Canonical `?name` form of a variable, whatever sigil the caller used
pub fn sanitize(name: &str) -> String {
    format!("?{}", bare_name(name))
}

/// Process-unique placeholder name such as `class_12`
pub fn fresh_placeholder(stem: &str) -> String {
    let n = PLACEHOLDER_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}", bare_name(stem), n)
}

/// Subject, predicate and object, each a variable or bound parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(subject: &str, predicate: &str, object: &str) -> Self {
        Self {
            subject: bare_name(subject),
            predicate: bare_name(predicate),
            object: bare_name(object),
        }
    }
}

/// Triple conditions grouped by subject, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    groups: IndexMap<String, Vec<Triple>>,
}

impl Conditions {
    pub fn add(&mut self, triple: Triple) {
        self.groups.entry(triple.subject.clone()).or_default().push(triple);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &IndexMap<String, Vec<Triple>> {
        &self.groups
    }

    /// One `?s ?p ?o;` block per subject, each line prefixed with `indent`
    pub fn render(&self, indent: &str, out: &mut String) {
        for (subject, triples) in &self.groups {
            out.push_str(indent);
            out.push_str(&sanitize(subject));
            out.push(' ');

            let pairs: Vec<String> = triples
                .iter()
                .map(|t| format!("{} {}", sanitize(&t.predicate), sanitize(&t.object)))
                .collect();
            out.push_str(&pairs.join(&format!(";\n{}\t", indent)));
            out.push_str(" .\n");
        }
    }
}

/// Kind of a bound parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Iri,
    Str,
    Int,
    Long,
    Bool,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Iri => "IRI",
            ParamKind::Str => "string literal",
            ParamKind::Int => "int literal",
            ParamKind::Long => "long literal",
            ParamKind::Bool => "boolean literal",
        };
        f.write_str(name)
    }
}

/// Concrete value bound to a parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Absolute IRI or prefixed name (`mci:hasWord`)
    Iri(String),
    Str(String),
    Int(i32),
    Long(i64),
    Bool(bool),
}

impl ParamValue {
    pub fn iri(value: impl Into<String>) -> Self {
        ParamValue::Iri(value.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        ParamValue::Str(value.into())
    }

    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Iri(_) => ParamKind::Iri,
            ParamValue::Str(_) => ParamKind::Str,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Long(_) => ParamKind::Long,
            ParamValue::Bool(_) => ParamKind::Bool,
        }
    }

    /// Value without any SPARQL decoration
    pub fn lexical(&self) -> String {
        match self {
            ParamValue::Iri(v) | ParamValue::Str(v) => v.clone(),
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Long(v) => v.to_string(),
            ParamValue::Bool(v) => v.to_string(),
        }
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Long(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Ordered binding table, one value of one kind per name.
///
/// Rebinding a name with the same kind replaces its value. Rebinding it with a
/// different kind keeps the first value and records a conflict that
/// [`Bindings::check`] reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: IndexMap<String, ParamValue>,
    conflicts: Vec<String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, value: ParamValue) {
        let name = bare_name(name);
        match self.values.get_mut(&name) {
            Some(existing) if existing.kind() != value.kind() => {
                self.conflicts.push(format!(
                    "parameter ?{} bound as {} and as {}",
                    name,
                    existing.kind(),
                    value.kind()
                ));
            }
            Some(existing) => *existing = value,
            None => {
                self.values.insert(name, value);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(&bare_name(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fold another table into this one with the same rebinding rules
    pub fn merge(&mut self, other: &Bindings) {
        for (name, value) in &other.values {
            self.bind(name, value.clone());
        }
        self.conflicts.extend(other.conflicts.iter().cloned());
    }

    /// Fails with the first kind conflict, if any
    pub fn check(&self) -> Result<()> {
        match self.conflicts.first() {
            Some(conflict) => Err(OntologyError::QueryConstruction(conflict.clone())),
            None => Ok(()),
        }
    }
}
