/**
 * ask.rs
 * ASK query builder
 */

use indexmap::IndexMap;

use crate::errors::Result;
use crate::query::clause::{filter_expression, Operator, WhereClause};
use crate::query::param::{fresh_placeholder, Bindings, ParamValue, Triple};

/// Compiled ASK query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskQuery {
    command: String,
    prefixes: IndexMap<String, String>,
    bindings: Bindings,
}

impl AskQuery {
    pub fn builder() -> AskBuilder {
        AskBuilder::new()
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn prefixes(&self) -> &IndexMap<String, String> {
        &self.prefixes
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }
}

/// Same condition shape as SELECT, without projection, ordering or limit
#[derive(Debug, Clone, Default)]
pub struct AskBuilder {
    clause: WhereClause,
    prefixes: IndexMap<String, String>,
    bindings: Bindings,
}

impl AskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes.insert(prefix.to_string(), namespace.to_string());
        self
    }

    pub fn add_iri_param(mut self, name: &str, iri: &str) -> Self {
        self.bindings.bind(name, ParamValue::iri(iri));
        self
    }

    pub fn add_literal_param(mut self, name: &str, value: &str) -> Self {
        self.bindings.bind(name, ParamValue::string(value));
        self
    }

    pub fn add_int_param(mut self, name: &str, value: i32) -> Self {
        self.bindings.bind(name, ParamValue::Int(value));
        self
    }

    pub fn add_long_param(mut self, name: &str, value: i64) -> Self {
        self.bindings.bind(name, ParamValue::Long(value));
        self
    }

    pub fn add_bool_param(mut self, name: &str, value: bool) -> Self {
        self.bindings.bind(name, ParamValue::Bool(value));
        self
    }

    pub fn is(mut self, subject: &str, predicate: &str, object: &str) -> Self {
        self.clause.add(Triple::new(subject, predicate, object));
        self
    }

    pub fn is_type(mut self, subject: &str, type_iri: &str) -> Self {
        let class = fresh_placeholder("class");
        self.bindings.bind("rdfType", ParamValue::iri("rdf:type"));
        self.bindings.bind(&class, ParamValue::iri(type_iri));
        self.clause.add(Triple::new(subject, "rdfType", &class));
        self
    }

    pub fn minus(mut self, subject: &str, predicate: &str, object: &str) -> Self {
        self.clause.add_minus(Triple::new(subject, predicate, object));
        self
    }

    pub fn filter(mut self, var: &str, op: Operator, value: Option<&str>) -> Result<Self> {
        self.clause.filters.push(filter_expression(var, op, value)?);
        Ok(self)
    }

    pub fn filter_value(self, var: &str, op: Operator, value: impl Into<ParamValue>) -> Result<Self> {
        let placeholder = fresh_placeholder("filter");
        let mut builder = self.filter(var, op, Some(&placeholder))?;
        builder.bindings.bind(&placeholder, value.into());
        Ok(builder)
    }

    pub fn build(self) -> Result<AskQuery> {
        self.bindings.check()?;

        let mut command = String::from("ASK ");
        self.clause.render(&mut command);

        Ok(AskQuery {
            command,
            prefixes: self.prefixes,
            bindings: self.bindings,
        })
    }
}
