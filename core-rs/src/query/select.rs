/**
 * select.rs
 * SELECT query builder
 */

use indexmap::IndexMap;

use crate::errors::Result;
use crate::query::clause::{filter_expression, regex_expression, strlen_expression, Operator, WhereClause};
use crate::query::param::{bare_name, fresh_placeholder, sanitize, Bindings, Conditions, ParamValue, Triple};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// Compiled SELECT: command text with placeholders only, plus what is needed to fill them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    command: String,
    prefixes: IndexMap<String, String>,
    bindings: Bindings,
    select_vars: Vec<String>,
    conditions: Conditions,
}

impl SelectQuery {
    pub fn builder() -> SelectBuilder {
        SelectBuilder::new()
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

    /// Projected variable names, without sigils
    pub fn select_vars(&self) -> &[String] {
        &self.select_vars
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

/// Accumulates a SELECT; [`SelectBuilder::build`] consumes it.
///
/// # Example
///
/// ```
/// use owlq_core::query::{Operator, SelectBuilder};
///
/// let query = SelectBuilder::new()
///     .select(&["word", "length"])
///     .where_has_type("word", "mci:Word")
///     .where_("word", "hasLength", "length")
///     .filter_value("length", Operator::Gt, 3i64)
///     .unwrap()
///     .order_by_asc("length")
///     .limit(10)
///     .build()
///     .unwrap();
///
/// assert!(query.command().starts_with("SELECT ?word ?length"));
/// assert!(!query.command().contains("mci:Word"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectBuilder {
    vars: Vec<String>,
    distinct: bool,
    clause: WhereClause,
    prefixes: IndexMap<String, String>,
    bindings: Bindings,
    order: Option<(String, Order)>,
    limit: usize,
}

impl SelectBuilder {
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

    /// Project variables; empty names are ignored
    pub fn select(mut self, vars: &[&str]) -> Self {
        self.vars.extend(
            vars.iter()
                .map(|v| bare_name(v))
                .filter(|v| !v.is_empty()),
        );
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Add a triple condition, grouped under its subject
    pub fn where_(mut self, subject: &str, predicate: &str, object: &str) -> Self {
        self.clause.add(Triple::new(subject, predicate, object));
        self
    }

    /// `subject rdf:type <type_iri>` with the type bound under a fresh name
    pub fn where_has_type(mut self, subject: &str, type_iri: &str) -> Self {
        let class = fresh_placeholder("class");
        self.bindings.bind("rdfType", ParamValue::iri("rdf:type"));
        self.bindings.bind(&class, ParamValue::iri(type_iri));
        self.clause.add(Triple::new(subject, "rdfType", &class));
        self
    }

    /// Embed a compiled SELECT as a nested group; its prefixes and bindings join this query's
    pub fn where_subquery(mut self, subquery: SelectQuery) -> Self {
        self.bindings.merge(&subquery.bindings);
        for (prefix, namespace) in subquery.prefixes {
            self.prefixes.insert(prefix, namespace);
        }
        self.clause.subqueries.push(subquery.command);
        self
    }

    pub fn minus(mut self, subject: &str, predicate: &str, object: &str) -> Self {
        self.clause.add_minus(Triple::new(subject, predicate, object));
        self
    }

    /// Compare `var` with the variable `value`; `IsLiteral` takes `None`
    pub fn filter(mut self, var: &str, op: Operator, value: Option<&str>) -> Result<Self> {
        self.clause.filters.push(filter_expression(var, op, value)?);
        Ok(self)
    }

    /// Compare `var` with a concrete value, bound under a fresh name
    pub fn filter_value(self, var: &str, op: Operator, value: impl Into<ParamValue>) -> Result<Self> {
        let placeholder = fresh_placeholder("filter");
        let mut builder = self.filter(var, op, Some(&placeholder))?;
        builder.bindings.bind(&placeholder, value.into());
        Ok(builder)
    }

    /// Compare the string length of `var` with the variable `value`
    pub fn filter_by_str_length(mut self, var: &str, op: Operator, value: &str) -> Result<Self> {
        self.clause.filters.push(strlen_expression(var, op, value)?);
        Ok(self)
    }

    /// `regex(var, pattern[, flags])`, pattern and flags bound as string literals
    pub fn regex_filter(mut self, var: &str, pattern: &str, flags: Option<&str>) -> Self {
        let pattern_name = fresh_placeholder("pattern");
        self.bindings.bind(&pattern_name, ParamValue::string(pattern));

        let flags_name = flags.filter(|f| !f.is_empty()).map(|f| {
            let name = fresh_placeholder("flags");
            self.bindings.bind(&name, ParamValue::string(f));
            name
        });

        self.clause
            .filters
            .push(regex_expression(var, &pattern_name, flags_name.as_deref()));
        self
    }

    pub fn order_by_asc(mut self, field: &str) -> Self {
        self.order = Some((field.to_string(), Order::Asc));
        self
    }

    pub fn order_by_desc(mut self, field: &str) -> Self {
        self.order = Some((field.to_string(), Order::Desc));
        self
    }

    /// Row limit; `0` means unlimited
    pub fn limit(mut self, rows: usize) -> Self {
        self.limit = rows;
        self
    }

    pub fn build(self) -> Result<SelectQuery> {
        self.bindings.check()?;

        let mut command = String::from("SELECT ");
        if self.distinct {
            command.push_str("DISTINCT ");
        }
        if self.vars.is_empty() {
            command.push_str("* ");
        }
        for var in &self.vars {
            command.push_str(&sanitize(var));
            command.push(' ');
        }
        command.push('\n');

        self.clause.render(&mut command);

        if let Some((field, order)) = &self.order {
            let direction = match order {
                Order::Asc => "ASC",
                Order::Desc => "DESC",
            };
            command.push_str(&format!("ORDER BY {}({})\n", direction, sanitize(field)));
        }
        if self.limit > 0 {
            command.push_str(&format!("LIMIT {}\n", self.limit));
        }

        Ok(SelectQuery {
            command,
            prefixes: self.prefixes,
            bindings: self.bindings,
            select_vars: self.vars,
            conditions: self.clause.conditions,
        })
    }
}
