//! Group graph pattern shared by SELECT and ASK: triple blocks, MINUS,
//! nested subqueries and FILTER expressions, emitted in that order.

use crate::errors::{OntologyError, Result};
use crate::query::param::{sanitize, Conditions, Triple};

/// Comparison operators accepted by the filter helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Gt,
    Lt,
    Contains,
    NotContains,
    IsLiteral,
}

/// `FILTER (...)` comparing `var` with the variable `value`
pub fn filter_expression(var: &str, op: Operator, value: Option<&str>) -> Result<String> {
    let var = sanitize(var);

    match (op, value.map(sanitize)) {
        (Operator::IsLiteral, None) => Ok(format!("FILTER (isLiteral({}))", var)),
        (Operator::IsLiteral, Some(_)) => Err(OntologyError::QueryConstruction(format!(
            "isLiteral filter on {} takes no value",
            var
        ))),
        (op, None) => Err(OntologyError::QueryConstruction(format!(
            "{:?} filter on {} requires a value",
            op, var
        ))),
        (Operator::Eq, Some(value)) => Ok(format!("FILTER ({}={})", var, value)),
        (Operator::Gt, Some(value)) => Ok(format!("FILTER ({}>{})", var, value)),
        (Operator::Lt, Some(value)) => Ok(format!("FILTER ({}<{})", var, value)),
        (Operator::Contains, Some(value)) => Ok(format!("FILTER (CONTAINS({}, {}))", var, value)),
        (Operator::NotContains, Some(value)) => {
            Ok(format!("FILTER (!CONTAINS({}, {}))", var, value))
        }
    }
}

/// `FILTER (STRLEN(...) op ...)`; only `Eq`, `Gt` and `Lt` compare lengths
pub fn strlen_expression(var: &str, op: Operator, value: &str) -> Result<String> {
    let var = sanitize(var);
    let value = sanitize(value);
    let symbol = match op {
        Operator::Eq => "=",
        Operator::Gt => ">",
        Operator::Lt => "<",
        other => {
            return Err(OntologyError::QueryConstruction(format!(
                "{:?} cannot compare the string length of {}",
                other, var
            )))
        }
    };
    Ok(format!("FILTER (STRLEN({}){}{})", var, symbol, value))
}

/// `FILTER regex(...)` with pattern and flags given as variables
pub fn regex_expression(var: &str, pattern: &str, flags: Option<&str>) -> String {
    match flags {
        Some(flags) => format!(
            "FILTER regex({}, {}, {})",
            sanitize(var),
            sanitize(pattern),
            sanitize(flags)
        ),
        None => format!("FILTER regex({}, {})", sanitize(var), sanitize(pattern)),
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct WhereClause {
    pub conditions: Conditions,
    pub minus: Conditions,
    pub subqueries: Vec<String>,
    pub filters: Vec<String>,
}

impl WhereClause {
    pub fn add(&mut self, triple: Triple) {
        self.conditions.add(triple);
    }

    pub fn add_minus(&mut self, triple: Triple) {
        self.minus.add(triple);
    }

    pub fn render(&self, out: &mut String) {
        out.push_str("WHERE {\n");
        self.conditions.render("\t", out);

        if !self.minus.is_empty() {
            out.push_str("\tMINUS {\n");
            self.minus.render("\t\t", out);
            out.push_str("\t}\n");
        }

        for subquery in &self.subqueries {
            out.push_str("\t{\n\t");
            out.push_str(subquery.trim_end());
            out.push_str("\n\t}\n");
        }

        for filter in &self.filters {
            out.push('\t');
            out.push_str(filter);
            out.push('\n');
        }
        out.push_str("}\n");
    }
}
