/**
 * statement.rs
 * Parameterized statement: joins command text, prefix table and bindings
 * into the final SPARQL text sent to the store
 */

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{OntologyError, Result};
use crate::ontology::vocab;
use crate::query::param::{Bindings, ParamValue};

/// `?name` / `$name` variable tokens in command text
static VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?$]([\p{L}\p{N}_]+)").expect("variable token pattern is valid"));

/// Characters SPARQL forbids inside `<...>`
const FORBIDDEN_IRI_CHARS: &[char] = &['<', '>', '"', '{', '}', '|', '^', '`', '\\'];

/// `owl`, `rdf`, `rdfs` and `xsd`, in that order
pub fn standard_prefixes() -> IndexMap<String, String> {
    let mut prefixes = IndexMap::new();
    prefixes.insert("owl".to_string(), vocab::OWL_NS.to_string());
    prefixes.insert("rdf".to_string(), vocab::RDF_NS.to_string());
    prefixes.insert("rdfs".to_string(), vocab::RDFS_NS.to_string());
    prefixes.insert("xsd".to_string(), vocab::XSD_NS.to_string());
    prefixes
}

#[derive(Debug, Clone)]
pub struct ParameterizedStatement {
    command: String,
    prefixes: IndexMap<String, String>,
    bindings: Bindings,
}

impl ParameterizedStatement {
    /// Start from `command` and the fixed default prefix table
    pub fn new(command: impl Into<String>, defaults: &IndexMap<String, String>) -> Self {
        Self {
            command: command.into(),
            prefixes: defaults.clone(),
            bindings: Bindings::new(),
        }
    }

    /// Caller prefixes join the defaults; the last write wins per prefix
    pub fn with_prefixes(mut self, prefixes: &IndexMap<String, String>) -> Self {
        for (prefix, namespace) in prefixes {
            self.prefixes.insert(prefix.clone(), namespace.clone());
        }
        self
    }

    pub fn bind(mut self, bindings: &Bindings) -> Self {
        self.bindings.merge(bindings);
        self
    }

    pub fn prefixes(&self) -> &IndexMap<String, String> {
        &self.prefixes
    }

    /// Final query text: `PREFIX` lines, then the command with every bound
    /// variable replaced by its SPARQL rendering. Unbound variables stay as they are.
    pub fn compile(&self) -> Result<String> {
        self.bindings.check()?;

        let mut out = String::with_capacity(self.command.len() + 64 * self.prefixes.len());
        for (prefix, namespace) in &self.prefixes {
            out.push_str(&format!("PREFIX {}: <{}>\n", prefix, namespace));
        }

        let mut last = 0;
        for caps in VARIABLE.captures_iter(&self.command) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(value) = self.bindings.get(name.as_str()) else {
                continue;
            };
            out.push_str(&self.command[last..token.start()]);
            out.push_str(&self.render(value)?);
            last = token.end();
        }
        out.push_str(&self.command[last..]);

        Ok(out)
    }

    fn render(&self, value: &ParamValue) -> Result<String> {
        Ok(match value {
            ParamValue::Iri(iri) => format!("<{}>", self.expand_iri(iri)?),
            ParamValue::Str(text) => format!("\"{}\"", escape_literal(text)),
            ParamValue::Int(n) => format!("\"{}\"^^<{}int>", n, vocab::XSD_NS),
            ParamValue::Long(n) => format!("\"{}\"^^<{}long>", n, vocab::XSD_NS),
            ParamValue::Bool(b) => b.to_string(),
        })
    }

    /// Absolute form of an IRI parameter.
    ///
    /// Accepts `<...>`, absolute IRIs (`scheme://...`, `urn:...`) and prefixed
    /// names whose prefix is in the table.
    pub fn expand_iri(&self, iri: &str) -> Result<String> {
        let iri = iri.trim();
        let iri = iri
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(iri);

        if iri.is_empty() {
            return Err(OntologyError::QueryConstruction("empty IRI parameter".to_string()));
        }

        let expanded = if iri.contains("://") || iri.starts_with("urn:") {
            iri.to_string()
        } else {
            let (prefix, local) = iri.split_once(':').ok_or_else(|| {
                OntologyError::QueryConstruction(format!(
                    "IRI parameter '{}' is neither absolute nor prefixed",
                    iri
                ))
            })?;
            let namespace = self.prefixes.get(prefix).ok_or_else(|| {
                OntologyError::QueryConstruction(format!(
                    "unknown prefix '{}' in IRI parameter '{}'",
                    prefix, iri
                ))
            })?;
            format!("{}{}", namespace, local)
        };

        if expanded
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_IRI_CHARS.contains(&c))
        {
            return Err(OntologyError::QueryConstruction(format!(
                "IRI parameter '{}' contains characters not allowed in an IRI",
                iri
            )));
        }
        Ok(expanded)
    }
}

/// Escape a string for a double-quoted SPARQL literal
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}
