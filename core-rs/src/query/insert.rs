/**
 * insert.rs
 * INSERT DATA builder for one typed individual and its relations
 */

use indexmap::IndexMap;

use crate::errors::{OntologyError, Result};
use crate::query::param::{bare_name, fresh_placeholder, Bindings, ParamValue};

/// Named value taking part in an insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertParam {
    name: String,
    value: ParamValue,
}

impl InsertParam {
    pub fn new(name: &str, value: ParamValue) -> Self {
        Self {
            name: bare_name(name),
            value,
        }
    }

    pub fn iri(name: &str, iri: &str) -> Self {
        Self::new(name, ParamValue::iri(iri))
    }

    pub fn string(name: &str, value: &str) -> Self {
        Self::new(name, ParamValue::string(value))
    }

    pub fn long(name: &str, value: i64) -> Self {
        Self::new(name, ParamValue::Long(value))
    }

    pub fn boolean(name: &str, value: bool) -> Self {
        Self::new(name, ParamValue::Bool(value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }
}

/// Compiled `INSERT DATA`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertQuery {
    command: String,
    prefixes: IndexMap<String, String>,
    bindings: Bindings,
    subject: InsertParam,
}

impl InsertQuery {
    pub fn builder() -> InsertBuilder {
        InsertBuilder::new()
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

    pub fn subject(&self) -> &InsertParam {
        &self.subject
    }
}

#[derive(Debug, Clone)]
struct Relation {
    predicate: InsertParam,
    objects: Vec<InsertParam>,
}

/// Builds the insert of one individual: its `rdf:type` plus any number of relations.
///
/// Relations are grouped by predicate value. Several objects under one
/// predicate repeat the predicate after `;`.
#[derive(Debug, Clone, Default)]
pub struct InsertBuilder {
    prefixes: IndexMap<String, String>,
    subject: Option<(InsertParam, InsertParam)>,
    relations: IndexMap<String, Relation>,
}

impl InsertBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes.insert(prefix.to_string(), namespace.to_string());
        self
    }

    /// The individual to insert, typed as `class_iri`. The subject is always bound as an IRI.
    pub fn insert_entry(mut self, subject: InsertParam, class_iri: &str) -> Self {
        let subject = InsertParam {
            value: ParamValue::Iri(subject.value.lexical()),
            ..subject
        };
        let class = InsertParam::iri(&fresh_placeholder("typeToAssociate"), class_iri);
        self.subject = Some((subject, class));
        self
    }

    pub fn add_relation(mut self, predicate: InsertParam, object: InsertParam) -> Self {
        self.relations
            .entry(predicate.value.lexical())
            .or_insert_with(|| Relation {
                predicate,
                objects: Vec::new(),
            })
            .objects
            .push(object);
        self
    }

    pub fn build(self) -> Result<InsertQuery> {
        let (subject, class) = self.subject.ok_or_else(|| {
            OntologyError::QueryConstruction("insert has no subject; call insert_entry first".to_string())
        })?;
        let rdf_type = InsertParam::iri("rdfType", "rdf:type");

        let mut bindings = Bindings::new();
        bindings.bind(&subject.name, subject.value.clone());
        bindings.bind(&rdf_type.name, rdf_type.value.clone());
        bindings.bind(&class.name, class.value.clone());

        let mut pairs = vec![format!("?{} ?{}", rdf_type.name, class.name)];
        for relation in self.relations.values() {
            bindings.bind(&relation.predicate.name, relation.predicate.value.clone());
            for object in &relation.objects {
                bindings.bind(&object.name, object.value.clone());
                pairs.push(format!("?{} ?{}", relation.predicate.name, object.name));
            }
        }
        bindings.check()?;

        let command = format!(
            "INSERT DATA {{\n\t?{} {} .\n}}\n",
            subject.name,
            pairs.join(" ;\n\t\t")
        );

        Ok(InsertQuery {
            command,
            prefixes: self.prefixes,
            bindings,
            subject,
        })
    }
}
