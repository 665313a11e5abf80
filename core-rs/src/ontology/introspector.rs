/**
 * introspector.rs
 * Derives a ClassSchema from the OWL axioms of a loaded ontology
 */

use indexmap::IndexSet;
use oxigraph::model::{NamedNode, Subject, Term};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::errors::{OntologyError, Result};
use crate::ontology::graph::{as_subject, list_members, subject_iri, OntologyGraph, MAX_LIST_DEPTH};
use crate::ontology::schema::{
    CardinalitySchema, ClassSchema, DataRangeRestrictionSchema, PropertySchema, RestrictionSchema,
    RestrictionType, ENUMERATION_SEPARATOR,
};
use crate::ontology::vocab::{self, local_name};

/// Read-only walker over a loaded ontology.
///
/// Holds a shared borrow of the model, so any number of introspectors may run
/// concurrently once loading is done.
pub struct SchemaIntrospector<'a, G: OntologyGraph + ?Sized> {
    graph: &'a G,
    namespace: String,
}

impl<'a, G: OntologyGraph + ?Sized> SchemaIntrospector<'a, G> {
    /// `namespace` is prepended to every class name handed to [`Self::class_schema`]
    pub fn new(graph: &'a G, namespace: impl Into<String>) -> Self {
        Self {
            graph,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Schema of the class `{namespace}{class_name}`
    ///
    /// # Errors
    /// - `ModelResolution` when the class is not declared in the model
    /// - `RestrictionDecoding` when a cardinality restriction carries no qualified facet
    pub fn class_schema(&self, class_name: &str) -> Result<ClassSchema> {
        info!("Reading ontology schema for class {}", class_name);
        let class = self.resolve_class(class_name)?;

        let schema = ClassSchema {
            class_name: class_name.to_string(),
            properties: self.declared_properties(&class)?,
            restrictions: self.restrictions(&class)?,
            equality_restrictions: self.equality_restrictions(&class)?,
        };

        info!(
            "Schema for {}: {} properties, {} restrictions, {} equality restrictions",
            class_name,
            schema.properties.len(),
            schema.restrictions.len(),
            schema.equality_restrictions.len()
        );
        Ok(schema)
    }

    fn resolve_class(&self, class_name: &str) -> Result<Subject> {
        let iri = format!("{}{}", self.namespace, class_name);
        let node = NamedNode::new(iri.as_str()).map_err(|e| {
            OntologyError::ModelResolution(format!("Invalid class IRI {}: {}", iri, e))
        })?;
        let class: Subject = node.into();

        if !self.graph.contains_subject(&class)? {
            return Err(OntologyError::ModelResolution(format!(
                "Class {} not found in the ontology (namespace {})",
                class_name, self.namespace
            )));
        }
        if !self.graph.has_type(&class, vocab::CLASS)? && !self.graph.has_type(&class, vocab::RDFS_CLASS)? {
            return Err(OntologyError::ModelResolution(format!(
                "{} is declared in the ontology but is not a class",
                class_name
            )));
        }
        Ok(class)
    }

    /// Properties whose domain is the class, one of its named ancestors, or a union containing either
    pub fn declared_properties(&self, class: &Subject) -> Result<Vec<PropertySchema>> {
        let mut candidates: IndexSet<Subject> = IndexSet::new();

        for ancestor in self.named_lineage(class)? {
            let ancestor = Term::from(ancestor);
            let mut domains = vec![ancestor.clone()];
            domains.extend(self.unions_containing(&ancestor)?);

            for domain in &domains {
                candidates.extend(self.graph.subjects(vocab::DOMAIN, domain)?);
            }
        }

        let mut properties = Vec::with_capacity(candidates.len());
        for property in &candidates {
            let schema = self.property_schema(property)?;
            if schema.is_unnamed() {
                debug!("Skipping ontology-language property {}", property);
                continue;
            }
            properties.push(schema);
        }
        Ok(properties)
    }

    /// The class followed by its named superclasses, nearest first
    fn named_lineage(&self, class: &Subject) -> Result<Vec<Subject>> {
        let mut lineage: IndexSet<Subject> = IndexSet::new();
        lineage.insert(class.clone());

        let mut idx = 0;
        while idx < lineage.len() {
            let current = lineage[idx].clone();
            for parent in self.graph.objects(&current, vocab::SUB_CLASS_OF)? {
                if let Term::NamedNode(parent) = parent {
                    lineage.insert(parent.into());
                }
            }
            idx += 1;
        }
        Ok(lineage.into_iter().collect())
    }

    /// Anonymous `owl:unionOf` classes whose member list contains `class`
    fn unions_containing(&self, class: &Term) -> Result<Vec<Term>> {
        let mut unions = Vec::new();

        for cell in self.graph.subjects(vocab::FIRST, class)? {
            let mut head = cell;
            for _ in 0..MAX_LIST_DEPTH {
                match self.graph.subjects(vocab::REST, &Term::from(head.clone()))?.into_iter().next() {
                    Some(previous) => head = previous,
                    None => break,
                }
            }
            for owner in self.graph.subjects(vocab::UNION_OF, &Term::from(head))? {
                unions.push(Term::from(owner));
            }
        }
        Ok(unions)
    }

    /// Restrictions reached through `rdfs:subClassOf`, recursing through intermediate classes
    pub fn restrictions(&self, class: &Subject) -> Result<Vec<RestrictionSchema>> {
        let mut restrictions = Vec::new();
        let mut seen = HashSet::new();
        self.collect_restrictions(class, &mut seen, &mut restrictions)?;
        Ok(restrictions)
    }

    fn collect_restrictions(
        &self,
        class: &Subject,
        seen: &mut HashSet<Subject>,
        restrictions: &mut Vec<RestrictionSchema>,
    ) -> Result<()> {
        if !seen.insert(class.clone()) {
            return Ok(());
        }

        for parent in self.graph.objects(class, vocab::SUB_CLASS_OF)? {
            let Some(parent) = as_subject(&parent) else {
                continue;
            };
            if self.is_restriction(&parent)? {
                restrictions.push(self.restriction_schema(&parent)?);
            } else {
                self.collect_restrictions(&parent, seen, restrictions)?;
            }
        }
        Ok(())
    }

    /// Restrictions listed in anonymous `owl:intersectionOf` equivalents, in list order
    pub fn equality_restrictions(&self, class: &Subject) -> Result<Vec<RestrictionSchema>> {
        let mut equivalents = self.graph.objects(class, vocab::EQUIVALENT_CLASS)?;
        for other in self.graph.subjects(vocab::EQUIVALENT_CLASS, &Term::from(class.clone()))? {
            equivalents.push(Term::from(other));
        }

        let mut restrictions = Vec::new();
        for equivalent in equivalents {
            let Term::BlankNode(node) = equivalent else {
                continue;
            };
            let expression: Subject = node.into();
            let Some(head) = self.graph.object(&expression, vocab::INTERSECTION_OF)? else {
                continue;
            };

            for member in list_members(self.graph, &head)? {
                let Some(member) = as_subject(&member) else {
                    continue;
                };
                if self.is_restriction(&member)? {
                    restrictions.push(self.restriction_schema(&member)?);
                }
            }
        }
        Ok(restrictions)
    }

    fn is_restriction(&self, node: &Subject) -> Result<bool> {
        Ok(self.graph.has_type(node, vocab::RESTRICTION)?
            || self.graph.object(node, vocab::ON_PROPERTY)?.is_some())
    }

    /// Decode one `owl:Restriction`.
    ///
    /// Classification is first match wins: all-values-from, has-value,
    /// some-values-from, then the qualified cardinalities.
    pub fn restriction_schema(&self, restriction: &Subject) -> Result<RestrictionSchema> {
        let on_property = self
            .graph
            .object(restriction, vocab::ON_PROPERTY)?
            .and_then(|t| as_subject(&t))
            .ok_or_else(|| {
                OntologyError::RestrictionDecoding(format!(
                    "Restriction {} has no owl:onProperty",
                    restriction
                ))
            })?;

        let mut property = self.property_schema(&on_property)?;
        if property.object_property {
            for facet in [vocab::ON_CLASS, vocab::SOME_VALUES_FROM, vocab::ALL_VALUES_FROM] {
                if let Some(Term::NamedNode(range)) = self.graph.object(restriction, facet)? {
                    property.range = local_name(range.as_str()).to_string();
                    break;
                }
            }
        }

        if self.graph.object(restriction, vocab::ALL_VALUES_FROM)?.is_some() {
            return Ok(RestrictionSchema {
                on_property: property,
                restriction_type: RestrictionType::Only,
                exact_value: None,
                cardinality: None,
            });
        }

        if let Some(value) = self.graph.object(restriction, vocab::HAS_VALUE)? {
            return Ok(RestrictionSchema {
                on_property: property,
                restriction_type: RestrictionType::Value,
                exact_value: Some(term_text(&value)),
                cardinality: None,
            });
        }

        if self.graph.object(restriction, vocab::SOME_VALUES_FROM)?.is_some() {
            return Ok(RestrictionSchema {
                on_property: property,
                restriction_type: RestrictionType::Some,
                exact_value: None,
                cardinality: None,
            });
        }

        let (restriction_type, cardinality) = self.cardinality(restriction, &on_property)?;
        Ok(RestrictionSchema {
            on_property: property,
            restriction_type,
            exact_value: None,
            cardinality: Some(cardinality),
        })
    }

    fn cardinality(
        &self,
        restriction: &Subject,
        on_property: &Subject,
    ) -> Result<(RestrictionType, CardinalitySchema)> {
        let facets = [
            (vocab::QUALIFIED_CARDINALITY, RestrictionType::Exactly),
            (vocab::MAX_QUALIFIED_CARDINALITY, RestrictionType::Max),
            (vocab::MIN_QUALIFIED_CARDINALITY, RestrictionType::Min),
        ];

        for (facet, restriction_type) in facets {
            if let Some(count) = self.graph.object(restriction, facet)? {
                let cardinality = CardinalitySchema {
                    occurrence: term_text(&count),
                    data_range_restrictions: self.data_range_restrictions(restriction)?,
                };
                return Ok((restriction_type, cardinality));
            }
        }

        Err(OntologyError::RestrictionDecoding(format!(
            "Cannot calculate cardinality of restriction on {}: no qualified cardinality facet",
            on_property
        )))
    }

    /// Facets of `owl:onDataRange / owl:withRestrictions`, one entry per literal-valued triple
    fn data_range_restrictions(&self, restriction: &Subject) -> Result<Vec<DataRangeRestrictionSchema>> {
        let Some(data_range) = self
            .graph
            .object(restriction, vocab::ON_DATA_RANGE)?
            .and_then(|t| as_subject(&t))
        else {
            return Ok(Vec::new());
        };
        let Some(facets) = self.graph.object(&data_range, vocab::WITH_RESTRICTIONS)? else {
            return Ok(Vec::new());
        };

        let mut data_ranges = Vec::new();
        for member in list_members(self.graph, &facets)? {
            let Some(member) = as_subject(&member) else {
                continue;
            };
            for (predicate, object) in self.graph.properties(&member)? {
                if let Term::Literal(literal) = object {
                    data_ranges.push(DataRangeRestrictionSchema {
                        predicate: local_name(predicate.as_str()).to_string(),
                        value: literal.value().to_string(),
                        datatype: literal.datatype().as_str().to_string(),
                    });
                }
            }
        }
        Ok(data_ranges)
    }

    /// Decode a property declaration; language terms give the unnamed default
    pub fn property_schema(&self, property: &Subject) -> Result<PropertySchema> {
        let Some(iri) = subject_iri(property) else {
            return Ok(PropertySchema::default());
        };
        if vocab::is_language_term(iri) {
            return Ok(PropertySchema::default());
        }

        let range = match self.graph.object(property, vocab::RANGE)? {
            Some(range) => self.range_name(&range)?,
            None => String::new(),
        };

        Ok(PropertySchema {
            name: local_name(iri).to_string(),
            object_property: self.graph.has_type(property, vocab::OBJECT_PROPERTY)?,
            range,
            mandatory: self.graph.has_type(property, vocab::FUNCTIONAL_PROPERTY)?,
            symmetric: self.graph.has_type(property, vocab::SYMMETRIC_PROPERTY)?,
            reflexive: self.graph.has_type(property, vocab::REFLEXIVE_PROPERTY)?,
            irreflexive: self.graph.has_type(property, vocab::IRREFLEXIVE_PROPERTY)?,
        })
    }

    /// Enumerated ranges flatten to `a;b;c`, everything else to the local name
    fn range_name(&self, range: &Term) -> Result<String> {
        if let Some(node) = as_subject(range) {
            if let Some(one_of) = self.graph.object(&node, vocab::ONE_OF)? {
                let values: Vec<String> = list_members(self.graph, &one_of)?
                    .iter()
                    .map(term_text)
                    .collect();
                return Ok(values.join(ENUMERATION_SEPARATOR));
            }
        }

        Ok(match range {
            Term::NamedNode(node) => local_name(node.as_str()).to_string(),
            _ => String::new(),
        })
    }
}

/// Lexical form of a literal, local name of an IRI
fn term_text(term: &Term) -> String {
    match term {
        Term::Literal(literal) => literal.value().to_string(),
        Term::NamedNode(node) => local_name(node.as_str()).to_string(),
        _ => String::new(),
    }
}
