/**
 * library.rs
 * Loaded OWL ontology model backed by an in-memory Oxigraph store
 */

use oxigraph::io::RdfFormat;
use oxigraph::model::{NamedNode, NamedNodeRef, Subject, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::errors::{OntologyError, Result};
use crate::ontology::graph::OntologyGraph;

/// Serialization of an ontology document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfSyntax {
    RdfXml,
    Turtle,
    NTriples,
}

impl RdfSyntax {
    fn format(self) -> RdfFormat {
        match self {
            RdfSyntax::RdfXml => RdfFormat::RdfXml,
            RdfSyntax::Turtle => RdfFormat::Turtle,
            RdfSyntax::NTriples => RdfFormat::NTriples,
        }
    }
}

impl FromStr for RdfSyntax {
    type Err = OntologyError;

    /// Accepts the names ontology tooling usually writes (`RDF/XML`, `TURTLE`, `TTL`, `N-TRIPLES`)
    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "RDF/XML" | "RDFXML" | "XML" | "OWL" => Ok(RdfSyntax::RdfXml),
            "TURTLE" | "TTL" => Ok(RdfSyntax::Turtle),
            "N-TRIPLES" | "NTRIPLES" | "NT" => Ok(RdfSyntax::NTriples),
            other => Err(OntologyError::Load(format!(
                "Unsupported ontology type: {} (expected RDF/XML, TURTLE or N-TRIPLES)",
                other
            ))),
        }
    }
}

/// Ontology loaded once, then shared read-only with every introspection call
pub struct OntologyLibrary {
    store: Store,
}

impl OntologyLibrary {
    /// Create an empty library
    pub fn new() -> Result<Self> {
        let store = Store::new().map_err(|e| OntologyError::Store(e.to_string()))?;
        Ok(Self { store })
    }

    /// Load an ontology document from disk
    pub fn load<P: AsRef<Path>>(path: P, syntax: RdfSyntax) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading ontology file: {}", path.display());

        if path.is_dir() {
            return Err(OntologyError::Load(format!("Path is a directory: {}", path.display())));
        }

        let content = fs::read_to_string(path)?;
        let library = Self::parse(&content, syntax)?;
        info!("Ontology loaded from {} ({} triples)", path.display(), library.len()?);
        Ok(library)
    }

    /// Parse an ontology held in memory
    pub fn parse(content: &str, syntax: RdfSyntax) -> Result<Self> {
        let library = Self::new()?;
        library.add(content, syntax)?;
        Ok(library)
    }

    /// Merge more triples into the model (setup only; the model is read-only afterwards)
    pub fn add(&self, content: &str, syntax: RdfSyntax) -> Result<()> {
        self.store
            .load_from_reader(syntax.format(), content.as_bytes())
            .map_err(|e| OntologyError::Load(e.to_string()))
    }

    /// Number of triples in the model
    pub fn len(&self) -> Result<usize> {
        self.store.len().map_err(|e| OntologyError::Store(e.to_string()))
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty().map_err(|e| OntologyError::Store(e.to_string()))
    }

    /// Run a SPARQL query over the loaded model itself
    pub fn query_sparql(&self, query: &str) -> Result<Vec<HashMap<String, String>>> {
        let results = self
            .store
            .query(query)
            .map_err(|e| OntologyError::QueryConstruction(e.to_string()))?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();

                for solution in solutions {
                    let solution = solution.map_err(|e| OntologyError::Store(e.to_string()))?;

                    let mut row = HashMap::new();
                    for (var, term) in solution.iter() {
                        let value = match term {
                            Term::NamedNode(node) => node.as_str().to_string(),
                            Term::Literal(literal) => literal.value().to_string(),
                            other => other.to_string(),
                        };
                        row.insert(var.as_str().to_string(), value);
                    }
                    rows.push(row);
                }

                Ok(rows)
            }
            QueryResults::Boolean(result) => {
                let mut row = HashMap::new();
                row.insert("result".to_string(), result.to_string());
                Ok(vec![row])
            }
            QueryResults::Graph(_) => Err(OntologyError::QueryConstruction(
                "Graph queries are not supported over the ontology model".to_string(),
            )),
        }
    }

    /// IRIs of every named `owl:Class` in the model, sorted
    pub fn class_iris(&self) -> Result<Vec<String>> {
        let rows = self.query_sparql(
            r#"
            PREFIX owl: <http://www.w3.org/2002/07/owl#>

            SELECT DISTINCT ?class
            WHERE {
                ?class a owl:Class .
                FILTER(isIRI(?class))
            }
            ORDER BY ?class
            "#,
        )?;

        Ok(rows.into_iter().filter_map(|mut row| row.remove("class")).collect())
    }
}

impl OntologyGraph for OntologyLibrary {
    fn objects(&self, subject: &Subject, predicate: NamedNodeRef<'_>) -> Result<Vec<Term>> {
        self.store
            .quads_for_pattern(Some(subject.as_ref()), Some(predicate), None, None)
            .map(|quad| {
                quad.map(|q| q.object)
                    .map_err(|e| OntologyError::Store(e.to_string()))
            })
            .collect()
    }

    fn subjects(&self, predicate: NamedNodeRef<'_>, object: &Term) -> Result<Vec<Subject>> {
        self.store
            .quads_for_pattern(None, Some(predicate), Some(object.as_ref()), None)
            .map(|quad| {
                quad.map(|q| q.subject)
                    .map_err(|e| OntologyError::Store(e.to_string()))
            })
            .collect()
    }

    fn properties(&self, subject: &Subject) -> Result<Vec<(NamedNode, Term)>> {
        let pairs: Vec<(NamedNode, Term)> = self
            .store
            .quads_for_pattern(Some(subject.as_ref()), None, None, None)
            .map(|quad| {
                quad.map(|q| (q.predicate, q.object))
                    .map_err(|e| OntologyError::Store(e.to_string()))
            })
            .collect::<Result<_>>()?;
        debug!("{} has {} properties", subject, pairs.len());
        Ok(pairs)
    }
}
