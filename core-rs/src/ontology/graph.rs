/**
 * graph.rs
 * Node-accessor capability over a loaded ontology model
 */

use oxigraph::model::{NamedNode, NamedNodeRef, Subject, Term};
use std::collections::HashSet;
use tracing::warn;

use crate::errors::Result;
use crate::ontology::vocab;

/// Upper bound on RDF-list walks; well-formed lists are far shorter.
pub const MAX_LIST_DEPTH: usize = 10_000;

/// Read access to the triples of a loaded ontology.
///
/// The introspector only ever asks these questions, so any RDF library able to
/// answer them can back it.
pub trait OntologyGraph {
    /// Objects of every `subject predicate ?o` triple
    fn objects(&self, subject: &Subject, predicate: NamedNodeRef<'_>) -> Result<Vec<Term>>;

    /// Subjects of every `?s predicate object` triple
    fn subjects(&self, predicate: NamedNodeRef<'_>, object: &Term) -> Result<Vec<Subject>>;

    /// Every `(predicate, object)` pair attached to a node
    fn properties(&self, subject: &Subject) -> Result<Vec<(NamedNode, Term)>>;

    /// True when the node appears as the subject of at least one triple
    fn contains_subject(&self, subject: &Subject) -> Result<bool> {
        Ok(!self.properties(subject)?.is_empty())
    }

    fn object(&self, subject: &Subject, predicate: NamedNodeRef<'_>) -> Result<Option<Term>> {
        Ok(self.objects(subject, predicate)?.into_iter().next())
    }

    fn has_type(&self, subject: &Subject, class: NamedNodeRef<'_>) -> Result<bool> {
        Ok(self
            .objects(subject, vocab::TYPE)?
            .iter()
            .any(|t| matches!(t, Term::NamedNode(n) if n.as_ref() == class)))
    }
}

/// Resource terms can stand in subject position; literals cannot.
pub fn as_subject(term: &Term) -> Option<Subject> {
    match term {
        Term::NamedNode(node) => Some(node.clone().into()),
        Term::BlankNode(node) => Some(node.clone().into()),
        _ => None,
    }
}

/// IRI of a named node, `None` for blank nodes
pub fn subject_iri(subject: &Subject) -> Option<&str> {
    match subject {
        Subject::NamedNode(node) => Some(node.as_str()),
        _ => None,
    }
}

/// Members of the RDF list starting at `head`, in list order.
///
/// Stops at `rdf:nil`, at a node without `rdf:first` or `rdf:rest`, at a node
/// already visited, or after [`MAX_LIST_DEPTH`] cells.
pub fn list_members<G: OntologyGraph + ?Sized>(graph: &G, head: &Term) -> Result<Vec<Term>> {
    let mut members = Vec::new();
    let mut seen = HashSet::new();
    let mut current = head.clone();

    loop {
        if matches!(&current, Term::NamedNode(n) if n.as_ref() == vocab::NIL) {
            break;
        }
        let Some(cell) = as_subject(&current) else {
            break;
        };
        if !seen.insert(cell.clone()) {
            warn!("RDF list revisits node {}, stopping walk", cell);
            break;
        }
        if seen.len() > MAX_LIST_DEPTH {
            warn!("RDF list exceeds {} cells, stopping walk", MAX_LIST_DEPTH);
            break;
        }

        let Some(first) = graph.object(&cell, vocab::FIRST)? else {
            break;
        };
        members.push(first);

        match graph.object(&cell, vocab::REST)? {
            Some(rest) => current = rest,
            None => break,
        }
    }

    Ok(members)
}
