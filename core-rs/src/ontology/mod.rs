/**
 * ontology module
 *
 * - vocab: OWL / RDF / RDFS / XSD terms
 * - graph: node-accessor trait the introspector walks, plus the RDF-list walker
 * - library: loaded ontology model (Oxigraph store)
 * - schema: ClassSchema and friends
 * - introspector: derives a ClassSchema from the OWL axioms of a class
 */

pub mod graph;
pub mod introspector;
pub mod library;
pub mod schema;
pub mod vocab;

pub use graph::{list_members, OntologyGraph};
pub use introspector::SchemaIntrospector;
pub use library::{OntologyLibrary, RdfSyntax};
pub use schema::{
    CardinalitySchema, ClassSchema, DataRangeRestrictionSchema, PropertySchema, RestrictionSchema,
    RestrictionType, ENUMERATION_SEPARATOR,
};
pub use vocab::local_name;
