/**
 * service.rs
 * Ontology service: schema introspection plus query execution for one dataset
 */

use tracing::info;

use crate::config::DatasetProperties;
use crate::drivers::{HttpDriver, QueryExecutor, Row};
use crate::errors::{OntologyError, Result};
use crate::ontology::{local_name, ClassSchema, OntologyLibrary, RdfSyntax, SchemaIntrospector, ENUMERATION_SEPARATOR};
use crate::query::{AskBuilder, AskQuery, InsertBuilder, InsertParam, InsertQuery, ParamValue, SelectBuilder, SelectQuery};

/// Value family a property range maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    Text,
    Integer,
    Boolean,
}

/// Loaded ontology, dataset settings and an executor, bundled
pub struct OntologyService<E: QueryExecutor> {
    props: DatasetProperties,
    library: OntologyLibrary,
    executor: E,
}

impl OntologyService<HttpDriver> {
    /// Load the configured ontology and connect to the configured store
    pub fn from_config(props: DatasetProperties) -> Result<Self> {
        let syntax: RdfSyntax = props.ontology_type.parse()?;
        let library = OntologyLibrary::load(&props.ontology_location, syntax)?;
        let executor = HttpDriver::from_config(&props)?;
        info!("Ontology service ready for {}", props.store_url);
        Ok(Self::new(props, library, executor))
    }
}

impl<E: QueryExecutor> OntologyService<E> {
    pub fn new(props: DatasetProperties, library: OntologyLibrary, executor: E) -> Self {
        Self {
            props,
            library,
            executor,
        }
    }

    pub fn props(&self) -> &DatasetProperties {
        &self.props
    }

    pub fn library(&self) -> &OntologyLibrary {
        &self.library
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn introspector(&self) -> SchemaIntrospector<'_, OntologyLibrary> {
        SchemaIntrospector::new(&self.library, self.props.namespace.clone())
    }

    pub fn class_schema(&self, class_name: &str) -> Result<ClassSchema> {
        self.introspector().class_schema(class_name)
    }

    /// `Word` -> `mci:Word`
    pub fn prefixed_entity(&self, name: &str) -> String {
        format!("{}:{}", self.props.prefix, name)
    }

    /// `mci:Word`, `<mci:Word>` or a full IRI -> `Word`
    pub fn remove_prefix(&self, entity: &str) -> String {
        let entity = entity.trim().trim_start_matches('<').trim_end_matches('>');
        if entity.contains("://") {
            return local_name(entity).to_string();
        }
        match entity.split_once(':') {
            Some((_, local)) => local.to_string(),
            None => entity.to_string(),
        }
    }

    /// Value family of an XSD range name; enumerated ranges are text
    pub fn range_kind(&self, owl_type: &str) -> Option<RangeKind> {
        match owl_type {
            "string" | "anyURI" => Some(RangeKind::Text),
            "positiveInteger" | "integer" | "long" | "int" => Some(RangeKind::Integer),
            "boolean" => Some(RangeKind::Boolean),
            other if other.contains(ENUMERATION_SEPARATOR) => Some(RangeKind::Text),
            _ => None,
        }
    }

    pub fn ask(&self, query: &AskQuery) -> Result<bool> {
        self.executor.ask(query)
    }

    pub fn select(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        self.executor.select(query)
    }

    pub fn insert(&self, query: &InsertQuery) -> Result<bool> {
        self.executor.insert(query)
    }

    /// Whether `subject predicate object` is stated in the dataset
    pub fn ask_triple(&self, subject: &str, predicate: &str, object: ParamValue) -> Result<bool> {
        let query = AskBuilder::new()
            .add_iri_param("s", subject)
            .add_iri_param("p", predicate)
            .is("s", "p", "o");
        let query = bind_object(query, object).build()?;
        self.ask(&query)
    }

    /// Rows for `subject ?p ?o`, with the predicate and object narrowed when given.
    /// Only the open positions are projected.
    pub fn select_triple(
        &self,
        subject: &str,
        predicate: Option<&str>,
        object: Option<ParamValue>,
    ) -> Result<Vec<Row>> {
        let mut builder = SelectBuilder::new().add_iri_param("s", subject);
        let mut projection = Vec::new();

        match predicate {
            Some(predicate) => builder = builder.add_iri_param("p", predicate),
            None => projection.push("p"),
        }
        match object {
            Some(ParamValue::Iri(iri)) => builder = builder.add_iri_param("o", &iri),
            Some(ParamValue::Str(text)) => builder = builder.add_literal_param("o", &text),
            Some(ParamValue::Int(n)) => builder = builder.add_int_param("o", n),
            Some(ParamValue::Long(n)) => builder = builder.add_long_param("o", n),
            Some(ParamValue::Bool(b)) => builder = builder.add_bool_param("o", b),
            None => projection.push("o"),
        }

        if projection.is_empty() {
            return Err(OntologyError::QueryConstruction(format!(
                "select on {} has no open position; ask instead",
                subject
            )));
        }

        let query = builder.select(&projection).where_("s", "p", "o").build()?;
        self.select(&query)
    }

    /// Insert `subject` as an individual of `class_name` together with one relation
    pub fn insert_triple(
        &self,
        subject: &str,
        class_name: &str,
        predicate: &str,
        object: ParamValue,
    ) -> Result<bool> {
        let query = InsertBuilder::new()
            .insert_entry(InsertParam::iri("subject", subject), &self.prefixed_entity(class_name))
            .add_relation(InsertParam::iri("predicate", predicate), InsertParam::new("object", object))
            .build()?;
        self.insert(&query)
    }
}

fn bind_object(builder: AskBuilder, object: ParamValue) -> AskBuilder {
    match object {
        ParamValue::Iri(iri) => builder.add_iri_param("o", &iri),
        ParamValue::Str(text) => builder.add_literal_param("o", &text),
        ParamValue::Int(n) => builder.add_int_param("o", n),
        ParamValue::Long(n) => builder.add_long_param("o", n),
        ParamValue::Bool(b) => builder.add_bool_param("o", b),
    }
}
