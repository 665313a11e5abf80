//! Schema Model: what an OWL class requires of its individuals
//!
//! Produced fresh by every introspection call and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::Result;

/// Separator used when an enumerated range is flattened into one string
pub const ENUMERATION_SEPARATOR: &str = ";";

/// Full schema of one OWL class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchema {
    pub class_name: String,
    /// Properties whose domain includes the class
    pub properties: Vec<PropertySchema>,
    /// Restrictions reached through `rdfs:subClassOf`
    pub restrictions: Vec<RestrictionSchema>,
    /// Restrictions reached through `owl:equivalentClass` intersections
    pub equality_restrictions: Vec<RestrictionSchema>,
}

impl ClassSchema {
    /// Declared property by local name
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Every restriction, superclass axioms first
    pub fn all_restrictions(&self) -> impl Iterator<Item = &RestrictionSchema> {
        self.restrictions.iter().chain(self.equality_restrictions.iter())
    }

    /// Pretty-printed JSON, camelCase keys
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Declared property of a class.
///
/// Language terms (OWL/RDF/RDFS/XSD) decode to the default value, whose name is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    pub name: String,
    pub object_property: bool,
    /// Local name of the range class, or the `;`-joined values of an enumerated range
    pub range: String,
    /// Functional property
    pub mandatory: bool,
    pub symmetric: bool,
    pub reflexive: bool,
    pub irreflexive: bool,
}

impl PropertySchema {
    pub fn is_unnamed(&self) -> bool {
        self.name.is_empty()
    }

    /// Candidate values when the range is an enumeration
    pub fn range_choices(&self) -> Vec<&str> {
        self.range
            .split(ENUMERATION_SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn is_enumerated(&self) -> bool {
        self.range.contains(ENUMERATION_SEPARATOR)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionType {
    Only,
    Some,
    Value,
    Exactly,
    Min,
    Max,
}

impl RestrictionType {
    pub fn as_str(self) -> &'static str {
        match self {
            RestrictionType::Only => "only",
            RestrictionType::Some => "some",
            RestrictionType::Value => "value",
            RestrictionType::Exactly => "exactly",
            RestrictionType::Min => "min",
            RestrictionType::Max => "max",
        }
    }

    pub fn is_cardinality(self) -> bool {
        matches!(self, RestrictionType::Exactly | RestrictionType::Min | RestrictionType::Max)
    }
}

impl fmt::Display for RestrictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionSchema {
    pub on_property: PropertySchema,
    #[serde(rename = "type")]
    pub restriction_type: RestrictionType,
    /// Only for `value` restrictions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_value: Option<String>,
    /// Only for `exactly`/`min`/`max` restrictions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<CardinalitySchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardinalitySchema {
    /// Lexical form of the cardinality literal
    pub occurrence: String,
    pub data_range_restrictions: Vec<DataRangeRestrictionSchema>,
}

impl CardinalitySchema {
    pub fn occurrence_count(&self) -> Option<u64> {
        self.occurrence.trim().parse().ok()
    }
}

/// One facet on a data range, e.g. `xsd:minInclusive 3`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRangeRestrictionSchema {
    /// Local name of the facet predicate (`minInclusive`, `maxLength`, ...)
    pub predicate: String,
    pub value: String,
    pub datatype: String,
}
