//! Attribute specifications and catalogs.
//!
//! This module defines the schema facts the filter machinery works from: the
//! type of each persistent column and the per-model catalog of filterable
//! attributes.

use crate::error::SetterFilterError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// The declared column type of an attribute.
///
/// Type-based selection rules (`only_types`, `except_types`) match on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Short string column (e.g. `VARCHAR`)
    String,
    /// Long text column
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Binary,
}

impl TypeTag {
    /// Returns the lowercase type name used in schema files and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Text => "text",
            TypeTag::Integer => "integer",
            TypeTag::Float => "float",
            TypeTag::Decimal => "decimal",
            TypeTag::Boolean => "boolean",
            TypeTag::Date => "date",
            TypeTag::DateTime => "datetime",
            TypeTag::Binary => "binary",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = SetterFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(TypeTag::String),
            "text" => Ok(TypeTag::Text),
            "integer" => Ok(TypeTag::Integer),
            "float" => Ok(TypeTag::Float),
            "decimal" => Ok(TypeTag::Decimal),
            "boolean" => Ok(TypeTag::Boolean),
            "date" => Ok(TypeTag::Date),
            "datetime" => Ok(TypeTag::DateTime),
            "binary" => Ok(TypeTag::Binary),
            other => Err(SetterFilterError::Configuration(format!(
                "unknown column type '{}'",
                other
            ))),
        }
    }
}

/// Specification for a single persistent attribute (one catalog entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSpec {
    /// The column name (e.g. "name", "bio")
    pub name: String,

    /// The column type
    #[serde(rename = "type")]
    pub kind: TypeTag,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, kind: TypeTag) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The filterable attributes of one model, in column order.
///
/// A catalog never contains the identity column: filters cannot be declared
/// on a primary key. Each name appears once; a column listed twice keeps its
/// first position and type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<AttributeSpec>,
}

impl Catalog {
    /// Build a catalog from a model's full column list, dropping `identity_field`
    /// and repeated column names.
    pub fn from_columns(columns: &[AttributeSpec], identity_field: &str) -> Self {
        let mut seen = HashSet::new();
        Self {
            entries: columns
                .iter()
                .filter(|column| column.name != identity_field)
                .filter(|column| seen.insert(column.name.clone()))
                .cloned()
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.entries.iter()
    }

    /// All attribute names, in column order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
