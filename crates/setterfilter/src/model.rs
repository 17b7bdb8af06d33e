//! Core data types: model identifiers, model definitions and record keys.

use crate::attributes::AttributeSpec;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a model (the "class" that declarations attach to).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModelId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Definition of a model as known to the schema.
///
/// `columns` includes the identity column; catalogs drop it. A model with a
/// `parent` and no columns of its own uses its parent's columns (single
/// table inheritance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDef {
    pub name: ModelId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ModelId>,
    #[serde(default)]
    pub columns: Vec<AttributeSpec>,
}

impl ModelDef {
    pub fn new(name: impl Into<ModelId>, columns: Vec<AttributeSpec>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            columns,
        }
    }

    /// A model inheriting from `parent`.
    pub fn subclass(name: impl Into<ModelId>, parent: impl Into<ModelId>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
            columns: Vec::new(),
        }
    }
}

/// Handle to one stored record (an "instance" of a model).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub model: ModelId,
    pub id: Uuid,
}

impl RecordKey {
    pub fn new(model: ModelId) -> Self {
        Self {
            model,
            id: Uuid::new_v4(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.model, self.id)
    }
}
