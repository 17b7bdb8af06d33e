//! # Schema Introspection
//!
//! The filter machinery does not own model schemas; it asks a
//! [`SchemaSource`] for each model's columns and parent. [`Schema`] is the
//! in-memory implementation, built in code or loaded from JSON:
//!
//! ```json
//! {
//!   "models": [
//!     { "name": "user", "columns": [
//!         { "name": "id", "type": "integer" },
//!         { "name": "name", "type": "string" } ] },
//!     { "name": "admin", "parent": "user" }
//!   ]
//! }
//! ```

use crate::attributes::{AttributeSpec, Catalog};
use crate::error::{Result, SetterFilterError};
use crate::model::{ModelDef, ModelId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Abstract source of schema facts.
pub trait SchemaSource {
    /// All persistent columns of `model`, identity column included.
    fn columns(&self, model: &ModelId) -> Result<Vec<AttributeSpec>>;

    /// The model `model` inherits from, if any.
    fn parent(&self, model: &ModelId) -> Result<Option<ModelId>>;

    /// The filterable attributes of `model`.
    fn catalog(&self, model: &ModelId, identity_field: &str) -> Result<Catalog> {
        Ok(Catalog::from_columns(&self.columns(model)?, identity_field))
    }

    /// `model` followed by its ancestors, nearest first.
    fn lineage(&self, model: &ModelId) -> Result<Vec<ModelId>> {
        let mut lineage = vec![model.clone()];
        let mut seen: HashSet<ModelId> = HashSet::from([model.clone()]);
        let mut current = model.clone();
        while let Some(parent) = self.parent(&current)? {
            if !seen.insert(parent.clone()) {
                return Err(SetterFilterError::Configuration(format!(
                    "inheritance cycle through model '{}'",
                    parent
                )));
            }
            lineage.push(parent.clone());
            current = parent;
        }
        Ok(lineage)
    }
}

/// In-memory schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(with = "model_list")]
    models: BTreeMap<ModelId, ModelDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a model definition.
    pub fn define(&mut self, def: ModelDef) -> &mut Self {
        self.models.insert(def.name.clone(), def);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn contains(&self, model: &ModelId) -> bool {
        self.models.contains_key(model)
    }

    fn get(&self, model: &ModelId) -> Result<&ModelDef> {
        self.models
            .get(model)
            .ok_or_else(|| SetterFilterError::UnknownModel(model.to_string()))
    }
}

impl SchemaSource for Schema {
    fn columns(&self, model: &ModelId) -> Result<Vec<AttributeSpec>> {
        for ancestor in self.lineage(model)? {
            let def = self.get(&ancestor)?;
            if !def.columns.is_empty() {
                return Ok(def.columns.clone());
            }
        }
        Ok(Vec::new())
    }

    fn parent(&self, model: &ModelId) -> Result<Option<ModelId>> {
        Ok(self.get(model)?.parent.clone())
    }
}

/// Serialize the model map as a `models` list of definitions.
mod model_list {
    use super::{ModelDef, ModelId};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        models: &BTreeMap<ModelId, ModelDef>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&ModelDef> = models.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<ModelId, ModelDef>, D::Error> {
        let list = Vec::<ModelDef>::deserialize(deserializer)?;
        Ok(list
            .into_iter()
            .map(|def| (def.name.clone(), def))
            .collect())
    }
}
