//! Per-model filter chains.
//!
//! The registry maps each model to a [`ChainMap`] (field → [`FilterChain`]).
//! It is owned by the application facade and grows monotonically: chains are
//! appended to, never reordered, deduplicated or removed.
//!
//! ## Inheritance
//!
//! Lookups take a model's *lineage* (the model followed by its ancestors,
//! nearest first) and are resolved per field: the first model in the
//! lineage with a chain for that field answers. A subclass therefore sees
//! its ancestors' chains, including ones declared later, for every field it
//! has not declared on itself. The first time a subclass declares on a
//! field, the nearest ancestor's chain for that field is copied and the
//! new filters are appended to the copy; from then on that field evolves
//! independently of the ancestor.

use crate::model::ModelId;
use std::collections::{BTreeMap, HashMap};

/// Ordered filter names for one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterChain {
    filters: Vec<String>,
}

impl FilterChain {
    /// Append `filters` after the existing ones.
    pub fn append<I, S>(&mut self, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.extend(filters.into_iter().map(Into::into));
    }

    pub fn as_slice(&self) -> &[String] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// The chains of one model, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainMap {
    chains: BTreeMap<String, FilterChain>,
}

impl ChainMap {
    /// Append `filters` to `field`'s chain, creating it if absent.
    pub fn append<I, S>(&mut self, field: &str, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chains
            .entry(field.to_string())
            .or_default()
            .append(filters);
    }

    pub fn get(&self, field: &str) -> Option<&FilterChain> {
        self.chains.get(field)
    }
}

#[derive(Debug, Default)]
pub struct FilterRegistry {
    models: HashMap<ModelId, ChainMap>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the chain map owned by `lineage[0]`, creating it empty on first use.
    ///
    /// An empty lineage has no owner; callers always pass at least the
    /// model itself.
    pub fn ensure(&mut self, lineage: &[ModelId]) -> Option<&mut ChainMap> {
        let model = lineage.first()?;
        Some(self.models.entry(model.clone()).or_default())
    }

    /// Append `filters` to `field`'s chain on `lineage[0]`.
    ///
    /// If `lineage[0]` has no chain for `field` yet, the inherited chain is
    /// copied first so ancestor filters keep running ahead of the new ones.
    pub fn append<I, S>(&mut self, lineage: &[ModelId], field: &str, filters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(model) = lineage.first() else {
            return;
        };
        let owns_field = self
            .models
            .get(model)
            .is_some_and(|map| map.get(field).is_some());
        let inherited = if owns_field {
            Vec::new()
        } else {
            self.chain_for(&lineage[1..], field).to_vec()
        };
        if let Some(map) = self.ensure(lineage) {
            map.append(field, inherited);
            map.append(field, filters);
        }
    }

    /// The current chain for `field`; empty when nothing was declared.
    pub fn chain_for(&self, lineage: &[ModelId], field: &str) -> &[String] {
        lineage
            .iter()
            .find_map(|model| self.models.get(model).and_then(|map| map.get(field)))
            .map(FilterChain::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `model` itself owns a chain map.
    pub fn has_own_chains(&self, model: &ModelId) -> bool {
        self.models.contains_key(model)
    }
}
