//! # API Facade
//!
//! [`SetterFilterApi`] owns every piece of class-scoped state the filter
//! machinery needs (filter table, chain registry, interceptor table) together
//! with the schema source and the storage backend. One instance per
//! application; there are no hidden globals.
//!
//! ## Declaration Time
//!
//! [`SetterFilterApi::setter_filter`] runs, in order:
//!
//! 1. **Validation**: the [`Selection`] must hold at most one option
//!    (`Configuration` error otherwise); in strict mode unknown fields and
//!    unknown filters are rejected. Nothing is modified if any check fails.
//! 2. **Selection**: the rule is resolved against the model's catalog.
//! 3. **Accumulation**: the filters are appended to each selected field's
//!    chain in the registry.
//! 4. **Installation**: each selected field gets a filtered setter (once).
//!
//! ## Assignment Time
//!
//! [`SetterFilterApi::assign`] picks the field's writer from the interceptor
//! table. Filtered fields fold the value through their *current* chain and
//! write the result; all other fields are written as given.
//!
//! ## Generic Over Schema and Storage
//!
//! `SetterFilterApi<S: SchemaSource, B: StorageBackend>`:
//! - Production: the embedder's schema introspection and persistence layer
//! - Testing: `SetterFilterApi<Schema, MemBackend>`
//!
//! ## Concurrency
//!
//! Declarations take `&mut self`; assignments and reads take `&self`. The
//! facade is `Sync` whenever `S` and `B` are, so a fully declared facade can
//! be shared across threads that assign concurrently. [`MemBackend`] keeps
//! its records in a `RefCell` and is single-threaded; embedders sharing a
//! facade need a backend that synchronizes internally.
//!
//! [`MemBackend`]: crate::store::MemBackend

use crate::attributes::{resolve, unknown_fields, AttrValue, Selection};
use crate::config::SetterFilterConfig;
use crate::error::{Result, SetterFilterError};
use crate::filters::{FilterRegistry, FilterTable};
use crate::interceptor::{Interceptors, WriteEnv};
use crate::model::{ModelId, RecordKey};
use crate::schema::SchemaSource;
use crate::store::StorageBackend;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One filter declaration: which filters, on which attributes.
///
/// Deserializes from a flat map, e.g.
/// `{"filters": ["strip", "downcase"], "except_types": ["text"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub filters: Vec<String>,
    #[serde(flatten)]
    pub selection: Selection,
}

impl Declaration {
    pub fn new<I, S>(filters: I, selection: Selection) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filters: filters.into_iter().map(Into::into).collect(),
            selection,
        }
    }
}

/// The main API facade for attribute filtering.
pub struct SetterFilterApi<S: SchemaSource, B: StorageBackend> {
    schema: S,
    backend: B,
    config: SetterFilterConfig,
    filters: FilterTable,
    registry: FilterRegistry,
    interceptors: Interceptors,
}

impl<S: SchemaSource, B: StorageBackend> SetterFilterApi<S, B> {
    /// A facade with the built-in filters registered.
    pub fn new(schema: S, backend: B, config: SetterFilterConfig) -> Self {
        Self::with_filters(schema, backend, config, FilterTable::with_builtins())
    }

    pub fn with_filters(
        schema: S,
        backend: B,
        config: SetterFilterConfig,
        filters: FilterTable,
    ) -> Self {
        Self {
            schema,
            backend,
            config,
            filters,
            registry: FilterRegistry::new(),
            interceptors: Interceptors::new(),
        }
    }

    /// Register (or replace) a named filter.
    pub fn register_filter<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(&str, AttrValue) -> Result<AttrValue> + Send + Sync + 'static,
    {
        self.filters.register(name, filter);
        self
    }

    /// Declare `filters` for the attributes of `model` picked by `selection`.
    ///
    /// Returns the selected field names in catalog order.
    pub fn setter_filter<I, T>(
        &mut self,
        model: &ModelId,
        filters: I,
        selection: Selection,
    ) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let filters: Vec<String> = filters.into_iter().map(Into::into).collect();
        let rule = selection.into_rule()?;
        let catalog = self.schema.catalog(model, &self.config.identity_field)?;
        let lineage = self.schema.lineage(model)?;

        if self.config.strict_fields {
            if let Some(field) = unknown_fields(&catalog, &rule).first() {
                return Err(SetterFilterError::UnknownField {
                    model: model.to_string(),
                    field: field.to_string(),
                });
            }
        }
        if self.config.check_filters_on_declare {
            for name in &filters {
                self.filters.resolve(name)?;
            }
        }

        let fields = resolve(&catalog, &rule);
        for field in &fields {
            self.registry
                .append(&lineage, field, filters.iter().cloned());
            self.interceptors.install(model, field);
        }

        tracing::debug!(
            model = %model,
            filters = ?filters,
            fields = ?fields,
            "declared setter filters"
        );
        Ok(fields)
    }

    /// Apply a [`Declaration`] (e.g. one read from a file).
    pub fn declare(&mut self, model: &ModelId, declaration: &Declaration) -> Result<Vec<String>> {
        self.setter_filter(
            model,
            declaration.filters.iter().cloned(),
            declaration.selection.clone(),
        )
    }

    /// Create an empty record of `model`.
    pub fn new_record(&self, model: &ModelId) -> Result<RecordKey> {
        // Fails with UnknownModel for models the schema does not know.
        self.schema.lineage(model)?;
        self.backend.create_record(model)
    }

    /// Assign `value` to `field`, running the field's filter chain if it has one.
    ///
    /// On error nothing is written.
    pub fn assign(
        &self,
        record: &RecordKey,
        field: &str,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        let lineage = self.schema.lineage(&record.model)?;
        let env = WriteEnv {
            registry: &self.registry,
            filters: &self.filters,
            backend: &self.backend,
            lineage: &lineage,
        };
        self.interceptors
            .writer_for(&lineage, field)
            .write(&env, record, field, value.into())
    }

    /// Assign several attributes in the given order, stopping at the first error.
    pub fn assign_all<I, K, V>(&self, record: &RecordKey, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        for (field, value) in values {
            self.assign(record, field.as_ref(), value)?;
        }
        Ok(())
    }

    /// Read the stored value of `field`.
    pub fn read(&self, record: &RecordKey, field: &str) -> Result<Option<AttrValue>> {
        self.backend.raw_read(record, field)
    }

    /// Read every stored value of a record.
    pub fn read_record(&self, record: &RecordKey) -> Result<BTreeMap<String, AttrValue>> {
        self.backend.read_record(record)
    }

    /// The current filter chain of `field` on `model`.
    pub fn chain_for(&self, model: &ModelId, field: &str) -> Result<Vec<String>> {
        let lineage = self.schema.lineage(model)?;
        Ok(self.registry.chain_for(&lineage, field).to_vec())
    }

    /// Whether writes to `field` on `model` go through a filter chain.
    pub fn is_filtered(&self, model: &ModelId, field: &str) -> Result<bool> {
        let lineage = self.schema.lineage(model)?;
        Ok(self.interceptors.is_installed(&lineage, field))
    }

    pub fn config(&self) -> &SetterFilterConfig {
        &self.config
    }

    pub fn filters(&self) -> &FilterTable {
        &self.filters
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }
}
