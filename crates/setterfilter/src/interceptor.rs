//! # Write Interception
//!
//! Every attribute write goes through an [`AttributeWriter`]. Which writer a
//! field gets is decided by the [`Interceptors`] descriptor table:
//!
//! - **Unfiltered** (default): [`Passthrough`] hands the value straight to
//!   the storage backend.
//! - **Filtered**: [`FilteredSetter`] reads the field's chain from the
//!   registry at write time, folds the value through it, then writes the
//!   result.
//!
//! A field moves from unfiltered to filtered the first time a declaration
//! selects it and never moves back. Installing twice is a no-op; the chain
//! length is what grows with further declarations, not the number of
//! interceptors.
//!
//! The fold runs to completion before the backend is touched, so a failing
//! filter leaves the stored value unchanged.

use crate::attributes::AttrValue;
use crate::error::Result;
use crate::filters::{apply_chain, FilterRegistry, FilterTable};
use crate::model::{ModelId, RecordKey};
use crate::store::StorageBackend;
use std::collections::{BTreeSet, HashMap};

/// Everything a writer may consult while handling one assignment.
pub struct WriteEnv<'a> {
    pub registry: &'a FilterRegistry,
    pub filters: &'a FilterTable,
    pub backend: &'a dyn StorageBackend,
    /// The record's model followed by its ancestors.
    pub lineage: &'a [ModelId],
}

/// The write entry point of one field.
pub trait AttributeWriter: Sync {
    fn write(
        &self,
        env: &WriteEnv<'_>,
        record: &RecordKey,
        field: &str,
        value: AttrValue,
    ) -> Result<()>;
}

/// Default writer: store the value as given.
pub struct Passthrough;

impl AttributeWriter for Passthrough {
    fn write(
        &self,
        env: &WriteEnv<'_>,
        record: &RecordKey,
        field: &str,
        value: AttrValue,
    ) -> Result<()> {
        env.backend.raw_write(record, field, value)
    }
}

/// Installed writer: run the field's current chain, then store.
pub struct FilteredSetter;

impl AttributeWriter for FilteredSetter {
    fn write(
        &self,
        env: &WriteEnv<'_>,
        record: &RecordKey,
        field: &str,
        value: AttrValue,
    ) -> Result<()> {
        let chain = env.registry.chain_for(env.lineage, field);
        tracing::trace!(record = %record, field, chain = ?chain, "applying filter chain");
        let filtered = apply_chain(env.filters, chain, field, value)?;
        env.backend.raw_write(record, field, filtered)
    }
}

static PASSTHROUGH: Passthrough = Passthrough;
static FILTERED: FilteredSetter = FilteredSetter;

/// Per-model table of fields with an installed [`FilteredSetter`].
#[derive(Debug, Default)]
pub struct Interceptors {
    installed: HashMap<ModelId, BTreeSet<String>>,
}

impl Interceptors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the filtered writer for `field` on `model`.
    ///
    /// Returns `true` if it was newly installed, `false` if it already was.
    pub fn install(&mut self, model: &ModelId, field: &str) -> bool {
        let newly = self
            .installed
            .entry(model.clone())
            .or_default()
            .insert(field.to_string());
        if newly {
            tracing::debug!(model = %model, field, "installed filtered setter");
        }
        newly
    }

    /// Whether any model in `lineage` has an interceptor on `field`.
    ///
    /// Interceptors installed on an ancestor apply to its subclasses.
    pub fn is_installed(&self, lineage: &[ModelId], field: &str) -> bool {
        lineage.iter().any(|model| {
            self.installed
                .get(model)
                .is_some_and(|fields| fields.contains(field))
        })
    }

    /// The writer to use for `field` on a record whose model has `lineage`.
    pub fn writer_for(&self, lineage: &[ModelId], field: &str) -> &'static dyn AttributeWriter {
        if self.is_installed(lineage, field) {
            &FILTERED
        } else {
            &PASSTHROUGH
        }
    }
}
