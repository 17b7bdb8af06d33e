//! # Filters
//!
//! A filter is a named transform `(field, value) -> value`. Filters are looked
//! up by name in a [`FilterTable`], so declarations only carry names and the
//! functions themselves are registered once per application.
//!
//! Per-model chains of filter names live in the [`FilterRegistry`]; folding a
//! value through a chain is [`apply_chain`].

mod builtin;
mod registry;

pub use builtin::BUILTINS;
pub use registry::{ChainMap, FilterChain, FilterRegistry};

use crate::attributes::AttrValue;
use crate::error::{Result, SetterFilterError};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A registered filter function.
///
/// Receives the field name and the current value and returns the next value.
/// Returning an error aborts the assignment that triggered the chain.
pub type FilterFn = Arc<dyn Fn(&str, AttrValue) -> Result<AttrValue> + Send + Sync>;

/// Name → function table used to resolve filter identifiers.
#[derive(Clone, Default)]
pub struct FilterTable {
    filters: HashMap<String, FilterFn>,
}

impl FilterTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table pre-populated with the [`BUILTINS`].
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for (name, filter) in BUILTINS {
            table.register(*name, *filter);
        }
        table
    }

    /// Register (or replace) a filter under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, filter: F) -> &mut Self
    where
        F: Fn(&str, AttrValue) -> Result<AttrValue> + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
        self
    }

    /// Look up a filter by name.
    pub fn resolve(&self, name: &str) -> Result<&FilterFn> {
        self.filters
            .get(name)
            .ok_or_else(|| SetterFilterError::UnknownFilter(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FilterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterTable")
            .field("filters", &self.names())
            .finish()
    }
}

/// Fold `value` through `chain`, strictly in order.
///
/// Each filter gets `field` and the previous filter's output. The first
/// unknown or failing filter stops the fold and its error is returned.
pub fn apply_chain<S: AsRef<str>>(
    table: &FilterTable,
    chain: &[S],
    field: &str,
    value: AttrValue,
) -> Result<AttrValue> {
    chain.iter().try_fold(value, |acc, name| {
        let filter = table.resolve(name.as_ref())?;
        filter(field, acc)
    })
}
