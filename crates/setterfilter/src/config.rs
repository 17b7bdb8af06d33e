//! # Configuration
//!
//! Configuration is managed by [`confique`], which handles layered loading
//! from a TOML file, environment variables and compiled defaults.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `SETTERFILTER_STRICT_FIELDS`, etc.
//! 2. **Config file**: the path passed to [`SetterFilterConfig::load`], if any.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `identity_field` | `id` | Column never included in a catalog |
//! | `strict_fields` | `false` | Reject `only`/`except` names missing from the catalog |
//! | `check_filters_on_declare` | `false` | Reject unknown filter names at declaration time |

use crate::error::{Result, SetterFilterError};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the filter declaration machinery, stored in `setterfilter.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetterFilterConfig {
    /// Name of the primary-key column excluded from every catalog.
    #[config(default = "id", env = "SETTERFILTER_IDENTITY_FIELD")]
    pub identity_field: String,

    /// When true, `only`/`except` names that are not in the catalog fail the
    /// declaration with `UnknownField` instead of being ignored.
    #[config(default = false, env = "SETTERFILTER_STRICT_FIELDS")]
    pub strict_fields: bool,

    /// When true, every filter name of a declaration must already be
    /// registered; otherwise unknown names only fail when a write runs them.
    #[config(default = false, env = "SETTERFILTER_CHECK_FILTERS_ON_DECLARE")]
    pub check_filters_on_declare: bool,
}

impl Default for SetterFilterConfig {
    fn default() -> Self {
        Self {
            identity_field: "id".to_string(),
            strict_fields: false,
            check_filters_on_declare: false,
        }
    }
}

impl SetterFilterConfig {
    /// Load from the environment, an optional TOML file, and defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        builder
            .load()
            .map_err(|e| SetterFilterError::ConfigLoad(e.to_string()))
    }

    /// Strict mode: unknown fields and unknown filters fail at declaration time.
    pub fn strict() -> Self {
        Self {
            strict_fields: true,
            check_filters_on_declare: true,
            ..Default::default()
        }
    }
}
