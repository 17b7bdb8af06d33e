//! # Setter Filter Architecture
//!
//! Setterfilter lets a model declare, once, that assignments to some of its
//! attributes pass through an ordered chain of named transforms before they
//! reach storage:
//!
//! ```ignore
//! api.setter_filter(&user, ["strip", "downcase"], Selection::all().only(["email"]))?;
//! api.assign(&record, "email", "  Ada@Example.COM ")?;   // stores "ada@example.com"
//! ```
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Declarations: validate, select, accumulate, install      │
//! │  - Assignments: pick the field's writer and run it          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Filter Layer (attributes/, filters/, interceptor.rs)       │
//! │  - Selector: rule + catalog → fields                        │
//! │  - Registry: model → field → ordered filter names           │
//! │  - Interceptors: which fields get the filtered setter       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Collaborators (schema.rs, store/)                          │
//! │  - SchemaSource: columns and parents of each model          │
//! │  - StorageBackend: raw, unfiltered reads and writes         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Guarantees
//!
//! - A field's chain is the concatenation, in declaration order, of the
//!   filter lists of every declaration that selected it.
//! - Chains are read when a write happens, so a later declaration also
//!   affects fields that were filtered before it.
//! - Fields no declaration selected are written unchanged.
//!
//! ## Concurrency
//!
//! Declarations need `&mut` access and are expected to run while models
//! are being set up. Assignments only need shared access to the registry
//! and the filter table, both of which are `Send + Sync`.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for declarations and assignments
//! - [`attributes`]: Values, column types, catalogs and selection rules
//! - [`filters`]: Filter table, built-in filters and the chain registry
//! - [`interceptor`]: Writers and the per-model descriptor table
//! - [`schema`]: Schema introspection trait and in-memory schema
//! - [`store`]: Storage abstraction and the in-memory backend
//! - [`model`]: Model identifiers, definitions and record keys
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod attributes;
pub mod config;
pub mod error;
pub mod filters;
pub mod interceptor;
pub mod model;
pub mod schema;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use api::{Declaration, SetterFilterApi};
pub use error::{Result, SetterFilterError};
