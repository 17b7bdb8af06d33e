//! # Attribute System
//!
//! This module describes the persistent attributes of a model and how a
//! declaration picks among them:
//!
//! - **Values**: [`AttrValue`], what gets assigned and stored
//! - **Specifications**: [`AttributeSpec`] and [`TypeTag`], one per column
//! - **Catalogs**: [`Catalog`], a model's filterable columns (identity excluded)
//! - **Selection**: [`Selection`] / [`SelectionRule`], which catalog
//!   attributes a declaration targets
//!
//! ## Usage
//!
//! ```ignore
//! let catalog = Catalog::from_columns(&columns, "id");
//! let rule = Selection::all().only_types([TypeTag::String]).into_rule()?;
//! let fields = resolve(&catalog, &rule);
//! ```

mod selector;
mod spec;
mod value;

pub use selector::{resolve, unknown_fields, Selection, SelectionRule};
pub use spec::{AttributeSpec, Catalog, TypeTag};
pub use value::AttrValue;
