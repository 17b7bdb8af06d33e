//! Attribute selection.
//!
//! A declaration names the attributes it applies to through at most one
//! selection option. [`Selection`] is the user-facing form (all options
//! optional, as they arrive from code or from a declaration file);
//! [`SelectionRule`] is the validated form with exactly one variant.
//!
//! | Option | Rule | Resolves to |
//! |--------|------|-------------|
//! | (none) | `All` | every catalog attribute |
//! | `only` | `Explicit` | catalog names that are listed |
//! | `except` | `Except` | catalog names that are not listed |
//! | `only_types` | `OnlyTypes` | attributes whose type is listed |
//! | `except_types` | `ExceptTypes` | attributes whose type is not listed |

use super::spec::{Catalog, TypeTag};
use crate::error::{Result, SetterFilterError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The validated selection rule of one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRule {
    All,
    Explicit(BTreeSet<String>),
    Except(BTreeSet<String>),
    OnlyTypes(BTreeSet<TypeTag>),
    ExceptTypes(BTreeSet<TypeTag>),
}

/// Selection options as supplied by a declaration.
///
/// Setting more than one option is accepted here and rejected by
/// [`Selection::into_rule`], so that a bad declaration fails as a whole
/// rather than at whichever builder call happened to come second.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub except: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_types: Option<BTreeSet<TypeTag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub except_types: Option<BTreeSet<TypeTag>>,
}

impl Selection {
    /// Select every attribute in the catalog.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn except<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.except = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn only_types<I: IntoIterator<Item = TypeTag>>(mut self, types: I) -> Self {
        self.only_types = Some(types.into_iter().collect());
        self
    }

    pub fn except_types<I: IntoIterator<Item = TypeTag>>(mut self, types: I) -> Self {
        self.except_types = Some(types.into_iter().collect());
        self
    }

    /// Validate the options into a single rule.
    ///
    /// Fails with [`SetterFilterError::Configuration`] if more than one option is set.
    pub fn into_rule(self) -> Result<SelectionRule> {
        let mut supplied = Vec::new();
        if self.only.is_some() {
            supplied.push("only");
        }
        if self.except.is_some() {
            supplied.push("except");
        }
        if self.only_types.is_some() {
            supplied.push("only_types");
        }
        if self.except_types.is_some() {
            supplied.push("except_types");
        }
        if supplied.len() > 1 {
            return Err(SetterFilterError::Configuration(format!(
                "only one of only, except, only_types, except_types may be given (got {})",
                supplied.join(", ")
            )));
        }

        Ok(match self {
            Selection {
                only: Some(fields), ..
            } => SelectionRule::Explicit(fields),
            Selection {
                except: Some(fields),
                ..
            } => SelectionRule::Except(fields),
            Selection {
                only_types: Some(types),
                ..
            } => SelectionRule::OnlyTypes(types),
            Selection {
                except_types: Some(types),
                ..
            } => SelectionRule::ExceptTypes(types),
            _ => SelectionRule::All,
        })
    }
}

/// Resolve a rule against a catalog.
///
/// Returns the selected attribute names in catalog order. Names listed in
/// `Explicit`/`Except` that the catalog does not contain are ignored; use
/// [`unknown_fields`] to detect them.
pub fn resolve(catalog: &Catalog, rule: &SelectionRule) -> Vec<String> {
    catalog
        .iter()
        .filter(|entry| match rule {
            SelectionRule::All => true,
            SelectionRule::Explicit(fields) => fields.contains(&entry.name),
            SelectionRule::Except(fields) => !fields.contains(&entry.name),
            SelectionRule::OnlyTypes(types) => types.contains(&entry.kind),
            SelectionRule::ExceptTypes(types) => !types.contains(&entry.kind),
        })
        .map(|entry| entry.name.clone())
        .collect()
}

/// Names in a field-list rule that the catalog does not contain.
pub fn unknown_fields<'a>(catalog: &Catalog, rule: &'a SelectionRule) -> Vec<&'a str> {
    match rule {
        SelectionRule::Explicit(fields) | SelectionRule::Except(fields) => fields
            .iter()
            .filter(|name| !catalog.contains(name))
            .map(String::as_str)
            .collect(),
        _ => Vec::new(),
    }
}
