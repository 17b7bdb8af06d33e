//! Attribute value types.
//!
//! This module defines the runtime representation of the values that flow
//! through a filter chain on their way to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Runtime representation of an attribute value.
///
/// Filters receive and return `AttrValue`s; the storage backend persists
/// whatever the last filter in a chain produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Absent value (SQL `NULL`)
    Null,

    /// Boolean column value
    Bool(bool),

    /// Integer column value
    Int(i64),

    /// Floating point column value
    Float(f64),

    /// String or text column value
    Text(String),

    /// Date/time column value
    Timestamp(DateTime<Utc>),

    /// List of strings (e.g. serialized tag columns)
    List(Vec<String>),
}

impl AttrValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Check whether this value is empty for filtering purposes.
    ///
    /// - Null: always blank
    /// - Text: blank when it holds only whitespace
    /// - List: blank when empty
    /// - everything else: never blank
    pub fn is_blank(&self) -> bool {
        match self {
            AttrValue::Null => true,
            AttrValue::Text(s) => s.trim().is_empty(),
            AttrValue::List(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Transform the text of a Text value, leaving every other variant as is.
    ///
    /// Text filters use this so they can sit in chains on non-text columns
    /// without failing.
    pub fn map_text<F>(self, f: F) -> AttrValue
    where
        F: FnOnce(String) -> String,
    {
        match self {
            AttrValue::Text(s) => AttrValue::Text(f(s)),
            other => other,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttrValue::Timestamp(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::List(value)
    }
}

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(AttrValue::Null)
    }
}
