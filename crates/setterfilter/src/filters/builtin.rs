//! Built-in text filters.
//!
//! All of these operate on `Text` values and pass any other value through
//! unchanged, so they are safe to declare with a broad selection rule.

use crate::attributes::AttrValue;
use crate::error::Result;

pub type BuiltinFn = fn(&str, AttrValue) -> Result<AttrValue>;

/// Registry of the filters shipped with the crate.
///
/// Adding a built-in means adding an entry here.
pub const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("downcase", downcase),
    ("upcase", upcase),
    ("strip", strip),
    ("squish", squish),
    ("strip_vowels", strip_vowels),
    ("blank_to_null", blank_to_null),
];

fn downcase(_field: &str, value: AttrValue) -> Result<AttrValue> {
    Ok(value.map_text(|s| s.to_lowercase()))
}

fn upcase(_field: &str, value: AttrValue) -> Result<AttrValue> {
    Ok(value.map_text(|s| s.to_uppercase()))
}

fn strip(_field: &str, value: AttrValue) -> Result<AttrValue> {
    Ok(value.map_text(|s| s.trim().to_string()))
}

/// Trim and collapse internal whitespace runs to a single space.
fn squish(_field: &str, value: AttrValue) -> Result<AttrValue> {
    Ok(value.map_text(|s| s.split_whitespace().collect::<Vec<_>>().join(" ")))
}

/// Remove lowercase ASCII vowels. Uppercase vowels are kept.
fn strip_vowels(_field: &str, value: AttrValue) -> Result<AttrValue> {
    Ok(value.map_text(|s| s.chars().filter(|c| !"aeiou".contains(*c)).collect()))
}

fn blank_to_null(_field: &str, value: AttrValue) -> Result<AttrValue> {
    if matches!(value, AttrValue::Text(_)) && value.is_blank() {
        Ok(AttrValue::Null)
    } else {
        Ok(value)
    }
}
