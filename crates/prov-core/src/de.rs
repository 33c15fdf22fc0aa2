//! Serde helpers for model-reported fields.
//!
//! Backends are loose about numbers (`80`, `80.0`, `79.6`) and about nulls.
//! These helpers accept those variations but still reject values of the
//! wrong kind, so a record either deserializes with sane types or fails
//! with [`ExtractionError::Schema`](crate::ExtractionError::Schema).

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Clamp a finite number into `0..=100` and round to an integer score.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Clamp a finite number into `-100..=100` and round to a signed adjustment.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn clamp_adjustment(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(-100.0, 100.0) as i32
}

fn number_or_null<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("number out of range")),
        other => Err(de::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// A 0–100 score. Null becomes 0.
///
/// # Errors
///
/// Fails when the value is neither a number nor null.
pub fn score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_or_null(deserializer)?.map_or(0, clamp_score))
}

/// A signed confidence adjustment in `-100..=100`. Null becomes 0.
///
/// # Errors
///
/// Fails when the value is neither a number nor null.
pub fn adjustment<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_or_null(deserializer)?.map_or(0, clamp_adjustment))
}

/// An optional finite number.
///
/// # Errors
///
/// Fails when the value is neither a number nor null.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    number_or_null(deserializer)
}

/// Optional free text. Null and blank strings become `None`.
///
/// # Errors
///
/// Fails when the value is neither a string nor null.
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        other => Err(de::Error::custom(format!("expected a string, got {other}"))),
    }
}

/// Free text where null becomes the empty string.
///
/// # Errors
///
/// Fails when the value is neither a string nor null.
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_text(deserializer)?.unwrap_or_default())
}

/// A boolean flag. Null becomes `false`.
///
/// # Errors
///
/// Fails when the value is neither a boolean nor null.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        other => Err(de::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

/// A list of strings. Null becomes empty; blank entries are dropped.
///
/// # Errors
///
/// Fails when the value is not an array or null, or holds a non-string.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => {
                    let trimmed = s.trim();
                    (!trimmed.is_empty()).then(|| Ok(trimmed.to_string()))
                }
                Value::Null => None,
                other => Some(Err(de::Error::custom(format!(
                    "expected a string list entry, got {other}"
                )))),
            })
            .collect(),
        other => Err(de::Error::custom(format!("expected a list, got {other}"))),
    }
}
