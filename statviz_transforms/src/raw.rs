// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loosely typed JSON scalars shared by several dataset shapes.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A scalar that datasets encode either as a JSON number or as a numeric string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    /// A JSON number.
    Number(f64),
    /// A JSON string, expected to hold a number.
    Text(String),
}

impl NumberOrString {
    /// The numeric value, if there is a finite one.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

/// Reads a field as `T`, or `None` when it is absent, null or of another type.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]` so that one mistyped field never
/// fails the payload it sits in; the extractors decide whether the field was required.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Reads a JSON array element by element. An element that is not a record becomes
/// `T::default()`, which the extractors reject as missing its required fields.
pub(crate) fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect())
}

/// Like [`lenient_records`] for an optional list: anything other than an array reads as `None`.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => Some(
            values
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// Parses a top-level JSON array with [`lenient_records`].
pub(crate) fn records_from_slice<T>(bytes: &[u8]) -> Result<Vec<T>, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let records = lenient_records(&mut de)?;
    de.end()?;
    Ok(records)
}
