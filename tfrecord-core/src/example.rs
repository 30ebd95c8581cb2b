//! Typed feature records
//!
//! An [`Example`] maps feature names to typed value lists. It is one kind of
//! payload that can be stored in a record; the framing layer never looks
//! inside it.

use crate::error::RecordError;
use crate::types::RecordSerializable;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A named feature value: one list of a single scalar kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Raw byte strings (strings are stored as their UTF-8 bytes)
    BytesList(Vec<Vec<u8>>),
    /// 32-bit floats
    FloatList(Vec<f32>),
    /// 64-bit signed integers
    Int64List(Vec<i64>),
}

impl Feature {
    /// Single byte string
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Feature::BytesList(vec![value.into()])
    }

    /// Single float
    pub fn float(value: f32) -> Self {
        Feature::FloatList(vec![value])
    }

    /// Single integer
    pub fn int64(value: i64) -> Self {
        Feature::Int64List(vec![value])
    }

    /// Number of values in the list
    pub fn len(&self) -> usize {
        match self {
            Feature::BytesList(v) => v.len(),
            Feature::FloatList(v) => v.len(),
            Feature::Int64List(v) => v.len(),
        }
    }

    /// Whether the list holds no values
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert a loosely typed JSON value
    ///
    /// Scalars become one-element lists. Strings map to bytes, integers to
    /// int64 and other numbers to float. Arrays must hold a single kind;
    /// arrays mixing integers and floats become float lists.
    pub fn from_json(key: &str, value: &Value) -> Result<Self, RecordError> {
        match value {
            Value::String(s) => Ok(Feature::bytes(s.as_bytes())),
            Value::Number(_) => match number_kind(key, value)? {
                Number::Int(i) => Ok(Feature::int64(i)),
                Number::Float(f) => Ok(Feature::float(f)),
            },
            Value::Array(items) => list_from_json(key, items),
            Value::Null => Err(unsupported(key, "null is not a feature value")),
            Value::Bool(_) => Err(unsupported(key, "booleans are not a feature kind")),
            Value::Object(_) => Err(unsupported(key, "nested objects are not supported")),
        }
    }
}

impl From<&str> for Feature {
    fn from(value: &str) -> Self {
        Feature::bytes(value.as_bytes())
    }
}

impl From<String> for Feature {
    fn from(value: String) -> Self {
        Feature::bytes(value.into_bytes())
    }
}

impl From<&[u8]> for Feature {
    fn from(value: &[u8]) -> Self {
        Feature::bytes(value)
    }
}

impl From<Vec<u8>> for Feature {
    fn from(value: Vec<u8>) -> Self {
        Feature::bytes(value)
    }
}

impl From<Vec<Vec<u8>>> for Feature {
    fn from(values: Vec<Vec<u8>>) -> Self {
        Feature::BytesList(values)
    }
}

impl From<Vec<String>> for Feature {
    fn from(values: Vec<String>) -> Self {
        Feature::BytesList(values.into_iter().map(String::into_bytes).collect())
    }
}

impl From<Vec<&str>> for Feature {
    fn from(values: Vec<&str>) -> Self {
        Feature::BytesList(values.into_iter().map(|s| s.as_bytes().to_vec()).collect())
    }
}

impl From<f32> for Feature {
    fn from(value: f32) -> Self {
        Feature::float(value)
    }
}

impl From<Vec<f32>> for Feature {
    fn from(values: Vec<f32>) -> Self {
        Feature::FloatList(values)
    }
}

impl From<i64> for Feature {
    fn from(value: i64) -> Self {
        Feature::int64(value)
    }
}

impl From<Vec<i64>> for Feature {
    fn from(values: Vec<i64>) -> Self {
        Feature::Int64List(values)
    }
}

impl From<i32> for Feature {
    fn from(value: i32) -> Self {
        Feature::int64(i64::from(value))
    }
}

impl From<Vec<i32>> for Feature {
    fn from(values: Vec<i32>) -> Self {
        Feature::Int64List(values.into_iter().map(i64::from).collect())
    }
}

/// A set of named features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// Features keyed by name, kept sorted so payloads are deterministic
    pub features: BTreeMap<String, Feature>,
}

impl Example {
    /// Create an empty example
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a feature
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Feature>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a feature, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Feature>) -> Option<Feature> {
        self.features.insert(key.into(), value.into())
    }

    /// Look up a feature by name
    pub fn get(&self, key: &str) -> Option<&Feature> {
        self.features.get(key)
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether there are no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Build an example from a JSON object of loosely typed values
    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        let object = value.as_object().ok_or_else(|| {
            RecordError::Serialization("expected a JSON object of features".to_string())
        })?;

        let mut example = Example::new();
        for (key, value) in object {
            example
                .features
                .insert(key.clone(), Feature::from_json(key, value)?);
        }
        Ok(example)
    }
}

impl RecordSerializable for Example {
    fn to_payload(&self) -> Result<Bytes, RecordError> {
        // JSON has no encoding for NaN or infinities; serde_json would emit null
        for (key, feature) in &self.features {
            if let Feature::FloatList(values) = feature {
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(RecordError::Serialization(format!(
                        "feature {:?} holds a non-finite float",
                        key
                    )));
                }
            }
        }

        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| RecordError::Serialization(e.to_string()))
    }

    fn from_payload(bytes: &[u8]) -> Result<Self, RecordError> {
        serde_json::from_slice(bytes).map_err(|e| RecordError::Serialization(e.to_string()))
    }
}

enum Number {
    Int(i64),
    Float(f32),
}

fn number_kind(key: &str, value: &Value) -> Result<Number, RecordError> {
    if let Some(i) = value.as_i64() {
        return Ok(Number::Int(i));
    }
    if value.is_u64() {
        return Err(unsupported(key, "integer does not fit in int64"));
    }
    let f = value
        .as_f64()
        .ok_or_else(|| unsupported(key, "number is not representable"))?;
    let narrowed = f as f32;
    if !narrowed.is_finite() {
        return Err(unsupported(key, "number is out of float32 range"));
    }
    Ok(Number::Float(narrowed))
}

fn list_from_json(key: &str, items: &[Value]) -> Result<Feature, RecordError> {
    if items.is_empty() {
        return Ok(Feature::BytesList(Vec::new()));
    }

    if items.iter().all(Value::is_string) {
        let values = items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.as_bytes().to_vec())
            .collect();
        return Ok(Feature::BytesList(values));
    }

    if items.iter().all(Value::is_number) {
        let numbers = items
            .iter()
            .map(|v| number_kind(key, v))
            .collect::<Result<Vec<_>, _>>()?;

        if numbers.iter().all(|n| matches!(n, Number::Int(_))) {
            let values = numbers
                .into_iter()
                .filter_map(|n| match n {
                    Number::Int(i) => Some(i),
                    Number::Float(_) => None,
                })
                .collect();
            return Ok(Feature::Int64List(values));
        }

        let values = numbers
            .into_iter()
            .map(|n| match n {
                Number::Int(i) => i as f32,
                Number::Float(f) => f,
            })
            .collect();
        return Ok(Feature::FloatList(values));
    }

    Err(unsupported(
        key,
        "list elements must all be strings or all be numbers",
    ))
}

fn unsupported(key: &str, reason: &str) -> RecordError {
    RecordError::UnsupportedFeature {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
