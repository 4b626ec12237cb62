//! Structured session values.
//!
//! Session state is a map from string keys to [`Value`], a small typed
//! alternative to a dynamically typed bag. The variants cover what session
//! payloads actually hold: scalars, timestamps, and nested collections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The map of application-visible session state.
pub type ValueMap = BTreeMap<String, Value>;

/// A single session value.
///
/// Timestamps serialize as RFC 3339 strings so the persisted blob stays
/// self-describing across drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
    List(Vec<Value>),
    Map(ValueMap),
}

impl Value {
    /// Returns the contained timestamp, if this is a `Timestamp`.
    pub fn as_timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Returns the contained string, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the contained boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(v: OffsetDateTime) -> Self {
        Value::Timestamp(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messagepack_round_trip() {
        let mut map = ValueMap::new();
        map.insert("user".into(), Value::from("ada"));
        map.insert("visits".into(), Value::from(3i64));
        map.insert("admin".into(), Value::from(false));
        map.insert(
            "last_seen".into(),
            Value::from(OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()),
        );

        let bytes = rmp_serde::to_vec(&map).unwrap();
        let back: ValueMap = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn typed_accessors() {
        let ts = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        assert_eq!(Value::from(ts).as_timestamp(), Some(ts));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(7i64).as_int(), Some(7));
        assert_eq!(Value::from(7i64).as_timestamp(), None);
    }
}
