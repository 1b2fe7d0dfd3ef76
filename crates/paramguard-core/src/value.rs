//! Value model for parameter trees.
//!
//! A request body arrives as plain JSON. It is converted once into [`Value`],
//! which separates the shapes the filter engine cares about:
//!
//! - **Scalar**: leaf data, copied verbatim when permitted
//! - **Object**: a nested mapping that has not been wrapped yet
//! - **Tree**: a nested mapping materialized as a shared [`Params`]
//! - **Sequence**: repeated fields (`tags[]`, arrays of sub-forms)
//! - **IndexedMap**: sub-forms keyed by integer literals (`{"0": {..}, "-1": {..}}`)

use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::params::Params;

/// Raw ordered mapping as received from the request.
pub type Object = IndexMap<String, Value>;

/// Leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

#[derive(Debug, Clone)]
pub enum Value {
    Scalar(Scalar),
    Object(Object),
    Tree(Rc<Params>),
    Sequence(Vec<Value>),
    IndexedMap(Object),
}

impl Value {
    pub fn null() -> Self {
        Value::Scalar(Scalar::Null)
    }

    /// Converts a deserialized JSON document.
    ///
    /// Objects whose keys are all integer literals and whose values are all
    /// mappings become [`Value::IndexedMap`]; any other object, including an
    /// empty one, stays a plain [`Value::Object`].
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Value::Scalar(Scalar::Number(n)),
            serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let indexed = !map.is_empty()
                    && map
                        .iter()
                        .all(|(k, v)| is_index_key(k) && v.is_object());
                let object: Object = map
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect();
                if indexed {
                    Value::IndexedMap(object)
                } else {
                    Value::Object(object)
                }
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Scalar(Scalar::Null) => serde_json::Value::Null,
            Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            Value::Scalar(Scalar::Number(n)) => serde_json::Value::Number(n.clone()),
            Value::Scalar(Scalar::String(s)) => serde_json::Value::String(s.clone()),
            Value::Object(map) | Value::IndexedMap(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Value::Tree(tree) => tree.to_json(),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Presence rule used by `require`: null, `false`, an empty or
    /// whitespace-only string and empty collections are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Scalar(Scalar::String(s)) => s.trim().is_empty(),
            other => other.is_falsy(),
        }
    }

    /// Rule used by the filter engine to short-circuit a `permit` call:
    /// null, `false`, the empty string and empty collections.
    pub fn is_falsy(&self) -> bool {
        match self {
            Value::Scalar(Scalar::Null) | Value::Scalar(Scalar::Bool(false)) => true,
            Value::Scalar(Scalar::String(s)) => s.is_empty(),
            Value::Scalar(_) => false,
            Value::Object(map) | Value::IndexedMap(map) => map.is_empty(),
            Value::Tree(tree) => tree.is_empty(),
            Value::Sequence(items) => items.is_empty(),
        }
    }

    /// Looks up `key` in a tree, raw object or indexed map.
    ///
    /// Lookups through a [`Value::Tree`] materialize nested mappings in that
    /// tree; raw objects are read without conversion.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Tree(tree) => tree.get(key),
            Value::Object(map) | Value::IndexedMap(map) => map.get(key).cloned(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Rc<Params>> {
        match self {
            Value::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_indexed(&self) -> Option<&Object> {
        match self {
            Value::IndexedMap(map) => Some(map),
            _ => None,
        }
    }

    /// Wraps a raw mapping as a shared tree in place. Other shapes are left
    /// alone, so calling it twice keeps the first tree.
    pub(crate) fn materialize(&mut self) {
        if let Value::Object(object) = self {
            let tree = Params::from_object(std::mem::take(object));
            *self = Value::Tree(Rc::new(tree));
        }
    }
}

/// Integer-literal key of the repeated sub-form convention (`"0"`, `"12"`, `"-1"`).
pub fn is_index_key(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::IndexedMap(a), Value::IndexedMap(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Tree(a), Value::Tree(b)) => Rc::ptr_eq(a, b) || **a == **b,
            (Value::Tree(tree), Value::Object(map)) | (Value::Object(map), Value::Tree(tree)) => {
                tree.matches_object(map)
            }
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Scalar(Scalar::Number(n.into()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Self {
        Value::Tree(Rc::new(params))
    }
}

impl From<Rc<Params>> for Value {
    fn from(params: Rc<Params>) -> Self {
        Value::Tree(params)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Value::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Value::Scalar(Scalar::Number(n)) => n.serialize(serializer),
            Value::Scalar(Scalar::String(s)) => serializer.serialize_str(s),
            Value::Object(map) | Value::IndexedMap(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Tree(tree) => Params::serialize(tree, serializer),
            Value::Sequence(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
        }
    }
}
