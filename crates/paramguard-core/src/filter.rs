//! Schema filter lists.
//!
//! A filter list names the keys a caller accepts:
//!
//! ```yaml
//! - email
//! - person:
//!     - age
//!     - name: [first, last]
//! - comments: [body]
//! ```
//!
//! A string permits that key as-is. A mapping permits each of its keys only
//! after filtering the value against the nested list, element-wise for
//! sequences and indexed maps. Nested lists only keep mappings: under
//! `comments: [body]` a sequence of comment objects is filtered, while a
//! sequence of plain strings comes out empty. Permit such a list with a bare
//! key instead.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ParamsError, ParamsResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Permit the key verbatim, whatever its shape.
    Key(String),
    /// Permit each key after recursive filtering.
    Nested(IndexMap<String, Vec<Filter>>),
}

impl Filter {
    pub fn key(name: impl Into<String>) -> Self {
        Filter::Key(name.into())
    }

    pub fn nested(name: impl Into<String>, filters: Vec<Filter>) -> Self {
        let mut map = IndexMap::new();
        map.insert(name.into(), filters);
        Filter::Nested(map)
    }

    /// Key names this item contributes to the strict-mode diff.
    pub fn named_keys(&self) -> Vec<&str> {
        match self {
            Filter::Key(name) => vec![name.as_str()],
            Filter::Nested(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// Parses a filter list from a JSON (or YAML-derived) document.
    ///
    /// The top level is either a list of items or a single item.
    pub fn parse_list(doc: &serde_json::Value) -> ParamsResult<Vec<Filter>> {
        parse_list_at(doc, "$")
    }

    pub fn parse_yaml(text: &str) -> ParamsResult<Vec<Filter>> {
        let doc: serde_json::Value = serde_yaml::from_str(text)
            .map_err(|e| ParamsError::invalid_filter(format!("malformed YAML: {e}")))?;
        Filter::parse_list(&doc)
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Filter::Key(name) => serde_json::Value::String(name.clone()),
            Filter::Nested(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, list)| {
                        let items = list.iter().map(Filter::to_json).collect();
                        (k.clone(), serde_json::Value::Array(items))
                    })
                    .collect(),
            ),
        }
    }
}

fn parse_list_at(doc: &serde_json::Value, path: &str) -> ParamsResult<Vec<Filter>> {
    match doc {
        serde_json::Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_item(item, &format!("{path}[{i}]")))
            .collect(),
        single => Ok(vec![parse_item(single, path)?]),
    }
}

fn parse_item(doc: &serde_json::Value, path: &str) -> ParamsResult<Filter> {
    match doc {
        serde_json::Value::String(name) => Ok(Filter::Key(name.clone())),
        serde_json::Value::Object(map) => {
            if map.is_empty() {
                return Err(ParamsError::invalid_filter(format!(
                    "{path}: nested filter has no keys"
                )));
            }
            let mut nested = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                let filters = match value {
                    serde_json::Value::Null => Vec::new(),
                    other => parse_list_at(other, &format!("{path}.{key}"))?,
                };
                nested.insert(key.clone(), filters);
            }
            Ok(Filter::Nested(nested))
        }
        other => Err(ParamsError::invalid_filter(format!(
            "{path}: expected a key name or a mapping, got {other}"
        ))),
    }
}

impl From<&str> for Filter {
    fn from(name: &str) -> Self {
        Filter::Key(name.to_string())
    }
}

impl From<String> for Filter {
    fn from(name: String) -> Self {
        Filter::Key(name)
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = serde_json::Value::deserialize(deserializer)?;
        parse_item(&doc, "$").map_err(serde::de::Error::custom)
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
