//! Parameter tree and read access.
//!
//! A [`Params`] wraps one level of request data. Nested mappings are kept raw
//! until first read; [`Params::get`] replaces them in place with a shared
//! child tree, so repeated reads hand back the same instance.
//!
//! Every slot sits in its own `RefCell` and the flags are `Cell`s: reads take
//! `&self` even when they materialize. Trees are `Rc`-shared and must stay on
//! one thread.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::errors::{ParamsError, ParamsResult};
use crate::value::{Object, Value};

#[derive(Debug, Default)]
pub struct Params {
    entries: IndexMap<String, RefCell<Value>>,
    permitted: Cell<bool>,
    strict: Cell<bool>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a raw ordered mapping. Nothing below the top level is converted.
    pub fn from_object(object: Object) -> Self {
        Self {
            entries: object
                .into_iter()
                .map(|(k, v)| (k, RefCell::new(v)))
                .collect(),
            ..Self::default()
        }
    }

    /// Builds a tree from a request body; the top level must be a JSON object.
    pub fn from_json(json: serde_json::Value) -> ParamsResult<Self> {
        match json {
            serde_json::Value::Object(_) => match Value::from_json(json) {
                Value::Object(object) | Value::IndexedMap(object) => Ok(Self::from_object(object)),
                _ => Err(ParamsError::invalid_params("request body is not an object")),
            },
            other => Err(ParamsError::invalid_params(format!(
                "expected an object at the top level, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(body: &str) -> ParamsResult<Self> {
        let json: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| ParamsError::invalid_params(format!("malformed JSON: {e}")))?;
        Self::from_json(json)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), RefCell::new(value.into()));
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value at `key`, materializing raw nested mappings into
    /// child trees on first access.
    ///
    /// A mapping is wrapped directly; the mapping elements of a sequence or
    /// indexed map are wrapped one by one. The conversion is stored back into
    /// the slot, so a later `get` of the same key hands out the same `Rc`s.
    pub fn get(&self, key: &str) -> Option<Value> {
        let slot = self.entries.get(key)?;
        let mut value = slot.borrow_mut();
        match &mut *value {
            Value::IndexedMap(entries) => entries.values_mut().for_each(Value::materialize),
            Value::Sequence(items) => items.iter_mut().for_each(Value::materialize),
            other => other.materialize(),
        }
        Some(value.clone())
    }

    /// Returns the value at `key` if it is present and not blank.
    pub fn require(&self, key: &str) -> ParamsResult<Value> {
        match self.get(key) {
            Some(value) if !value.is_blank() => Ok(value),
            _ => Err(ParamsError::missing(key)),
        }
    }

    /// Requires `key` and expects a mapping under it, the usual root for a
    /// following `permit` or `check`.
    ///
    /// Absent or blank values are `Missing`; anything else that is not a
    /// single mapping (a scalar, a sequence, an indexed map) is `NotAMapping`.
    pub fn require_tree(&self, key: &str) -> ParamsResult<Rc<Params>> {
        match self.require(key)? {
            Value::Tree(tree) => Ok(tree),
            _ => Err(ParamsError::not_a_mapping(key)),
        }
    }

    /// Alias of [`Params::require`].
    pub fn required(&self, key: &str) -> ParamsResult<Value> {
        self.require(key)
    }

    /// Like [`Params::get`], but an absent key is a `Missing` error.
    /// Present-but-blank values are returned as-is.
    pub fn fetch(&self, key: &str) -> ParamsResult<Value> {
        self.get(key).ok_or_else(|| ParamsError::missing(key))
    }

    /// Like [`Params::fetch`] with a fallback. A mapping default is returned
    /// as a tree but is not stored.
    pub fn fetch_or(&self, key: &str, default: impl Into<Value>) -> Value {
        match self.get(key) {
            Some(value) => value,
            None => match default.into() {
                Value::Object(object) => Value::Tree(Rc::new(Params::from_object(object))),
                other => other,
            },
        }
    }

    /// Shallow subset holding only `keys` that are present, in receiver order.
    ///
    /// Values are not filtered; child trees are shared with the receiver.
    /// The `permitted` flag carries over, `strict` does not.
    pub fn slice<S: AsRef<str>>(&self, keys: &[S]) -> Params {
        let wanted: Vec<&str> = keys.iter().map(AsRef::as_ref).collect();
        let entries = self
            .entries
            .iter()
            .filter(|(k, _)| wanted.contains(&k.as_str()))
            .map(|(k, slot)| (k.clone(), RefCell::new(slot.borrow().clone())))
            .collect();
        Params {
            entries,
            permitted: Cell::new(self.is_permitted()),
            strict: Cell::new(false),
        }
    }

    /// Shallow copy. `permitted` is re-applied explicitly, `strict` resets.
    pub fn dup(&self) -> Params {
        let copy = Params {
            entries: self
                .entries
                .iter()
                .map(|(k, slot)| (k.clone(), RefCell::new(slot.borrow().clone())))
                .collect(),
            ..Params::default()
        };
        copy.permitted.set(self.is_permitted());
        copy
    }

    /// Marks the whole tree as safe without filtering (`permit!`).
    pub fn permit_all(&self) -> &Self {
        self.permitted.set(true);
        self
    }

    /// Opts this tree into exact-match validation on the next `permit` (`strict!`).
    pub fn strict(&self) -> &Self {
        self.strict.set(true);
        self
    }

    pub fn is_permitted(&self) -> bool {
        self.permitted.get()
    }

    pub fn is_strict(&self) -> bool {
        self.strict.get()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, slot)| (k.clone(), slot.borrow().to_json()))
                .collect(),
        )
    }

    /// Content comparison against a raw mapping, without materializing.
    pub(crate) fn matches_object(&self, object: &Object) -> bool {
        self.entries.len() == object.len()
            && self
                .entries
                .iter()
                .all(|(k, slot)| object.get(k).is_some_and(|v| *slot.borrow() == *v))
    }
}

/// Equality is by content; the `permitted` and `strict` flags are ignored.
impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(k, slot)| {
                other
                    .entries
                    .get(k)
                    .is_some_and(|theirs| *slot.borrow() == *theirs.borrow())
            })
    }
}

impl From<Object> for Params {
    fn from(object: Object) -> Self {
        Params::from_object(object)
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, slot) in &self.entries {
            out.serialize_entry(k, &*slot.borrow())?;
        }
        out.end()
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
