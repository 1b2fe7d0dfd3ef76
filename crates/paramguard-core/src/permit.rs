//! Filter engine: builds a new, permitted tree holding only whitelisted data.
//!
//! # Short-circuit
//!
//! A nested filter item whose value is present but falsy (null, `false`,
//! `""`, an empty collection) aborts the whole `permit` call and yields
//! `Ok(None)`, discarding keys accepted so far. Absent keys are skipped.
//! Callers that want partial results must guard such keys themselves.

use std::rc::Rc;

use tracing::debug;

use crate::config::ParamsConfig;
use crate::errors::ParamsResult;
use crate::filter::Filter;
use crate::params::Params;
use crate::value::{Object, Value};

impl Params {
    /// Filters with the default configuration.
    pub fn permit(&self, filters: &[Filter]) -> ParamsResult<Option<Params>> {
        self.permit_with(filters, &ParamsConfig::default())
    }

    /// Filters against `filters`, validating strictly first when this tree is
    /// marked strict or `config.strict_by_default` is set.
    ///
    /// Strictness applies to every nested level of this call, but child
    /// trees' own `strict` flags are left untouched.
    pub fn permit_with(
        &self,
        filters: &[Filter],
        config: &ParamsConfig,
    ) -> ParamsResult<Option<Params>> {
        self.permit_filtered(filters, config.strict_by_default)
    }

    /// Shorthand for `strict().permit(filters)`.
    pub fn permit_strict(&self, filters: &[Filter]) -> ParamsResult<Option<Params>> {
        self.strict().permit(filters)
    }

    /// `inherited` carries strictness from the parent call into children
    /// without touching the children's own flags.
    fn permit_filtered(&self, filters: &[Filter], inherited: bool) -> ParamsResult<Option<Params>> {
        let strict = inherited || self.is_strict();
        if strict {
            self.check(filters)?;
        }

        let mut out = Params::new();

        for filter in filters {
            match filter {
                Filter::Key(key) => {
                    if let Some(value) = self.get(key) {
                        out.insert(key.clone(), value);
                    }
                }
                Filter::Nested(map) => {
                    for (key, nested) in map {
                        let Some(value) = self.get(key) else {
                            continue;
                        };
                        if value.is_falsy() {
                            debug!(key = %key, "permit aborted: nested key is empty");
                            return Ok(None);
                        }
                        if let Some(filtered) = filter_value(value, nested, strict)? {
                            out.insert(key.clone(), filtered);
                        } else {
                            debug!(key = %key, "nested value is not a mapping; dropped");
                        }
                    }
                }
            }
        }

        out.permit_all();
        Ok(Some(out))
    }
}

/// Element-wise rule for the value of a nested filter item.
fn filter_value(value: Value, filters: &[Filter], strict: bool) -> ParamsResult<Option<Value>> {
    match value {
        Value::Sequence(items) => {
            let mut kept = Vec::with_capacity(items.len());
            for item in items {
                if let Some(filtered) = filter_element(item, filters, strict)? {
                    kept.push(filtered);
                }
            }
            Ok(Some(Value::Sequence(kept)))
        }
        Value::IndexedMap(entries) => {
            let mut kept = Object::with_capacity(entries.len());
            for (index, item) in entries {
                if let Some(filtered) = filter_element(item, filters, strict)? {
                    kept.insert(index, filtered);
                }
            }
            Ok(Some(Value::IndexedMap(kept)))
        }
        single => filter_element(single, filters, strict),
    }
}

/// A nested filter expects a mapping; anything else contributes nothing.
fn filter_element(value: Value, filters: &[Filter], strict: bool) -> ParamsResult<Option<Value>> {
    let tree = match value {
        Value::Tree(tree) => tree,
        Value::Object(object) => Rc::new(Params::from_object(object)),
        _ => return Ok(None),
    };
    Ok(tree
        .permit_filtered(filters, strict)?
        .map(|permitted| Value::Tree(Rc::new(permitted))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ParamsError;
    use serde_json::json;

    fn params(doc: serde_json::Value) -> Params {
        Params::from_json(doc).unwrap()
    }

    fn filters(doc: serde_json::Value) -> Vec<Filter> {
        Filter::parse_list(&doc).unwrap()
    }

    #[test]
    fn test_scalar_keys_copied_verbatim() {
        let p = params(json!({"name": "Ada", "admin": true, "meta": {"x": 1}}));
        let out = p.permit(&filters(json!(["name", "meta", "missing"]))).unwrap().unwrap();

        assert!(out.is_permitted());
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["name", "meta"]);
        assert_eq!(out.to_json(), json!({"name": "Ada", "meta": {"x": 1}}));
    }

    #[test]
    fn test_nested_filtering() {
        let p = params(json!({
            "person": {"age": "32", "admin": true, "name": {"first": "D", "last": "H", "x": 1}}
        }));
        let out = p
            .permit(&filters(json!([{"person": ["age", {"name": ["first", "last"]}]}])))
            .unwrap()
            .unwrap();

        assert_eq!(
            out.to_json(),
            json!({"person": {"age": "32", "name": {"first": "D", "last": "H"}}})
        );
        let person = out.get("person").unwrap();
        assert!(person.as_tree().unwrap().is_permitted());
    }

    #[test]
    fn test_sequence_elements_filtered_and_compacted() {
        let p = params(json!({
            "items": [{"id": 1, "secret": "s"}, "loose", {"id": 2}, 7]
        }));
        let out = p.permit(&filters(json!([{"items": ["id"]}]))).unwrap().unwrap();
        assert_eq!(out.to_json(), json!({"items": [{"id": 1}, {"id": 2}]}));
    }

    #[test]
    fn test_indexed_map_shape_preserved() {
        let p = params(json!({
            "authors": {"-1": {"name": "A", "age": "52"}, "-2": {"name": "B", "x": 1}}
        }));
        let out = p
            .permit(&filters(json!([{"authors": ["name", "age"]}])))
            .unwrap()
            .unwrap();

        let authors = out.get("authors").unwrap();
        let map = authors.as_indexed().expect("indexed map kept");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["-1", "-2"]);
        assert_eq!(
            authors.to_json(),
            json!({"-1": {"name": "A", "age": "52"}, "-2": {"name": "B"}})
        );
    }

    #[test]
    fn test_scalar_under_nested_filter_dropped() {
        let p = params(json!({"name": "Ada", "person": "not a hash"}));
        let out = p
            .permit(&filters(json!(["name", {"person": ["age"]}])))
            .unwrap()
            .unwrap();
        assert_eq!(out.to_json(), json!({"name": "Ada"}));
    }

    #[test]
    fn test_absent_nested_key_skipped() {
        let p = params(json!({"name": "Ada"}));
        let out = p
            .permit(&filters(json!(["name", {"address": ["city"]}])))
            .unwrap()
            .unwrap();
        assert_eq!(out.to_json(), json!({"name": "Ada"}));
    }

    #[test]
    fn test_falsy_nested_value_aborts_whole_call() {
        for empty in [json!(null), json!(false), json!(""), json!([]), json!({})] {
            let p = params(json!({"name": "Ada", "address": empty.clone()}));
            let out = p
                .permit(&filters(json!(["name", {"address": ["city"]}])))
                .unwrap();
            assert!(out.is_none(), "{empty} should abort the permit call");
        }
    }

    #[test]
    fn test_falsy_child_drops_sequence_element() {
        let p = params(json!({
            "items": [{"id": 1, "tags": []}, {"id": 2, "tags": [{"t": "a"}]}]
        }));
        let out = p
            .permit(&filters(json!([{"items": ["id", {"tags": ["t"]}]}])))
            .unwrap()
            .unwrap();
        assert_eq!(out.to_json(), json!({"items": [{"id": 2, "tags": [{"t": "a"}]}]}));
    }

    #[test]
    fn test_does_not_mutate_receiver() {
        let p = params(json!({"person": {"age": "1", "x": 2}}));
        p.permit(&filters(json!([{"person": ["age"]}]))).unwrap();
        assert_eq!(p.to_json(), json!({"person": {"age": "1", "x": 2}}));
        assert!(!p.is_permitted());
    }

    #[test]
    fn test_strict_by_default_config() {
        let p = params(json!({"age": "1", "x": 2}));
        let f = filters(json!(["age"]));

        assert!(p.permit(&f).unwrap().is_some());
        let err = p.permit_with(&f, &ParamsConfig::strict()).unwrap_err();
        assert_eq!(err, ParamsError::forbidden(vec!["x".into()]));
    }

    #[test]
    fn test_strictness_reaches_children_without_flagging_them() {
        let p = params(json!({"person": {"age": "1"}}));
        let child = p.get("person").unwrap();

        p.permit_strict(&filters(json!([{"person": ["age"]}])))
            .unwrap()
            .unwrap();
        assert!(p.is_strict());
        assert!(!child.as_tree().unwrap().is_strict());
    }

    #[test]
    fn test_integer_keyed_scalars_filtered_by_key() {
        let p = params(json!({"scores": {"2023": 5, "2024": 7}}));
        let f = filters(json!([{"scores": ["2023"]}]));

        let out = p.permit(&f).unwrap().unwrap();
        assert_eq!(out.to_json(), json!({"scores": {"2023": 5}}));

        let err = p.permit_strict(&f).unwrap_err();
        assert_eq!(err, ParamsError::forbidden(vec!["2024".into()]));
    }
}
