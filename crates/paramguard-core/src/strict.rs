//! Strict validation: exact-match diff of input keys against a filter list.

use std::collections::HashSet;

use tracing::warn;

use crate::errors::{ParamsError, ParamsResult};
use crate::filter::Filter;
use crate::params::Params;
use crate::value::Value;

impl Params {
    /// Fails with `Forbidden` if this level holds any key the filters do not
    /// name, listing every extra key at that level.
    ///
    /// The first level with extras aborts the walk. Otherwise only nested
    /// filter items are followed, and only into values that are present.
    pub fn check(&self, filters: &[Filter]) -> ParamsResult<()> {
        let named: HashSet<&str> = filters.iter().flat_map(Filter::named_keys).collect();
        let extra: Vec<String> = self
            .keys()
            .filter(|key| !named.contains(key))
            .map(str::to_string)
            .collect();

        if !extra.is_empty() {
            warn!(forbidden = ?extra, "strict params: unexpected keys");
            return Err(ParamsError::forbidden(extra));
        }

        for filter in filters {
            let Filter::Nested(map) = filter else {
                continue;
            };
            for (key, nested) in map {
                if let Some(value) = self.get(key) {
                    check_value(&value, nested)?;
                }
            }
        }

        Ok(())
    }
}

fn check_value(value: &Value, filters: &[Filter]) -> ParamsResult<()> {
    match value {
        Value::Sequence(items) => items.iter().try_for_each(|item| check_element(item, filters)),
        Value::IndexedMap(entries) => entries
            .values()
            .try_for_each(|item| check_element(item, filters)),
        single => check_element(single, filters),
    }
}

fn check_element(value: &Value, filters: &[Filter]) -> ParamsResult<()> {
    match value {
        Value::Tree(tree) => tree.check(filters),
        Value::Object(object) => Params::from_object(object.clone()).check(filters),
        // Non-mapping values are dropped by the filter engine; nothing to diff.
        _ => Ok(()),
    }
}
