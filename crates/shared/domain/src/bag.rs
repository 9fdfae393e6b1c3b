//! Ordered property storage.

use crate::constants::keys;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use serde_json::Value;

/// Configuration mapping. Key order is preserved (`serde_json` is built with
/// `preserve_order`), which the engine relies on for child activation order.
pub type Map = serde_json::Map<String, Value>;

/// Merges `over` on top of `under`; `over` wins on collisions.
///
/// The result keeps the key order of `under` and appends keys only found in `over`.
/// The merge is shallow: nested mappings are replaced, not combined.
#[must_use]
pub fn merge(over: &Map, under: &Map) -> Map {
    let mut merged = under.clone();
    for (key, value) in over {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Reads the `name` entry of a mapping.
///
/// Strings must be non-empty; numbers are accepted and rendered as strings.
#[must_use]
pub fn name_of(map: &Map) -> Option<String> {
    match map.get(keys::NAME)? {
        Value::String(name) if !name.trim().is_empty() => Some(name.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// An ordered key/value store with last-write-wins semantics.
///
/// Construction merges the supplied values over a set of defaults and keeps the
/// merged mapping itself under the reserved [`keys::ARGS`] key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag {
    props: IndexMap<String, Value>,
}

impl PropertyBag {
    /// Builds a bag from `initial` merged over `defaults`.
    #[must_use]
    pub fn new(initial: Map, defaults: Map) -> Self {
        let merged = merge(&initial, &defaults);
        let mut props: IndexMap<String, Value> =
            merged.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        props.insert(keys::ARGS.to_owned(), Value::Object(merged));
        Self { props }
    }

    /// Returns the stored value, or `None` when the key was never set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Truthiness of a flag: `true`, non-zero numbers and non-empty strings.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.props.get(key).is_some_and(is_truthy)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.props.insert(key.into(), value.into());
    }

    /// `true` when the key is present and not `null`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.props.get(key).is_some_and(|v| !v.is_null())
    }

    /// Sets every pair of `values`, in order.
    pub fn load(&mut self, values: Map) {
        for (key, value) in values {
            self.props.insert(key, value);
        }
    }

    /// The merged construction arguments.
    #[must_use]
    pub fn args(&self) -> Option<&Map> {
        self.props.get(keys::ARGS).and_then(Value::as_object)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.props.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.props.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// Copies the bag into a mapping, without the `args` snapshot.
    #[must_use]
    pub fn to_map(&self) -> Map {
        self.props
            .iter()
            .filter(|(key, _)| key.as_str() != keys::ARGS)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl From<Map> for PropertyBag {
    fn from(values: Map) -> Self {
        Self::new(values, Map::new())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
        Value::String(s) => !s.is_empty() && s != "0" && s != "false",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn merge_keeps_default_order_and_appends() {
        let merged = merge(&map(json!({ "c": 3, "a": 10 })), &map(json!({ "a": 1, "b": 2 })));
        let keys: Vec<_> = merged.keys().cloned().collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(merged["a"], json!(10));
    }

    #[test]
    fn name_of_accepts_numbers_and_rejects_blank() {
        assert_eq!(name_of(&map(json!({ "name": "shop" }))).as_deref(), Some("shop"));
        assert_eq!(name_of(&map(json!({ "name": 7 }))).as_deref(), Some("7"));
        assert_eq!(name_of(&map(json!({ "name": "  " }))), None);
        assert_eq!(name_of(&map(json!({ "name": null }))), None);
        assert_eq!(name_of(&Map::new()), None);
    }

    #[test]
    fn truthiness_matches_flag_conventions() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!("false")));
        assert!(!is_truthy(&Value::Null));
    }
}
