//! The data context expressions are evaluated against.

use crate::value::Value;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// A key to value mapping. Absent keys read as `undefined`, never as errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data(IndexMap<SmolStr, Value>);

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The value for `key`, or `undefined`.
    pub fn lookup(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or_default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<SmolStr>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<SmolStr>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<SmolStr>, V: Into<Value>> FromIterator<(K, V)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A JSON object becomes the context's entries; any other JSON value gives
/// an empty context.
impl From<serde_json::Value> for Data {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => Self::default(),
        }
    }
}

impl From<crate::value::Object> for Data {
    fn from(props: crate::value::Object) -> Self {
        Self(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_key_is_undefined() {
        let data = Data::new().with("a", 1);
        assert_eq!(data.lookup("a"), Value::from(1));
        assert_eq!(data.lookup("b"), Value::Undefined);
        assert!(data.get("b").is_none());
    }

    #[test]
    fn test_from_json() {
        let data = Data::from(json!({ "items": ["a", "b"], "n": null }));
        assert_eq!(data.len(), 2);
        assert_eq!(
            data.lookup("items"),
            Value::Array(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(data.lookup("n"), Value::Null);
        assert!(Data::from(json!([1, 2])).is_empty());
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let data: Data = [("v", "x"), ("k", "0")].into_iter().collect();
        let keys: Vec<_> = data.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["v", "k"]);
    }
}
