//! Typed access to attribute snapshots.
//!
//! Snapshots are arbitrary JSON values. Every accessor fails with an
//! [`AttributeError`] naming the attribute path instead of panicking on a
//! shape mismatch. Absent and `null` are treated alike: plans use `null` for
//! unset optional values and for values unknown until apply.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::AttributeError;

/// Result type for attribute access.
pub type AttrResult<T> = std::result::Result<T, AttributeError>;

/// A view over one JSON object in an attribute snapshot.
#[derive(Debug, Clone)]
pub struct Attributes<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
}

/// Returns the kind name of a JSON value for error messages.
#[must_use]
pub const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

fn wrong_kind(path: String, expected: &'static str, found: &Value) -> AttributeError {
    AttributeError::WrongKind {
        path,
        expected,
        found: kind_of(found),
    }
}

impl<'a> Attributes<'a> {
    /// Wraps the root of a snapshot, which must be a map.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a map.
    pub fn root(value: &'a Value) -> AttrResult<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                map,
                prefix: String::new(),
            }),
            other => Err(wrong_kind(String::from("<root>"), "map", other)),
        }
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    /// Returns the raw value of an attribute, treating `null` as absent.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Returns a string attribute, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is present but not a string.
    pub fn opt_str(&self, key: &str) -> AttrResult<Option<&'a str>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(wrong_kind(self.path(key), "string", other)),
        }
    }

    /// Returns a required string attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is absent or not a string.
    pub fn str(&self, key: &str) -> AttrResult<&'a str> {
        self.opt_str(key)?
            .ok_or_else(|| AttributeError::missing(self.path(key)))
    }

    /// Returns a non-empty string attribute, or `None` when absent or empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is present but not a string.
    pub fn opt_nonempty_str(&self, key: &str) -> AttrResult<Option<&'a str>> {
        Ok(self.opt_str(key)?.filter(|s| !s.is_empty()))
    }

    /// Returns a boolean attribute, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is present but not a bool.
    pub fn opt_bool(&self, key: &str) -> AttrResult<Option<bool>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(wrong_kind(self.path(key), "bool", other)),
        }
    }

    /// Returns an integer attribute, or `None` when absent.
    ///
    /// Plans sometimes encode large integers as strings; those are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is present but not an integer.
    pub fn opt_i64(&self, key: &str) -> AttrResult<Option<i64>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| AttributeError::invalid(self.path(key), format!("{n} is not an integer"))),
            Some(Value::String(s)) => s
                .parse()
                .map(Some)
                .map_err(|_| AttributeError::invalid(self.path(key), format!("'{s}' is not an integer"))),
            Some(other) => Err(wrong_kind(self.path(key), "number", other)),
        }
    }

    /// Returns a list attribute, empty when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is present but not a list.
    pub fn list(&self, key: &str) -> AttrResult<&'a [Value]> {
        match self.raw(key) {
            None => Ok(&[][..]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(wrong_kind(self.path(key), "list", other)),
        }
    }

    /// Returns a list of strings, empty when absent. `null` entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is not a list or holds non-strings.
    pub fn string_list(&self, key: &str) -> AttrResult<Vec<&'a str>> {
        let mut out = Vec::new();
        for (i, item) in self.list(key)?.iter().enumerate() {
            match item {
                Value::Null => {}
                Value::String(s) => out.push(s.as_str()),
                other => return Err(wrong_kind(format!("{}[{i}]", self.path(key)), "string", other)),
            }
        }
        Ok(out)
    }

    /// Returns a string-to-string map, empty when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is not a map of strings.
    pub fn string_map(&self, key: &str) -> AttrResult<BTreeMap<String, String>> {
        match self.raw(key) {
            None => Ok(BTreeMap::new()),
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| match v {
                    Value::String(s) => Ok((k.clone(), s.clone())),
                    other => Err(wrong_kind(format!("{}.{k}", self.path(key)), "string", other)),
                })
                .collect(),
            Some(other) => Err(wrong_kind(self.path(key), "map", other)),
        }
    }

    /// Returns the nested blocks of a list-of-maps attribute.
    ///
    /// Plans encode nested blocks as lists of maps; `null` entries stand for
    /// blocks whose content is unknown until apply and are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is not a list or holds non-maps.
    pub fn blocks(&self, key: &str) -> AttrResult<Vec<Self>> {
        let mut out = Vec::new();
        for (i, item) in self.list(key)?.iter().enumerate() {
            match item {
                Value::Null => {}
                Value::Object(map) => out.push(Self {
                    map,
                    prefix: self.path(key),
                }),
                other => return Err(wrong_kind(format!("{}[{i}]", self.path(key)), "map", other)),
            }
        }
        Ok(out)
    }

    /// Returns the first nested block of a single-block attribute.
    ///
    /// # Errors
    ///
    /// Returns an error if the attribute is not a list of maps.
    pub fn block(&self, key: &str) -> AttrResult<Option<Self>> {
        Ok(self.blocks(key)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_must_be_map() {
        let value = json!(["not", "a", "map"]);
        let err = Attributes::root(&value).unwrap_err();
        assert_eq!(
            err,
            AttributeError::WrongKind {
                path: String::from("<root>"),
                expected: "map",
                found: "list"
            }
        );
    }

    #[test]
    fn test_required_string() {
        let value = json!({"name": "disk", "zone": null, "size": 10});
        let attrs = Attributes::root(&value).unwrap();

        assert_eq!(attrs.str("name").unwrap(), "disk");
        assert_eq!(attrs.str("zone").unwrap_err(), AttributeError::missing("zone"));
        assert!(matches!(
            attrs.str("size").unwrap_err(),
            AttributeError::WrongKind { found: "number", .. }
        ));
    }

    #[test]
    fn test_integers_from_numbers_and_strings() {
        let value = json!({"a": 4096, "b": "100", "c": "lots", "d": 1.5});
        let attrs = Attributes::root(&value).unwrap();

        assert_eq!(attrs.opt_i64("a").unwrap(), Some(4096));
        assert_eq!(attrs.opt_i64("b").unwrap(), Some(100));
        assert!(attrs.opt_i64("c").is_err());
        assert!(attrs.opt_i64("d").is_err());
        assert_eq!(attrs.opt_i64("missing").unwrap(), None);
    }

    #[test]
    fn test_blocks_skip_unknown_entries() {
        let value = json!({"cors": [null, {"max_age_seconds": 3600}], "website": [null]});
        let attrs = Attributes::root(&value).unwrap();

        let cors = attrs.blocks("cors").unwrap();
        assert_eq!(cors.len(), 1);
        assert_eq!(cors[0].opt_i64("max_age_seconds").unwrap(), Some(3600));
        assert!(attrs.block("website").unwrap().is_none());
    }

    #[test]
    fn test_nested_errors_name_the_path() {
        let value = json!({"versioning": [{"enabled": "yes"}], "rules": "oops"});
        let attrs = Attributes::root(&value).unwrap();

        let versioning = attrs.block("versioning").unwrap().unwrap();
        assert!(matches!(
            versioning.opt_bool("enabled").unwrap_err(),
            AttributeError::WrongKind { ref path, .. } if path == "versioning.enabled"
        ));
        assert!(matches!(
            attrs.blocks("rules").unwrap_err(),
            AttributeError::WrongKind { expected: "list", found: "string", .. }
        ));
    }

    #[test]
    fn test_string_collections() {
        let value = json!({
            "members": ["user:a@example.com", null, "user:b@example.com"],
            "labels": {"env": "dev", "team": null},
            "bad": [1]
        });
        let attrs = Attributes::root(&value).unwrap();

        assert_eq!(
            attrs.string_list("members").unwrap(),
            vec!["user:a@example.com", "user:b@example.com"]
        );
        assert_eq!(attrs.string_map("labels").unwrap().len(), 1);
        assert!(attrs.string_list("bad").is_err());
    }
}
