//! Document redaction engine
//!
//! Produces a copy of a command document with the same shape in which leaf
//! values and non-operator field names are masked. Operator keys (`$gt`,
//! `$set`, ...) survive at every depth; the root exclusion set survives at
//! the root only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::value::{Document, Value, ValueKind, classify};

/// First character of database-defined operator keys
pub const OPERATOR_SENTINEL: char = '$';

/// Replacement for every non-operator field name
pub const KEY_PLACEHOLDER: &str = "***";

/// Replacement for scalar values when type info is off
pub const VALUE_PLACEHOLDER: &str = "***";

/// How a command document is masked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionPolicy {
    /// Replace scalars with their type tag instead of the generic marker
    #[serde(default)]
    pub type_info: bool,

    /// Top-level fields copied through verbatim
    #[serde(default = "default_root_exclusions")]
    pub root_exclusions: BTreeSet<String>,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            type_info: false,
            root_exclusions: default_root_exclusions(),
        }
    }
}

impl RedactionPolicy {
    pub fn with_type_info(mut self, type_info: bool) -> Self {
        self.type_info = type_info;
        self
    }
}

/// Operation metadata that is meaningful, and not sensitive, at the root of a command
pub fn default_root_exclusions() -> BTreeSet<String> {
    [
        "multi",
        "upsert",
        "ordered",
        "$readPreference",
        "$writePreference",
        "remove",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn is_operator(key: &str) -> bool {
    key.starts_with(OPERATOR_SENTINEL)
}

/// Stateless redactor; one call owns its output
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    policy: RedactionPolicy,
}

impl Redactor {
    pub fn new(policy: RedactionPolicy) -> Self {
        Self { policy }
    }

    /// Redact a container. `None` means there is nothing to emit.
    ///
    /// Non-container input gets the same treatment as a field value: `Null`
    /// stays `Null` and scalars become the placeholder.
    pub fn redact(&self, value: &Value) -> Option<Value> {
        match value {
            Value::Document(doc) => self.redact_document(doc).map(Value::Document),
            Value::Array(items) => self.redact_array(items).map(Value::Array),
            _ => self.redact_value(value),
        }
    }

    /// Redact a document at any depth. Empty documents yield `None`.
    pub fn redact_document(&self, doc: &Document) -> Option<Document> {
        if doc.is_empty() {
            return None;
        }

        let mut redacted = Document::with_capacity(doc.len());
        for (key, value) in doc.iter() {
            self.push_field(&mut redacted, key, value);
        }
        Some(redacted)
    }

    /// Redact an array. Empty arrays yield `None`.
    ///
    /// Elements are positional and never dropped: a nested container that
    /// collapses is kept as `Null`.
    pub fn redact_array(&self, items: &[Value]) -> Option<Vec<Value>> {
        if items.is_empty() {
            return None;
        }

        let redacted = items
            .iter()
            .map(|item| match item {
                Value::Document(_) | Value::Array(_) => self.redact(item).unwrap_or(Value::Null),
                Value::Null => Value::Null,
                Value::Scalar(_) => self.placeholder(item),
            })
            .collect();
        Some(redacted)
    }

    /// Redact a command document, copying root exclusions through untouched.
    ///
    /// `None` when nothing survives, so the caller emits no output.
    pub fn redact_root(&self, doc: &Document) -> Option<Document> {
        let mut redacted = Document::with_capacity(doc.len());
        for (key, value) in doc.iter() {
            if self.policy.root_exclusions.contains(key) {
                redacted.push(key, value.clone());
            } else {
                self.push_field(&mut redacted, key, value);
            }
        }

        if redacted.is_empty() {
            None
        } else {
            Some(redacted)
        }
    }

    fn push_field(&self, out: &mut Document, key: &str, value: &Value) {
        let key = if is_operator(key) { key } else { KEY_PLACEHOLDER };
        // A field whose nested container collapsed disappears.
        if let Some(value) = self.redact_value(value) {
            out.push(key, value);
        }
    }

    fn redact_value(&self, value: &Value) -> Option<Value> {
        match classify(value) {
            ValueKind::Null => Some(Value::Null),
            ValueKind::Document | ValueKind::Array => self.redact(value),
            ValueKind::Scalar(_) => Some(self.placeholder(value)),
        }
    }

    fn placeholder(&self, value: &Value) -> Value {
        if self.policy.type_info {
            Value::string(value.type_tag())
        } else {
            Value::string(VALUE_PLACEHOLDER)
        }
    }
}

/// Redact a command document against an explicit exclusion set
pub fn redact_root(
    doc: &Document,
    root_exclusions: &BTreeSet<String>,
    type_info: bool,
) -> Option<Document> {
    let policy = RedactionPolicy {
        type_info,
        root_exclusions: root_exclusions.clone(),
    };
    Redactor::new(policy).redact_root(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(json: serde_json::Value) -> Document {
        Value::from(json).into_document().unwrap()
    }

    fn redact_root_json(json: serde_json::Value) -> Option<String> {
        Redactor::default()
            .redact_root(&doc(json))
            .map(|d| d.to_string())
    }

    #[test]
    fn test_find_command() {
        let redacted = redact_root_json(json!({
            "find": "users",
            "filter": {"age": {"$gt": 21}, "name": "Alice"},
            "multi": true
        }));

        assert_eq!(
            redacted.as_deref(),
            Some(r#"{"***":"***","***":{"***":{"$gt":"***"},"***":"***"},"multi":true}"#)
        );
    }

    #[test]
    fn test_empty_nested_document_is_dropped() {
        let redacted = redact_root_json(json!({"update": "x", "filter": {}}));
        assert_eq!(redacted.as_deref(), Some(r#"{"***":"***"}"#));
    }

    #[test]
    fn test_empty_nested_array_is_dropped() {
        let redacted = redact_root_json(json!({"a": [], "b": 1}));
        assert_eq!(redacted.as_deref(), Some(r#"{"***":"***"}"#));
    }

    #[test]
    fn test_type_info() {
        let redactor = Redactor::new(RedactionPolicy::default().with_type_info(true));
        let redacted = redactor.redact_root(&doc(json!({"count": 5}))).unwrap();
        assert_eq!(redacted.to_string(), r#"{"***":"int32"}"#);

        let redacted = redactor
            .redact_root(&doc(json!({"ids": [1, "a", {"$oid": "5d505646cf6d4fe581014ab2"}]})))
            .unwrap();
        assert_eq!(redacted.to_string(), r#"{"***":["int32","string","objectId"]}"#);
    }

    #[test]
    fn test_operators_preserved_at_every_depth() {
        let redacted = redact_root_json(json!({
            "$and": [{"a": {"$in": [1, 2]}}, {"$or": [{"b": {"$exists": false}}]}]
        }));
        assert_eq!(
            redacted.as_deref(),
            Some(r#"{"$and":[{"***":{"$in":["***","***"]}},{"$or":[{"***":{"$exists":"***"}}]}]}"#)
        );
    }

    #[test]
    fn test_null_preserved_at_every_depth() {
        let redacted = redact_root_json(json!({"a": null, "b": {"c": null}, "d": [null, 1]}));
        assert_eq!(
            redacted.as_deref(),
            Some(r#"{"***":null,"***":{"***":null},"***":[null,"***"]}"#)
        );
    }

    #[test]
    fn test_empty_containers_inside_arrays_become_null() {
        let redacted = redact_root_json(json!({"a": [{}, [], [1], {"b": 2}]}));
        assert_eq!(
            redacted.as_deref(),
            Some(r#"{"***":[null,null,["***"],{"***":"***"}]}"#)
        );
    }

    #[test]
    fn test_empty_containers_are_absent() {
        let redactor = Redactor::default();
        assert_eq!(redactor.redact_document(&Document::new()), None);
        assert_eq!(redactor.redact_array(&[]), None);
        assert_eq!(redactor.redact(&Value::Array(Vec::new())), None);
        assert_eq!(redactor.redact_root(&Document::new()), None);
    }

    #[test]
    fn test_duplicate_keys_keep_their_entries() {
        let input = Document::from_json_str(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(input.to_string(), r#"{"a":1,"a":2}"#);

        let redacted = Redactor::default().redact_root(&input).unwrap();
        assert_eq!(redacted.len(), 2);
        assert_eq!(redacted.to_string(), r#"{"***":"***","***":"***"}"#);
    }

    #[test]
    fn test_emptiness_is_judged_on_input() {
        let redacted = redact_root_json(json!({"u": {"$set": {"a": {}}}}));
        assert_eq!(redacted.as_deref(), Some(r#"{"***":{"$set":{}}}"#));
    }

    #[test]
    fn test_root_only_empty_fields_is_absent() {
        assert_eq!(redact_root_json(json!({"filter": {}, "sort": []})), None);
    }

    #[test]
    fn test_root_exclusions_are_verbatim() {
        let input = doc(json!({
            "q": {"name": "x"},
            "upsert": {"secret": "value"},
            "$readPreference": {"mode": "secondary"}
        }));
        let redacted = Redactor::default().redact_root(&input).unwrap();

        assert_eq!(redacted.get("upsert"), input.get("upsert"));
        assert_eq!(redacted.get("$readPreference"), input.get("$readPreference"));
    }

    #[test]
    fn test_root_exclusions_do_not_apply_deeper() {
        let redacted = redact_root_json(json!({"updates": [{"q": {}, "multi": true, "upsert": false}]}));
        assert_eq!(redacted.as_deref(), Some(r#"{"***":[{"***":"***","***":"***"}]}"#));
    }

    #[test]
    fn test_redact_document_ignores_root_exclusions() {
        let redacted = Redactor::default()
            .redact_document(&doc(json!({"multi": true})))
            .unwrap();
        assert_eq!(redacted.to_string(), r#"{"***":"***"}"#);
    }

    #[test]
    fn test_key_order_preserved() {
        let input = doc(json!({"$set": {"a": 1}, "b": 2, "$inc": {"c": 1}, "$unset": {}}));
        let redacted = Redactor::default().redact_root(&input).unwrap();
        let keys: Vec<_> = redacted.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["$set", "***", "$inc"]);
    }

    #[test]
    fn test_extended_json_scalars_are_masked() {
        let redacted = redact_root_json(json!({
            "_id": {"$oid": "5d505646cf6d4fe581014ab2"},
            "at": {"$date": "2019-08-11T17:54:14.692Z"}
        }));
        assert_eq!(redacted.as_deref(), Some(r#"{"***":"***","***":"***"}"#));
    }

    #[test]
    fn test_free_function_uses_given_exclusions() {
        let exclusions: BTreeSet<String> = ["find".to_string()].into_iter().collect();
        let redacted = redact_root(&doc(json!({"find": "users", "multi": true})), &exclusions, false)
            .unwrap();
        assert_eq!(redacted.to_string(), r#"{"find":"users","***":"***"}"#);
    }

    #[test]
    fn test_non_container_input() {
        let redactor = Redactor::default();
        assert_eq!(redactor.redact(&Value::Null), Some(Value::Null));
        assert_eq!(
            redactor.redact(&Value::from(json!("x"))),
            Some(Value::string(VALUE_PLACEHOLDER))
        );
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: RedactionPolicy = serde_json::from_value(json!({})).unwrap();
        assert_eq!(policy, RedactionPolicy::default());
        assert!(policy.root_exclusions.contains("upsert"));
    }
}
