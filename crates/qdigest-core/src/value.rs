//! Document value model
//!
//! Profiling output is an ordered tree of documents, arrays and scalars.
//! Scalars keep the JSON representation they were read with, so an
//! unredacted document renders back exactly as it came in.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Number, Value as Json};

use crate::{Error, Result};

/// A node of a document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Document(Document),
    Array(Vec<Value>),
    Scalar(Scalar),
    Null,
}

/// Shape of a value, as seen by the redactor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Document,
    Array,
    Null,
    Scalar(ScalarKind),
}

/// Classify a value. Every value has a kind; there is no failure case.
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Document(_) => ValueKind::Document,
        Value::Array(_) => ValueKind::Array,
        Value::Null => ValueKind::Null,
        Value::Scalar(scalar) => ValueKind::Scalar(scalar.kind()),
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        classify(self)
    }

    /// Human-readable type name, used in diagnostics and type-info placeholders
    pub fn type_tag(&self) -> &'static str {
        match self.kind() {
            ValueKind::Document => "object",
            ValueKind::Array => "array",
            ValueKind::Null => "null",
            ValueKind::Scalar(kind) => kind.type_tag(),
        }
    }

    /// Placeholder-style string scalar
    pub fn string(value: impl Into<String>) -> Self {
        Value::Scalar(Scalar::string(value))
    }

    pub fn into_document(self) -> Option<Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(scalar) if scalar.kind == ScalarKind::String => scalar.repr.as_str(),
            _ => None,
        }
    }

    /// Integer value of an `int32`/`int64` scalar, in plain or wrapped form
    pub fn as_i64(&self) -> Option<i64> {
        let Value::Scalar(scalar) = self else {
            return None;
        };
        if !matches!(scalar.kind, ScalarKind::Int32 | ScalarKind::Int64) {
            return None;
        }
        match &scalar.repr {
            Json::Number(n) => n.as_i64(),
            Json::Object(map) => map
                .get("$numberInt")
                .or_else(|| map.get("$numberLong"))
                .and_then(Json::as_str)
                .and_then(|s| s.parse().ok()),
            _ => None,
        }
    }

    /// Plain JSON form, used for the contents of Extended JSON wrappers
    fn into_json(self) -> Json {
        match self {
            Value::Document(doc) => Json::Object(
                doc.into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect(),
            ),
            Value::Array(items) => Json::Array(items.into_iter().map(Value::into_json).collect()),
            Value::Scalar(scalar) => scalar.repr,
            Value::Null => Json::Null,
        }
    }

    /// A decoded object: either a type wrapper or a document
    fn from_entries(entries: Vec<(String, Value)>) -> Self {
        match extended_kind(&entries) {
            Some(kind) => {
                let repr: Map<String, Json> = entries
                    .into_iter()
                    .map(|(key, value)| (key, value.into_json()))
                    .collect();
                Value::Scalar(Scalar::new(kind, Json::Object(repr)))
            }
            None => Value::Document(Document { entries }),
        }
    }

    fn from_number(n: Number) -> Self {
        Value::Scalar(Scalar::new(number_kind(&n), Json::Number(n)))
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(_) => Value::Scalar(Scalar::new(ScalarKind::Boolean, json)),
            Json::Number(ref n) => Value::Scalar(Scalar::new(number_kind(n), json)),
            Json::String(_) => Value::Scalar(Scalar::new(ScalarKind::String, json)),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::from_entries(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Decodes straight into [`Value`] so repeated keys keep their own entries.
struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Scalar(Scalar::new(ScalarKind::Boolean, Json::Bool(v))))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::from_number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(Value::from_number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Number::from_f64(v)
            .map(Value::from_number)
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::string(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            entries.push((key, value));
        }
        Ok(Value::from_entries(entries))
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Document(doc)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Document(doc) => doc.serialize(serializer),
            Value::Array(items) => items.serialize(serializer),
            Value::Scalar(scalar) => scalar.repr.serialize(serializer),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Ordered sequence of key/value entries. Keys may repeat.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Parse a JSON object (Extended JSON wrappers become scalars)
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let kind = value.type_tag();
        value.into_document().ok_or(Error::NotADocument(kind))
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First entry with the given key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Entry by entry: redacted documents repeat the placeholder key.
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Leaf value with its runtime kind
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    kind: ScalarKind,
    repr: Json,
}

impl Scalar {
    pub fn new(kind: ScalarKind, repr: Json) -> Self {
        Self { kind, repr }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ScalarKind::String, Json::String(value.into()))
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Int32,
    Int64,
    Double,
    Decimal128,
    Boolean,
    ObjectId,
    DateTime,
    Binary,
    Regex,
    Timestamp,
    MinKey,
    MaxKey,
    Undefined,
    JavaScript,
    JavaScriptWithScope,
    Symbol,
    DbPointer,
}

impl ScalarKind {
    /// Stable type tag for this kind
    pub fn type_tag(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Double => "double",
            ScalarKind::Decimal128 => "decimal128",
            ScalarKind::Boolean => "bool",
            ScalarKind::ObjectId => "objectId",
            ScalarKind::DateTime => "date",
            ScalarKind::Binary => "binData",
            ScalarKind::Regex => "regex",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::MinKey => "minKey",
            ScalarKind::MaxKey => "maxKey",
            ScalarKind::Undefined => "undefined",
            ScalarKind::JavaScript => "javascript",
            ScalarKind::JavaScriptWithScope => "javascriptWithScope",
            ScalarKind::Symbol => "symbol",
            ScalarKind::DbPointer => "dbPointer",
        }
    }
}

fn number_kind(n: &Number) -> ScalarKind {
    match n.as_i64() {
        Some(i) if i32::try_from(i).is_ok() => ScalarKind::Int32,
        Some(_) => ScalarKind::Int64,
        None => ScalarKind::Double,
    }
}

/// Recognize Extended JSON type wrappers such as `{"$oid": "..."}`.
///
/// Query operators (`$regex`, `$type`, ...) are left as documents.
fn extended_kind(entries: &[(String, Value)]) -> Option<ScalarKind> {
    let mut keys = entries.iter().map(|(key, _)| key.as_str());
    let first = keys.next()?;
    let second = keys.next();
    if keys.next().is_some() {
        return None;
    }

    let kind = match (first, second) {
        ("$oid", None) => ScalarKind::ObjectId,
        ("$date", None) => ScalarKind::DateTime,
        ("$numberInt", None) => ScalarKind::Int32,
        ("$numberLong", None) => ScalarKind::Int64,
        ("$numberDouble", None) => ScalarKind::Double,
        ("$numberDecimal", None) => ScalarKind::Decimal128,
        ("$binary", None) if matches!(entries[0].1, Value::Document(_)) => ScalarKind::Binary,
        ("$binary", Some("$type")) | ("$type", Some("$binary")) => ScalarKind::Binary,
        ("$uuid", None) => ScalarKind::Binary,
        ("$regularExpression", None) => ScalarKind::Regex,
        ("$timestamp", None) => ScalarKind::Timestamp,
        ("$minKey", None) => ScalarKind::MinKey,
        ("$maxKey", None) => ScalarKind::MaxKey,
        ("$undefined", None) => ScalarKind::Undefined,
        ("$code", None) => ScalarKind::JavaScript,
        ("$code", Some("$scope")) | ("$scope", Some("$code")) => ScalarKind::JavaScriptWithScope,
        ("$symbol", None) => ScalarKind::Symbol,
        ("$dbPointer", None) => ScalarKind::DbPointer,
        _ => return None,
    };
    Some(kind)
}
