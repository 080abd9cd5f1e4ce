use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rand::RngCore;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::Error;
use crate::types::Kind;

/// Store-native document identifier: 4 bytes of big-endian seconds followed
/// by 8 random bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId([u8; 12]);

impl DocumentId {
    pub const LEN: usize = 12;

    pub fn new() -> Self {
        Self::from_rng(&mut rand::rng())
    }

    pub fn from_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let mut bytes = [0_u8; Self::LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        rng.fill_bytes(&mut bytes[4..]);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Creation time encoded in the leading four bytes.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let seconds = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(seconds as i64, 0)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let decoded = hex::decode(value)
            .map_err(|err| Error::Parse(format!("invalid document id '{value}': {err}")))?;
        let bytes: [u8; 12] = decoded.try_into().map_err(|_| {
            Error::Parse(format!(
                "invalid document id '{value}': expected {} bytes",
                Self::LEN
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A generated value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    Bytes(Vec<u8>),
    Decimal(Decimal),
    Uuid(Uuid),
    Int32(i32),
    Long(i64),
    ObjectId(DocumentId),
    Array(Vec<FieldValue>),
    Document(Document),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) | FieldValue::Long(value) => Some(*value),
            FieldValue::Int32(value) => Some(*value as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(value) | FieldValue::Long(value) => Some(*value as f64),
            FieldValue::Int32(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            FieldValue::Decimal(value) => value.to_string().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<DocumentId> {
        match self {
            FieldValue::ObjectId(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::Array(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            FieldValue::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Whether this value is a valid representation of `kind`.
    ///
    /// `Integer` accepts floats because the host number type is a double and
    /// precision heuristics may produce fractional values.
    pub fn conforms_to(&self, kind: Kind) -> bool {
        match (kind, self) {
            (Kind::Mixed, _) => true,
            (Kind::Text, FieldValue::Text(_)) => true,
            (Kind::Integer, FieldValue::Int(_) | FieldValue::Float(_)) => true,
            (Kind::Float, FieldValue::Float(_)) => true,
            (Kind::Boolean, FieldValue::Bool(_)) => true,
            (Kind::Timestamp, FieldValue::Timestamp(_)) => true,
            (Kind::Bytes, FieldValue::Bytes(_)) => true,
            (Kind::Decimal, FieldValue::Decimal(_)) => true,
            (Kind::Uuid, FieldValue::Uuid(_)) => true,
            (Kind::Int32, FieldValue::Int32(_)) => true,
            (Kind::BigInt, FieldValue::Long(_)) => true,
            (Kind::ObjectId, FieldValue::ObjectId(_)) => true,
            (Kind::Embedded | Kind::Map, FieldValue::Document(_)) => true,
            (Kind::List, FieldValue::Array(_)) => true,
            _ => false,
        }
    }

    /// Nesting depth of compound values; scalars are 0.
    pub fn depth(&self) -> usize {
        match self {
            FieldValue::Array(values) => {
                1 + values.iter().map(FieldValue::depth).max().unwrap_or(0)
            }
            FieldValue::Document(doc) => {
                1 + doc.values().map(FieldValue::depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Text(value) => Value::String(value.clone()),
            FieldValue::Int(value) | FieldValue::Long(value) => Value::from(*value),
            FieldValue::Int32(value) => Value::from(*value),
            FieldValue::Float(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Bool(value) => Value::Bool(*value),
            FieldValue::Timestamp(value) => {
                Value::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            FieldValue::Bytes(value) => Value::String(hex::encode(value)),
            FieldValue::Decimal(value) => Value::String(value.to_string()),
            FieldValue::Uuid(value) => Value::String(value.to_string()),
            FieldValue::ObjectId(value) => Value::String(value.to_hex()),
            FieldValue::Array(values) => Value::Array(values.iter().map(Self::to_json).collect()),
            FieldValue::Document(doc) => doc.to_json(),
        }
    }

    /// Convert a JSON literal (schema defaults, fixtures) into a value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(value) => FieldValue::Bool(*value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => FieldValue::Int(value),
                None => FieldValue::Float(number.as_f64().unwrap_or_default()),
            },
            Value::String(value) => FieldValue::Text(value.clone()),
            Value::Array(values) => FieldValue::Array(values.iter().map(Self::from_json).collect()),
            Value::Object(map) => FieldValue::Document(
                map.iter()
                    .map(|(key, value)| (key.clone(), Self::from_json(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DocumentId> for FieldValue {
    fn from(value: DocumentId) -> Self {
        FieldValue::ObjectId(value)
    }
}

impl From<Document> for FieldValue {
    fn from(value: Document) -> Self {
        FieldValue::Document(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A generated document. Dotted paths are expanded into nested documents on
/// insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.fields.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Write `value` at a dotted path, creating intermediate documents.
    /// A non-document value sitting on an intermediate segment is replaced.
    pub fn insert_path(&mut self, path: &str, value: FieldValue) {
        match path.split_once('.') {
            None => {
                self.fields.insert(path.to_string(), value);
            }
            Some((head, rest)) => {
                let slot = self
                    .fields
                    .entry(head.to_string())
                    .or_insert_with(|| FieldValue::Document(Document::new()));
                if !matches!(slot, FieldValue::Document(_)) {
                    *slot = FieldValue::Document(Document::new());
                }
                if let FieldValue::Document(child) = slot {
                    child.insert_path(rest, value);
                }
            }
        }
    }

    pub fn get_path(&self, path: &str) -> Option<&FieldValue> {
        match path.split_once('.') {
            None => self.fields.get(path),
            Some((head, rest)) => match self.fields.get(head)? {
                FieldValue::Document(child) => child.get_path(rest),
                _ => None,
            },
        }
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.get_path(path).is_some()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, FieldValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Document {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
