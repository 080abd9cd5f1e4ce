//! Literal-or-producer facets evaluated at generation time.
//!
//! Producers receive the in-progress document as a shared borrow: they may
//! read the fields generated so far but never mutate them.

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::Schema;
use serde::{Deserialize, Deserializer};

use crate::value::{Document, FieldValue};

pub type RequiredFn = Arc<dyn Fn(&Document) -> bool + Send + Sync>;
pub type DefaultFn = Arc<dyn Fn(&Document) -> FieldValue + Send + Sync>;
pub type SetterFn = Arc<dyn Fn(FieldValue) -> FieldValue + Send + Sync>;
pub type RefFn = Arc<dyn Fn() -> String + Send + Sync>;

/// Whether a field must be present.
#[derive(Clone)]
pub enum Required {
    Literal(bool),
    Producer(RequiredFn),
}

impl Required {
    pub fn producer(f: impl Fn(&Document) -> bool + Send + Sync + 'static) -> Self {
        Required::Producer(Arc::new(f))
    }

    pub fn is_producer(&self) -> bool {
        matches!(self, Required::Producer(_))
    }

    pub fn evaluate(&self, doc: &Document) -> bool {
        match self {
            Required::Literal(value) => *value,
            Required::Producer(f) => f(doc),
        }
    }
}

impl fmt::Debug for Required {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Required::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Required::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl From<bool> for Required {
    fn from(value: bool) -> Self {
        Required::Literal(value)
    }
}

impl<'de> Deserialize<'de> for Required {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer).map(Required::Literal)
    }
}

impl JsonSchema for Required {
    fn schema_name() -> String {
        "Required".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        bool::json_schema(generator)
    }
}

/// Value used verbatim instead of generating one.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(FieldValue),
    Producer(DefaultFn),
}

impl DefaultValue {
    pub fn producer(f: impl Fn(&Document) -> FieldValue + Send + Sync + 'static) -> Self {
        DefaultValue::Producer(Arc::new(f))
    }

    pub fn is_producer(&self) -> bool {
        matches!(self, DefaultValue::Producer(_))
    }

    pub fn evaluate(&self, doc: &Document) -> FieldValue {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Producer(f) => f(doc),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for DefaultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(DefaultValue::Literal(FieldValue::from_json(&raw)))
    }
}

impl JsonSchema for DefaultValue {
    fn schema_name() -> String {
        "DefaultValue".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        serde_json::Value::json_schema(generator)
    }
}

/// Final transform applied to a generated value.
#[derive(Clone)]
pub struct Setter(pub SetterFn);

impl Setter {
    pub fn new(f: impl Fn(FieldValue) -> FieldValue + Send + Sync + 'static) -> Self {
        Setter(Arc::new(f))
    }

    pub fn apply(&self, value: FieldValue) -> FieldValue {
        (self.0)(value)
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Setter(..)")
    }
}

/// Entity targeted by a reference field.
#[derive(Clone)]
pub enum RefTarget {
    Entity(String),
    Producer(RefFn),
}

impl RefTarget {
    pub fn producer(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        RefTarget::Producer(Arc::new(f))
    }

    pub fn resolve(&self) -> String {
        match self {
            RefTarget::Entity(name) => name.clone(),
            RefTarget::Producer(f) => f(),
        }
    }
}

impl fmt::Debug for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefTarget::Entity(name) => f.debug_tuple("Entity").field(name).finish(),
            RefTarget::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

impl From<&str> for RefTarget {
    fn from(value: &str) -> Self {
        RefTarget::Entity(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RefTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RefTarget::Entity)
    }
}

impl JsonSchema for RefTarget {
    fn schema_name() -> String {
        "RefTarget".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}
