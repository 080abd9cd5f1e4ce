use std::path::Path;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::Result;
use crate::producers::{DefaultValue, RefTarget, Required, Setter};
use crate::types::{Kind, TimestampLabels};
use crate::value::{Document, FieldValue};

/// Read-only view over a declarative schema.
pub trait SchemaInspect {
    /// Declared paths in declaration order.
    fn paths(&self) -> Vec<&dyn PathInspect>;
    /// Creation/update labels when the schema stamps timestamps.
    fn timestamps(&self) -> Option<&TimestampLabels>;
}

/// Read-only view over one declared path.
pub trait PathInspect {
    fn path(&self) -> &str;
    fn kind(&self) -> Kind;
    fn options(&self) -> &PathOptions;
    /// Sub-schema of an embedded path.
    fn schema(&self) -> Option<&dyn SchemaInspect>;
    /// Element description of a list or map path.
    fn caster(&self) -> Option<&dyn PathInspect>;
}

/// A facet value, optionally in the legacy validator encoding
/// (`[value, "message"]` or `[value]`).
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Facet<T> {
    Value(T),
    WithMessage(T, String),
    Single([T; 1]),
}

impl<T> Facet<T> {
    pub fn value(&self) -> &T {
        match self {
            Facet::Value(value) | Facet::WithMessage(value, _) => value,
            Facet::Single([value]) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Facet::Value(value) | Facet::WithMessage(value, _) => value,
            Facet::Single([value]) => value,
        }
    }
}

impl<T> From<T> for Facet<T> {
    fn from(value: T) -> Self {
        Facet::Value(value)
    }
}

/// Lower/upper bound of a numeric or timestamp path.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    /// RFC 3339 timestamp or `YYYY-MM-DD` date.
    Instant(String),
}

impl Bound {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Bound::Number(value) => Some(*value),
            Bound::Instant(raw) => raw.trim().parse().ok(),
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Bound::Number(millis) => DateTime::from_timestamp_millis(*millis as i64),
            Bound::Instant(raw) => parse_instant(raw),
        }
    }
}

impl From<DateTime<Utc>> for Bound {
    fn from(value: DateTime<Utc>) -> Self {
        Bound::Instant(value.to_rfc3339())
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Per-path options as declared by the schema author.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PathOptions {
    pub required: Option<Facet<Required>>,
    pub default: Option<DefaultValue>,
    #[serde(skip)]
    #[schemars(skip)]
    pub set: Option<Setter>,
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<serde_json::Value>>,
    pub min: Option<Facet<Bound>>,
    pub max: Option<Facet<Bound>>,
    pub minlength: Option<Facet<usize>>,
    pub maxlength: Option<Facet<usize>>,
    #[serde(rename = "match")]
    pub pattern: Option<Facet<String>>,
    pub trim: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    #[serde(rename = "ref")]
    pub reference: Option<RefTarget>,
}

/// One declared path. List and map paths describe their element in `of`;
/// embedded paths carry their sub-schema in `schema`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FieldDefinition {
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: Kind,
    #[serde(flatten)]
    pub options: PathOptions,
    #[serde(default)]
    pub schema: Option<SchemaDefinition>,
    #[serde(default)]
    pub of: Option<Box<FieldDefinition>>,
}

impl FieldDefinition {
    pub fn new(path: impl Into<String>, kind: Kind) -> Self {
        Self {
            path: path.into(),
            kind,
            options: PathOptions::default(),
            schema: None,
            of: None,
        }
    }

    /// Element descriptor for `list`/`map` paths (no path of its own).
    pub fn element(kind: Kind) -> Self {
        Self::new(String::new(), kind)
    }

    pub fn embedded(path: impl Into<String>, schema: SchemaDefinition) -> Self {
        Self::new(path, Kind::Embedded).with_schema(schema)
    }

    pub fn list_of(path: impl Into<String>, element: FieldDefinition) -> Self {
        Self::new(path, Kind::List).of(element)
    }

    pub fn map_of(path: impl Into<String>, element: FieldDefinition) -> Self {
        Self::new(path, Kind::Map).of(element)
    }

    pub fn with_schema(mut self, schema: SchemaDefinition) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn of(mut self, element: FieldDefinition) -> Self {
        self.of = Some(Box::new(element));
        self
    }

    pub fn required(mut self, value: bool) -> Self {
        self.options.required = Some(Facet::Value(Required::Literal(value)));
        self
    }

    pub fn required_when(mut self, f: impl Fn(&Document) -> bool + Send + Sync + 'static) -> Self {
        self.options.required = Some(Facet::Value(Required::producer(f)));
        self
    }

    pub fn default_value(mut self, value: impl Into<FieldValue>) -> Self {
        self.options.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    pub fn default_with(
        mut self,
        f: impl Fn(&Document) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        self.options.default = Some(DefaultValue::producer(f));
        self
    }

    pub fn set(mut self, f: impl Fn(FieldValue) -> FieldValue + Send + Sync + 'static) -> Self {
        self.options.set = Some(Setter::new(f));
        self
    }

    pub fn enumeration<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.options.enumeration = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn min(mut self, value: impl Into<Bound>) -> Self {
        self.options.min = Some(Facet::Value(value.into()));
        self
    }

    pub fn max(mut self, value: impl Into<Bound>) -> Self {
        self.options.max = Some(Facet::Value(value.into()));
        self
    }

    pub fn minlength(mut self, value: usize) -> Self {
        self.options.minlength = Some(Facet::Value(value));
        self
    }

    pub fn maxlength(mut self, value: usize) -> Self {
        self.options.maxlength = Some(Facet::Value(value));
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.options.pattern = Some(Facet::Value(pattern.into()));
        self
    }

    pub fn trim(mut self) -> Self {
        self.options.trim = true;
        self
    }

    pub fn lowercase(mut self) -> Self {
        self.options.lowercase = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.options.uppercase = true;
        self
    }

    pub fn reference(mut self, entity: impl Into<String>) -> Self {
        self.options.reference = Some(RefTarget::Entity(entity.into()));
        self
    }

    pub fn reference_with(mut self, f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.options.reference = Some(RefTarget::producer(f));
        self
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::Number(value)
    }
}

impl From<i64> for Bound {
    fn from(value: i64) -> Self {
        Bound::Number(value as f64)
    }
}

impl From<&str> for Bound {
    fn from(value: &str) -> Self {
        Bound::Instant(value.to_string())
    }
}

/// Declarative description of one entity's documents.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub timestamps: Option<TimestampLabels>,
}

impl SchemaDefinition {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: None,
            fields,
            timestamps: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Stamp creation/update instants; the labels become timestamp paths.
    pub fn with_timestamps(mut self, labels: TimestampLabels) -> Self {
        self.timestamps = Some(labels);
        self.ensure_timestamp_paths();
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let mut schema: SchemaDefinition = serde_json::from_str(raw)?;
        schema.ensure_timestamp_paths();
        Ok(schema)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    fn ensure_timestamp_paths(&mut self) {
        let Some(labels) = self.timestamps.clone() else {
            return;
        };
        for label in [labels.created_at, labels.updated_at] {
            if !self.fields.iter().any(|field| field.path == label) {
                self.fields.push(FieldDefinition::new(label, Kind::Timestamp));
            }
        }
    }
}

impl SchemaInspect for SchemaDefinition {
    fn paths(&self) -> Vec<&dyn PathInspect> {
        self.fields
            .iter()
            .map(|field| field as &dyn PathInspect)
            .collect()
    }

    fn timestamps(&self) -> Option<&TimestampLabels> {
        self.timestamps.as_ref()
    }
}

impl PathInspect for FieldDefinition {
    fn path(&self) -> &str {
        &self.path
    }

    fn kind(&self) -> Kind {
        self.kind
    }

    fn options(&self) -> &PathOptions {
        &self.options
    }

    fn schema(&self) -> Option<&dyn SchemaInspect> {
        self.schema
            .as_ref()
            .map(|schema| schema as &dyn SchemaInspect)
    }

    fn caster(&self) -> Option<&dyn PathInspect> {
        self.of.as_deref().map(|element| element as &dyn PathInspect)
    }
}
