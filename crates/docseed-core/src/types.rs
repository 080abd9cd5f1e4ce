use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Category of value a schema path (and its constraint node) describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Text,
    Integer,
    Float,
    Boolean,
    Timestamp,
    Bytes,
    Decimal,
    Uuid,
    Int32,
    BigInt,
    /// Store-native identifier; the only scalar kind that may reference an entity.
    ObjectId,
    Embedded,
    List,
    Map,
    Mixed,
}

impl Kind {
    /// Kinds a `mixed` leaf may produce, in a stable order.
    pub const PRIMITIVES: [Kind; 11] = [
        Kind::Text,
        Kind::Integer,
        Kind::Boolean,
        Kind::Timestamp,
        Kind::Bytes,
        Kind::Decimal,
        Kind::Float,
        Kind::Int32,
        Kind::BigInt,
        Kind::ObjectId,
        Kind::Uuid,
    ];

    pub fn is_primitive(self) -> bool {
        !matches!(self, Kind::Embedded | Kind::List | Kind::Map | Kind::Mixed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Text => "text",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Boolean => "boolean",
            Kind::Timestamp => "timestamp",
            Kind::Bytes => "bytes",
            Kind::Decimal => "decimal",
            Kind::Uuid => "uuid",
            Kind::Int32 => "int32",
            Kind::BigInt => "big_int",
            Kind::ObjectId => "object_id",
            Kind::Embedded => "embedded",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paths used to stamp creation and update instants on each document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimestampLabels {
    pub created_at: String,
    pub updated_at: String,
}

impl Default for TimestampLabels {
    fn default() -> Self {
        Self {
            created_at: "createdAt".to_string(),
            updated_at: "updatedAt".to_string(),
        }
    }
}

impl TimestampLabels {
    pub fn new(created_at: impl Into<String>, updated_at: impl Into<String>) -> Self {
        Self {
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.created_at == path || self.updated_at == path
    }
}
