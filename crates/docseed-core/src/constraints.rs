use chrono::{DateTime, Utc};

use crate::producers::{DefaultValue, RefTarget, Required, Setter};
use crate::types::Kind;

/// Schema-derived description of a document's fields, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTree {
    nodes: Vec<ConstraintNode>,
}

impl ConstraintTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: ConstraintNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConstraintNode> {
        self.nodes.iter()
    }

    pub fn get(&self, path: &str) -> Option<&ConstraintNode> {
        self.nodes.iter().find(|node| node.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|node| node.path.as_str())
    }
}

impl<'a> IntoIterator for &'a ConstraintTree {
    type Item = &'a ConstraintNode;
    type IntoIter = std::slice::Iter<'a, ConstraintNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl FromIterator<ConstraintNode> for ConstraintTree {
    fn from_iter<I: IntoIterator<Item = ConstraintNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// One field of a constraint tree.
#[derive(Debug, Clone)]
pub struct ConstraintNode {
    pub path: String,
    pub required: Option<Required>,
    pub default: Option<DefaultValue>,
    pub set: Option<Setter>,
    pub facets: Facets,
}

impl ConstraintNode {
    pub fn new(path: impl Into<String>, facets: Facets) -> Self {
        Self {
            path: path.into(),
            required: None,
            default: None,
            set: None,
            facets,
        }
    }

    pub fn kind(&self) -> Kind {
        self.facets.kind()
    }

    /// Whether `required` or `default` reads sibling fields.
    pub fn depends_on_siblings(&self) -> bool {
        self.required.as_ref().is_some_and(Required::is_producer)
            || self.default.as_ref().is_some_and(DefaultValue::is_producer)
    }

    /// Declared reference target, for `object_id` and `list` nodes.
    pub fn reference(&self) -> Option<&RefTarget> {
        match &self.facets {
            Facets::ObjectId(facets) => facets.reference.as_ref(),
            Facets::List(facets) => facets.reference.as_ref(),
            _ => None,
        }
    }
}

/// Kind tag plus the facets that kind carries.
#[derive(Debug, Clone)]
pub enum Facets {
    Text(TextFacets),
    Integer(NumberFacets),
    Float(NumberFacets),
    Boolean,
    Timestamp(TimestampFacets),
    Bytes,
    Decimal(NumberFacets),
    Uuid,
    Int32(NumberFacets),
    BigInt(NumberFacets),
    ObjectId(ReferenceFacets),
    Embedded(ConstraintTree),
    List(ListFacets),
    Map(MapFacets),
    Mixed,
}

impl Facets {
    /// Facet-less descriptor for `kind`. `None` for kinds that need a child
    /// descriptor (embedded, list, map).
    pub fn bare(kind: Kind) -> Option<Self> {
        let facets = match kind {
            Kind::Text => Facets::Text(TextFacets::default()),
            Kind::Integer => Facets::Integer(NumberFacets::default()),
            Kind::Float => Facets::Float(NumberFacets::default()),
            Kind::Boolean => Facets::Boolean,
            Kind::Timestamp => Facets::Timestamp(TimestampFacets::default()),
            Kind::Bytes => Facets::Bytes,
            Kind::Decimal => Facets::Decimal(NumberFacets::default()),
            Kind::Uuid => Facets::Uuid,
            Kind::Int32 => Facets::Int32(NumberFacets::default()),
            Kind::BigInt => Facets::BigInt(NumberFacets::default()),
            Kind::ObjectId => Facets::ObjectId(ReferenceFacets::default()),
            Kind::Mixed => Facets::Mixed,
            Kind::Embedded | Kind::List | Kind::Map => return None,
        };
        Some(facets)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Facets::Text(_) => Kind::Text,
            Facets::Integer(_) => Kind::Integer,
            Facets::Float(_) => Kind::Float,
            Facets::Boolean => Kind::Boolean,
            Facets::Timestamp(_) => Kind::Timestamp,
            Facets::Bytes => Kind::Bytes,
            Facets::Decimal(_) => Kind::Decimal,
            Facets::Uuid => Kind::Uuid,
            Facets::Int32(_) => Kind::Int32,
            Facets::BigInt(_) => Kind::BigInt,
            Facets::ObjectId(_) => Kind::ObjectId,
            Facets::Embedded(_) => Kind::Embedded,
            Facets::List(_) => Kind::List,
            Facets::Map(_) => Kind::Map,
            Facets::Mixed => Kind::Mixed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFacets {
    pub enumeration: Vec<String>,
    pub pattern: Option<String>,
    pub minlength: Option<usize>,
    pub maxlength: Option<usize>,
    pub trim: bool,
    pub lowercase: bool,
    pub uppercase: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberFacets {
    pub enumeration: Vec<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimestampFacets {
    pub min: Option<DateTime<Utc>>,
    pub max: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceFacets {
    pub reference: Option<RefTarget>,
}

#[derive(Debug, Clone)]
pub struct ListFacets {
    pub of: Element,
    /// Set when the list holds identifiers of another entity.
    pub reference: Option<RefTarget>,
}

#[derive(Debug, Clone)]
pub struct MapFacets {
    pub of: Element,
}

/// Element descriptor of a list or map.
#[derive(Debug, Clone)]
pub enum Element {
    Primitive(Kind),
    List(Box<ListFacets>),
    Document(ConstraintTree),
}
