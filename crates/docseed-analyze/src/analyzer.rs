use std::collections::BTreeSet;

use docseed_core::{
    ConstraintNode, ConstraintTree, Element, Facet, Facets, Kind, ListFacets, MapFacets,
    NumberFacets, PathInspect, PathOptions, ReferenceFacets, SchemaInspect, TextFacets,
    TimestampFacets,
};
use serde_json::Value;

use crate::options::AnalyzerOptions;

const WILDCARD_SEGMENT: &str = ".$*";

/// Derive a constraint tree with default options.
pub fn constraints(schema: &dyn SchemaInspect) -> ConstraintTree {
    SchemaAnalyzer::default().constraints(schema)
}

/// Walks a schema once, depth first, and mirrors it as plain constraint data.
#[derive(Debug, Clone)]
pub struct SchemaAnalyzer {
    excluded: BTreeSet<String>,
}

impl Default for SchemaAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerOptions::default())
    }
}

impl SchemaAnalyzer {
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            excluded: options.excluded_paths(),
        }
    }

    pub fn constraints(&self, schema: &dyn SchemaInspect) -> ConstraintTree {
        schema
            .paths()
            .into_iter()
            .filter(|path| !self.skips(path.path()))
            .map(|path| self.node(path))
            .collect()
    }

    fn skips(&self, path: &str) -> bool {
        self.excluded.contains(path) || path.contains(WILDCARD_SEGMENT)
    }

    fn node(&self, path: &dyn PathInspect) -> ConstraintNode {
        let options = path.options();
        let mut node = ConstraintNode::new(path.path(), self.facets(path));
        node.required = options.required.clone().map(Facet::into_value);
        node.default = options.default.clone();
        node.set = options.set.clone();
        node
    }

    fn facets(&self, path: &dyn PathInspect) -> Facets {
        let options = path.options();
        match path.kind() {
            Kind::Text => Facets::Text(text_facets(options)),
            Kind::Integer => Facets::Integer(number_facets(options)),
            Kind::Float => Facets::Float(number_facets(options)),
            Kind::Decimal => Facets::Decimal(number_facets(options)),
            Kind::Int32 => Facets::Int32(number_facets(options)),
            Kind::BigInt => Facets::BigInt(number_facets(options)),
            Kind::Boolean => Facets::Boolean,
            Kind::Bytes => Facets::Bytes,
            Kind::Uuid => Facets::Uuid,
            Kind::Mixed => Facets::Mixed,
            Kind::Timestamp => Facets::Timestamp(TimestampFacets {
                min: options.min.as_ref().and_then(|f| f.value().as_timestamp()),
                max: options.max.as_ref().and_then(|f| f.value().as_timestamp()),
            }),
            Kind::ObjectId => Facets::ObjectId(ReferenceFacets {
                reference: options.reference.clone(),
            }),
            Kind::Embedded => Facets::Embedded(
                path.schema()
                    .map(|schema| self.constraints(schema))
                    .unwrap_or_default(),
            ),
            Kind::List => {
                let caster = path.caster();
                let reference = options
                    .reference
                    .clone()
                    .or_else(|| caster.and_then(|c| c.options().reference.clone()));
                Facets::List(ListFacets {
                    of: self.list_element(caster),
                    reference,
                })
            }
            Kind::Map => Facets::Map(MapFacets {
                of: self.map_element(path.caster()),
            }),
        }
    }

    fn list_element(&self, caster: Option<&dyn PathInspect>) -> Element {
        let Some(caster) = caster else {
            return Element::Primitive(Kind::Mixed);
        };
        if let Some(schema) = caster.schema() {
            return Element::Document(self.constraints(schema));
        }
        if caster.kind() == Kind::List {
            return Element::List(Box::new(ListFacets {
                of: self.list_element(caster.caster()),
                reference: None,
            }));
        }
        Element::Primitive(caster.kind())
    }

    fn map_element(&self, caster: Option<&dyn PathInspect>) -> Element {
        match caster {
            Some(caster) => match caster.schema() {
                Some(schema) => Element::Document(self.constraints(schema)),
                None => Element::Primitive(caster.kind()),
            },
            None => Element::Primitive(Kind::Mixed),
        }
    }
}

fn text_facets(options: &PathOptions) -> TextFacets {
    TextFacets {
        enumeration: options
            .enumeration
            .iter()
            .flatten()
            .map(|value| match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
        pattern: options.pattern.clone().map(Facet::into_value),
        minlength: options.minlength.as_ref().map(|f| *f.value()),
        maxlength: options.maxlength.as_ref().map(|f| *f.value()),
        trim: options.trim,
        lowercase: options.lowercase,
        uppercase: options.uppercase,
    }
}

fn number_facets(options: &PathOptions) -> NumberFacets {
    NumberFacets {
        enumeration: options
            .enumeration
            .iter()
            .flatten()
            .filter_map(|value| match value {
                Value::Number(number) => number.as_f64(),
                Value::String(text) => text.trim().parse().ok(),
                _ => None,
            })
            .collect(),
        min: options.min.as_ref().and_then(|f| f.value().as_f64()),
        max: options.max.as_ref().and_then(|f| f.value().as_f64()),
    }
}
