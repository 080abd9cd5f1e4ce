use std::sync::Arc;

use chrono::{DateTime, Utc};
use docseed_core::{
    ConstraintNode, ConstraintTree, Document, DocumentId, Element, Facets, FieldValue, Kind,
    ListFacets, MapFacets, Required,
};
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::errors::GenerationError;
use crate::generators::{self, lorem_word, random_uuid};
use crate::model::GeneratorOptions;
use crate::registry::Registry;
use crate::store::Collection;

const MAX_LIST_LEN: usize = 10;
const MAX_MAP_ENTRIES: usize = 5;
const MIXED_MAX_DEPTH: usize = 3;
const MIXED_MAX_WIDTH: usize = 3;

/// Produces documents for one entity from its constraint tree.
///
/// Fields whose `required` or `default` is a producer run in a second pass,
/// after every independent field is written, in declaration order. Only
/// top-level `object_id` and `list` fields resolve references through the
/// registry; nested ones receive fresh identifiers.
pub struct Generator {
    collection: Arc<dyn Collection>,
    registry: Arc<Registry>,
    options: GeneratorOptions,
    rng: ChaCha8Rng,
}

impl Generator {
    pub fn new(
        collection: Arc<dyn Collection>,
        registry: Arc<Registry>,
        options: GeneratorOptions,
    ) -> Result<Self, GenerationError> {
        options.validate()?;
        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Ok(Self {
            collection,
            registry,
            options,
            rng,
        })
    }

    /// Name of the entity documents are generated for.
    pub fn entity(&self) -> &str {
        self.collection.name()
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub async fn generate(&mut self, tree: &ConstraintTree) -> Result<Document, GenerationError> {
        let now = Utc::now();
        let (dependent, independent): (Vec<&ConstraintNode>, Vec<&ConstraintNode>) =
            tree.iter().partition(|node| node.depends_on_siblings());

        let mut doc = Document::new();
        for node in independent.into_iter().chain(dependent) {
            if let Some(value) = self.field(node, &doc, now).await? {
                doc.insert_path(&node.path, value);
            }
        }
        self.stamp(tree, &mut doc, now);
        Ok(doc)
    }

    async fn field(
        &mut self,
        node: &ConstraintNode,
        doc: &Document,
        now: DateTime<Utc>,
    ) -> Result<Option<FieldValue>, GenerationError> {
        if let Some(default) = &node.default {
            return Ok(Some(default.evaluate(doc)));
        }
        if !self.is_timestamp_label(&node.path) && !self.sampler(now).should_generate(node, doc) {
            return Ok(None);
        }

        let value = match self.options.overrides.get(&node.path).cloned() {
            Some(custom) => custom(doc, &mut self.rng),
            None => self.produce(node, now).await?,
        };
        Ok(Some(match &node.set {
            Some(set) => set.apply(value),
            None => value,
        }))
    }

    async fn produce(
        &mut self,
        node: &ConstraintNode,
        now: DateTime<Utc>,
    ) -> Result<FieldValue, GenerationError> {
        match (&node.facets, node.reference()) {
            (Facets::ObjectId(_), Some(target)) => {
                let entity = target.resolve();
                let id = self
                    .registry
                    .resolve_one(&self.collection, &entity, &mut self.rng)
                    .await?;
                Ok(FieldValue::ObjectId(id))
            }
            (Facets::List(_), Some(target)) => {
                let entity = target.resolve();
                let count = self.rng.random_range(1..=MAX_LIST_LEN);
                let ids = self
                    .registry
                    .resolve_many(&self.collection, &entity, count, &mut self.rng)
                    .await?;
                Ok(FieldValue::Array(
                    ids.into_iter().map(FieldValue::ObjectId).collect(),
                ))
            }
            (facets, _) => self.sampler(now).value(&node.path, facets),
        }
    }

    /// Write the created/updated pair once per document.
    fn stamp(&mut self, tree: &ConstraintTree, doc: &mut Document, now: DateTime<Utc>) {
        let Some(labels) = self.options.timestamp_labels.clone() else {
            return;
        };
        if let Some(producer) = &self.options.timestamp_override {
            let (created, updated) = producer(doc);
            doc.insert_path(&labels.created_at, created);
            doc.insert_path(&labels.updated_at, updated);
            return;
        }
        if !self.options.timestamps {
            return;
        }

        let facets = match tree.get(&labels.created_at).map(|node| &node.facets) {
            Some(Facets::Timestamp(facets)) => facets.clone(),
            _ => Default::default(),
        };
        let instant = generators::timestamp(&labels.created_at, &facets, now, &mut self.rng);
        doc.insert_path(&labels.created_at, FieldValue::Timestamp(instant));
        doc.insert_path(&labels.updated_at, FieldValue::Timestamp(instant));
    }

    fn is_timestamp_label(&self, path: &str) -> bool {
        self.options
            .timestamp_labels
            .as_ref()
            .is_some_and(|labels| labels.contains(path))
    }

    fn sampler(&mut self, now: DateTime<Utc>) -> Sampler<'_> {
        Sampler {
            entity: self.collection.name(),
            rng: &mut self.rng,
            probability: self.options.optional_field_probability,
            now,
        }
    }
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("entity", &self.collection.name())
            .field("options", &self.options)
            .finish()
    }
}

/// Synchronous value production below the top level of a document.
struct Sampler<'g> {
    entity: &'g str,
    rng: &'g mut dyn RngCore,
    probability: f64,
    now: DateTime<Utc>,
}

impl Sampler<'_> {
    fn should_generate(&mut self, node: &ConstraintNode, doc: &Document) -> bool {
        match &node.required {
            Some(Required::Producer(required)) => required(doc),
            Some(Required::Literal(true)) => true,
            _ => self.rng.random_bool(self.probability),
        }
    }

    fn value(&mut self, path: &str, facets: &Facets) -> Result<FieldValue, GenerationError> {
        let value = match facets {
            Facets::Text(text) => {
                FieldValue::Text(generators::text(path, self.entity, text, self.rng))
            }
            Facets::Integer(number)
            | Facets::Float(number)
            | Facets::Decimal(number)
            | Facets::Int32(number)
            | Facets::BigInt(number) => generators::number(path, facets.kind(), number, self.rng),
            Facets::Boolean => FieldValue::Bool(self.rng.random_bool(0.5)),
            Facets::Timestamp(timestamp) => {
                FieldValue::Timestamp(generators::timestamp(path, timestamp, self.now, self.rng))
            }
            Facets::Bytes => FieldValue::Bytes(lorem_word(self.rng).into_bytes()),
            Facets::Uuid => FieldValue::Uuid(random_uuid(self.rng)),
            Facets::ObjectId(_) => FieldValue::ObjectId(DocumentId::from_rng(&mut *self.rng)),
            Facets::Embedded(tree) => FieldValue::Document(self.nested(tree)?),
            Facets::List(list) => FieldValue::Array(self.list(path, list)?),
            Facets::Map(map) => FieldValue::Document(self.map(path, map)?),
            Facets::Mixed => self.mixed(path, 0)?,
        };
        Ok(value)
    }

    /// Per-field procedure over an embedded tree, in declaration order.
    fn nested(&mut self, tree: &ConstraintTree) -> Result<Document, GenerationError> {
        let mut doc = Document::new();
        for node in tree {
            if let Some(default) = &node.default {
                let value = default.evaluate(&doc);
                doc.insert_path(&node.path, value);
                continue;
            }
            if !self.should_generate(node, &doc) {
                continue;
            }
            let value = self.value(&node.path, &node.facets)?;
            let value = match &node.set {
                Some(set) => set.apply(value),
                None => value,
            };
            doc.insert_path(&node.path, value);
        }
        Ok(doc)
    }

    fn list(&mut self, path: &str, list: &ListFacets) -> Result<Vec<FieldValue>, GenerationError> {
        let len = self.rng.random_range(1..=MAX_LIST_LEN);
        (0..len).map(|_| self.element(path, &list.of)).collect()
    }

    fn map(&mut self, path: &str, map: &MapFacets) -> Result<Document, GenerationError> {
        let entries = self.rng.random_range(1..=MAX_MAP_ENTRIES);
        let mut doc = Document::new();
        for _ in 0..entries {
            let key = lorem_word(self.rng);
            let value = self.element(path, &map.of)?;
            doc.insert(key, value);
        }
        Ok(doc)
    }

    fn element(&mut self, path: &str, element: &Element) -> Result<FieldValue, GenerationError> {
        match element {
            Element::Primitive(kind) => self.primitive(*kind, path),
            Element::List(inner) => Ok(FieldValue::Array(self.list(path, inner)?)),
            Element::Document(tree) => Ok(FieldValue::Document(self.nested(tree)?)),
        }
    }

    /// Bare value of `kind` at `path`, so name heuristics still apply.
    fn primitive(&mut self, kind: Kind, path: &str) -> Result<FieldValue, GenerationError> {
        let facets = Facets::bare(kind).ok_or_else(|| GenerationError::UnsupportedPrimitive {
            kind,
            path: path.to_string(),
        })?;
        self.value(path, &facets)
    }

    /// Untyped value; only primitives are produced at `MIXED_MAX_DEPTH`.
    fn mixed(&mut self, path: &str, depth: usize) -> Result<FieldValue, GenerationError> {
        let shape = if depth >= MIXED_MAX_DEPTH {
            0
        } else {
            self.rng.random_range(0..3)
        };
        match shape {
            1 => {
                let len = self.rng.random_range(1..=MIXED_MAX_WIDTH);
                let values = (0..len)
                    .map(|_| self.mixed(path, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FieldValue::Array(values))
            }
            2 => {
                let entries = self.rng.random_range(1..=MIXED_MAX_WIDTH);
                let mut doc = Document::new();
                for _ in 0..entries {
                    let key = lorem_word(self.rng);
                    let value = self.mixed(path, depth + 1)?;
                    doc.insert(key, value);
                }
                Ok(FieldValue::Document(doc))
            }
            _ => {
                let kind = Kind::PRIMITIVES
                    .choose(&mut *self.rng)
                    .copied()
                    .unwrap_or(Kind::Text);
                self.primitive(kind, path)
            }
        }
    }
}
