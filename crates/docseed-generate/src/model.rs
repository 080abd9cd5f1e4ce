use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use docseed_core::{Document, FieldValue, TimestampLabels};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

pub type OverrideFn = Arc<dyn Fn(&Document, &mut dyn RngCore) -> FieldValue + Send + Sync>;
pub type TimestampProducer = Arc<dyn Fn(&Document) -> (FieldValue, FieldValue) + Send + Sync>;

/// Per-path generators that replace kind-specific logic.
#[derive(Clone, Default)]
pub struct FieldOverrides {
    by_path: BTreeMap<String, OverrideFn>,
}

impl FieldOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        path: impl Into<String>,
        f: impl Fn(&Document, &mut dyn RngCore) -> FieldValue + Send + Sync + 'static,
    ) {
        self.by_path.insert(path.into(), Arc::new(f));
    }

    pub fn with(
        mut self,
        path: impl Into<String>,
        f: impl Fn(&Document, &mut dyn RngCore) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        self.insert(path, f);
        self
    }

    pub fn get(&self, path: &str) -> Option<&OverrideFn> {
        self.by_path.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

impl fmt::Debug for FieldOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_path.keys()).finish()
    }
}

/// Options that control document generation.
#[derive(Clone)]
pub struct GeneratorOptions {
    pub overrides: FieldOverrides,
    /// Chance that a field without `required` is emitted.
    pub optional_field_probability: f64,
    /// Synthesize created/updated timestamps once per document.
    pub timestamps: bool,
    /// Paths that receive the created/updated instant.
    pub timestamp_labels: Option<TimestampLabels>,
    /// Produces the created/updated pair instead of sampling it.
    pub timestamp_override: Option<TimestampProducer>,
    /// Seed for deterministic output; random when unset.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            overrides: FieldOverrides::default(),
            optional_field_probability: 0.7,
            timestamps: true,
            timestamp_labels: None,
            timestamp_override: None,
            seed: None,
        }
    }
}

impl GeneratorOptions {
    pub fn validate(&self) -> Result<(), GenerationError> {
        let p = self.optional_field_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(GenerationError::InvalidOptions(format!(
                "optional_field_probability must be within [0, 1], got {p}"
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("overrides", &self.overrides)
            .field("optional_field_probability", &self.optional_field_probability)
            .field("timestamps", &self.timestamps)
            .field("timestamp_labels", &self.timestamp_labels)
            .field("timestamp_override", &self.timestamp_override.is_some())
            .field("seed", &self.seed)
            .finish()
    }
}

/// Number of documents to seed: fixed, or drawn from an inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Fixed(u64),
    Range(u64, u64),
}

impl Quantity {
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match *self {
            Quantity::Fixed(count) => count,
            Quantity::Range(min, max) if min >= max => min,
            Quantity::Range(min, max) => rng.random_range(min..=max),
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Fixed(10)
    }
}

/// One seeding run for a single entity.
#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    pub quantity: Quantity,
    /// Delete existing documents first.
    pub clean: bool,
    /// Paths skipped in addition to the reserved ones.
    pub exclude: Vec<String>,
    pub generator: GeneratorOptions,
}

/// Summary of a seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedReport {
    pub entity: String,
    pub requested: u64,
    pub inserted: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaned: Option<u64>,
    pub generate_ms: u64,
    pub insert_ms: u64,
}
