use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use docseed_generate::{GeneratorOptions, Quantity, SeedConfig};
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Settings shared by every entity of a seed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestDefaults {
    pub optional_field_probability: f64,
    pub timestamps: bool,
    /// Base seed; entity `n` (zero-based) is seeded with `seed + n`.
    pub seed: Option<u64>,
}

impl Default for ManifestDefaults {
    fn default() -> Self {
        let options = GeneratorOptions::default();
        Self {
            optional_field_probability: options.optional_field_probability,
            timestamps: options.timestamps,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityEntry {
    pub name: String,
    /// Schema JSON file, relative to the manifest.
    pub schema: PathBuf,
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub clean: bool,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Ordered list of entities to seed, read from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedManifest {
    #[serde(default)]
    pub defaults: ManifestDefaults,
    #[serde(default)]
    pub entities: Vec<EntityEntry>,
    #[serde(skip)]
    root: PathBuf,
}

impl SeedManifest {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_toml_str(&content)?;
        manifest.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CliError> {
        let manifest: SeedManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), CliError> {
        let probability = self.defaults.optional_field_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(CliError::InvalidConfig(format!(
                "optional_field_probability must be within [0, 1], got {probability}"
            )));
        }
        let mut seen = BTreeSet::new();
        for entity in &self.entities {
            if entity.name.trim().is_empty() {
                return Err(CliError::InvalidConfig("entity name is empty".to_string()));
            }
            if !seen.insert(entity.name.as_str()) {
                return Err(CliError::InvalidConfig(format!(
                    "entity '{}' is listed twice",
                    entity.name
                )));
            }
            if let Quantity::Range(min, max) = entity.quantity
                && min > max
            {
                return Err(CliError::InvalidConfig(format!(
                    "quantity range [{min}, {max}] of '{}' is empty",
                    entity.name
                )));
            }
        }
        Ok(())
    }

    /// Schema path of `entity`, resolved against the manifest directory.
    pub fn schema_path(&self, entity: &EntityEntry) -> PathBuf {
        if entity.schema.is_absolute() {
            entity.schema.clone()
        } else {
            self.root.join(&entity.schema)
        }
    }

    pub fn seed_config(&self, index: usize, entity: &EntityEntry) -> SeedConfig {
        SeedConfig {
            quantity: entity.quantity,
            clean: entity.clean,
            exclude: entity.exclude.clone(),
            generator: GeneratorOptions {
                optional_field_probability: self.defaults.optional_field_probability,
                timestamps: self.defaults.timestamps,
                seed: self
                    .defaults
                    .seed
                    .map(|seed| seed.wrapping_add(index as u64)),
                ..GeneratorOptions::default()
            },
        }
    }
}
