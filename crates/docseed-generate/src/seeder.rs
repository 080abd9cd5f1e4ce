use std::sync::Arc;
use std::time::Instant;

use docseed_analyze::{AnalyzerOptions, SchemaAnalyzer};
use docseed_core::SchemaInspect;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::errors::GenerationError;
use crate::generator::Generator;
use crate::model::{SeedConfig, SeedReport};
use crate::registry::Registry;
use crate::store::Collection;

/// Generate and persist one batch of documents for `collection`.
///
/// Documents are generated in full before anything is inserted, so a
/// generation error leaves the collection untouched (apart from `clean`).
/// Inserted identifiers are remembered for later reference resolution.
pub async fn seed(
    collection: Arc<dyn Collection>,
    registry: Arc<Registry>,
    schema: &dyn SchemaInspect,
    config: SeedConfig,
) -> Result<SeedReport, GenerationError> {
    let entity = collection.name().to_string();
    let started = Instant::now();

    let cleaned = if config.clean {
        let removed = collection.delete_all().await?;
        info!(entity = %entity, removed, "collection cleaned");
        Some(removed)
    } else {
        None
    };

    let analyzer = SchemaAnalyzer::new(AnalyzerOptions::excluding(config.exclude.iter().cloned()));
    let tree = analyzer.constraints(schema);

    let mut options = config.generator;
    if options.timestamp_labels.is_none() {
        options.timestamp_labels = schema.timestamps().cloned();
    }
    let requested = match options.seed {
        Some(seed) => config.quantity.resolve(&mut ChaCha8Rng::seed_from_u64(seed)),
        None => config.quantity.resolve(&mut rand::rng()),
    };

    info!(
        entity = %entity,
        requested,
        fields = tree.len(),
        "generation started"
    );

    let mut generator = Generator::new(Arc::clone(&collection), Arc::clone(&registry), options)?;
    let interval = (requested / 10).max(1);
    let generate_start = Instant::now();
    let mut documents = Vec::with_capacity(requested as usize);
    for index in 0..requested {
        documents.push(generator.generate(&tree).await?);
        let done = index + 1;
        if done % interval == 0 || done == requested {
            info!(
                entity = %entity,
                generated = done,
                requested,
                "generation progress"
            );
        }
    }
    let generate_ms = generate_start.elapsed().as_millis() as u64;

    let insert_start = Instant::now();
    let ids = collection.insert_many(documents).await?;
    let insert_ms = insert_start.elapsed().as_millis() as u64;
    let inserted = ids.len() as u64;
    registry.remember(&entity, ids);

    info!(
        entity = %entity,
        inserted,
        generate_ms,
        insert_ms,
        duration_ms = started.elapsed().as_millis() as u64,
        "entity seeded"
    );

    Ok(SeedReport {
        entity,
        requested,
        inserted,
        cleaned,
        generate_ms,
        insert_ms,
    })
}
