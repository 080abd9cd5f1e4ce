mod logging;
mod manifest;
mod ndjson;
mod schema_file;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use docseed_generate::{GenerationError, Registry, SeedReport, StoreError, seed};
use thiserror::Error;

use manifest::SeedManifest;
use ndjson::NdjsonStore;

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("core error: {0}")]
    Core(#[from] docseed_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("manifest error: {0}")]
    Manifest(#[from] toml::de::Error),
    #[error("invalid schema file {source_path}:\n  {}", .issues.join("\n  "))]
    InvalidSchema {
        source_path: String,
        issues: Vec<String>,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "docseed", version, about = "Schema-driven fake document seeder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and store documents for every manifest entity, in order.
    Seed(SeedArgs),
    /// Print the JSON Schema of schema definition files.
    SchemaJson,
}

#[derive(Args, Debug)]
struct SeedArgs {
    /// Seed manifest (TOML).
    #[arg(long, default_value = "docseed.toml")]
    manifest: PathBuf,
    /// Directory holding one NDJSON file per entity.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Also write JSON log lines to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Override the manifest's base seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Seed(args) => run_seed(args).await,
        Command::SchemaJson => emit_schema_json(),
    }
}

async fn run_seed(args: SeedArgs) -> Result<(), CliError> {
    logging::init_logging(args.log_file.as_deref())?;

    let mut manifest = SeedManifest::load(&args.manifest)?;
    if args.seed.is_some() {
        manifest.defaults.seed = args.seed;
    }

    let timer = Instant::now();
    tracing::info!(
        event = "run_started",
        manifest = %args.manifest.display(),
        data_dir = %args.data_dir.display(),
        entities = manifest.entities.len()
    );

    for report in seed_manifest(&manifest, &args.data_dir).await? {
        println!(
            "{:<20} requested={:<6} inserted={:<6} generate_ms={:<6} insert_ms={}",
            report.entity, report.requested, report.inserted, report.generate_ms, report.insert_ms
        );
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

/// Seed every manifest entity in order, sharing one reference registry.
async fn seed_manifest(
    manifest: &SeedManifest,
    data_dir: &Path,
) -> Result<Vec<SeedReport>, CliError> {
    if manifest.entities.is_empty() {
        return Err(CliError::InvalidConfig(
            "manifest lists no entities".to_string(),
        ));
    }

    let mut store = NdjsonStore::new(data_dir);
    for entity in &manifest.entities {
        store.register(&entity.name);
    }
    let store = Arc::new(store);
    let registry = Arc::new(Registry::new(store.clone()));

    let mut reports = Vec::with_capacity(manifest.entities.len());
    for (index, entity) in manifest.entities.iter().enumerate() {
        let schema = schema_file::load_schema(&manifest.schema_path(entity))?;
        let collection = store.require(&entity.name)?;
        let config = manifest.seed_config(index, entity);
        reports.push(seed(collection, Arc::clone(&registry), &schema, config).await?);
    }
    Ok(reports)
}

fn emit_schema_json() -> Result<(), CliError> {
    let schema = schema_file::definition_json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
