use std::path::Path;

use docseed_core::{SchemaDefinition, validate_schema};
use jsonschema::JSONSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::CliError;

/// JSON Schema describing schema definition files.
pub fn definition_json_schema() -> RootSchema {
    schema_for!(SchemaDefinition)
}

/// Read, structurally check and validate one schema definition file.
pub fn load_schema(path: &Path) -> Result<SchemaDefinition, CliError> {
    let raw = std::fs::read_to_string(path)?;
    parse_schema(&raw).map_err(|err| match err {
        CliError::InvalidSchema { issues, .. } => CliError::InvalidSchema {
            source_path: path.display().to_string(),
            issues,
        },
        other => other,
    })
}

pub fn parse_schema(raw: &str) -> Result<SchemaDefinition, CliError> {
    let json: Value = serde_json::from_str(raw)?;
    let issues = structural_issues(&json)?;
    if !issues.is_empty() {
        return Err(CliError::InvalidSchema {
            source_path: "<inline>".to_string(),
            issues,
        });
    }

    let schema = SchemaDefinition::from_json_str(raw)?;
    validate_schema(&schema)?;
    Ok(schema)
}

/// Violations of the definition JSON Schema, as `pointer: message` lines.
fn structural_issues(json: &Value) -> Result<Vec<String>, CliError> {
    let schema = serde_json::to_value(definition_json_schema())?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| CliError::InvalidConfig(err.to_string()))?;

    let mut issues = Vec::new();
    if let Err(errors) = compiled.validate(json) {
        for error in errors {
            let pointer = error.instance_path.to_string();
            let pointer = if pointer.is_empty() { "/".to_string() } else { pointer };
            issues.push(format!("{pointer}: {error}"));
        }
    }
    Ok(issues)
}
