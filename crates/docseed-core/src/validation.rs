use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::{FieldDefinition, SchemaDefinition};
use crate::types::Kind;

/// Validate internal consistency of a schema definition.
///
/// This checks:
/// - duplicate paths within one (sub-)schema
/// - compound paths carry their child description
/// - `ref` only on identifier or list paths
/// - declared bounds are ordered
pub fn validate_schema(schema: &SchemaDefinition) -> Result<()> {
    validate_fields(&schema.fields, "")
}

fn validate_fields(fields: &[FieldDefinition], prefix: &str) -> Result<()> {
    let mut seen = BTreeSet::new();
    for field in fields {
        let qualified = format!("{prefix}{}", field.path);
        if field.path.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "empty path under '{prefix}'"
            )));
        }
        if !seen.insert(field.path.as_str()) {
            return Err(Error::InvalidSchema(format!("duplicate path: {qualified}")));
        }
        validate_field(field, &qualified)?;
    }
    Ok(())
}

fn validate_field(field: &FieldDefinition, qualified: &str) -> Result<()> {
    let options = &field.options;

    if options.reference.is_some() && !matches!(field.kind, Kind::ObjectId | Kind::List) {
        return Err(Error::InvalidSchema(format!(
            "ref declared on {} path: {qualified}",
            field.kind
        )));
    }

    if let (Some(min), Some(max)) = (&options.minlength, &options.maxlength) {
        if min.value() > max.value() {
            return Err(Error::InvalidSchema(format!(
                "minlength {} exceeds maxlength {} on {qualified}",
                min.value(),
                max.value()
            )));
        }
    }

    if let (Some(min), Some(max)) = (&options.min, &options.max) {
        let ordered = if field.kind == Kind::Timestamp {
            match (min.value().as_timestamp(), max.value().as_timestamp()) {
                (Some(min), Some(max)) => min <= max,
                _ => {
                    return Err(Error::InvalidSchema(format!(
                        "unparseable timestamp bound on {qualified}"
                    )));
                }
            }
        } else {
            match (min.value().as_f64(), max.value().as_f64()) {
                (Some(min), Some(max)) => min <= max,
                _ => {
                    return Err(Error::InvalidSchema(format!(
                        "non-numeric bound on {qualified}"
                    )));
                }
            }
        };
        if !ordered {
            return Err(Error::InvalidSchema(format!(
                "min exceeds max on {qualified}"
            )));
        }
    }

    match field.kind {
        Kind::Embedded => {
            let schema = field.schema.as_ref().ok_or_else(|| {
                Error::InvalidSchema(format!("embedded path without schema: {qualified}"))
            })?;
            validate_fields(&schema.fields, &format!("{qualified}."))?;
        }
        Kind::List | Kind::Map => {
            let element = field.of.as_deref().ok_or_else(|| {
                Error::InvalidSchema(format!("{} path without element: {qualified}", field.kind))
            })?;
            if field.kind == Kind::Map && matches!(element.kind, Kind::List | Kind::Map) {
                return Err(Error::InvalidSchema(format!(
                    "map values must be a primitive or a sub-schema: {qualified}"
                )));
            }
            validate_element(element, qualified)?;
        }
        _ => {}
    }

    Ok(())
}

fn validate_element(element: &FieldDefinition, qualified: &str) -> Result<()> {
    match element.kind {
        Kind::Embedded => {
            let schema = element.schema.as_ref().ok_or_else(|| {
                Error::InvalidSchema(format!(
                    "embedded element without schema: {qualified}"
                ))
            })?;
            validate_fields(&schema.fields, &format!("{qualified}.$."))
        }
        Kind::List => {
            let inner = element.of.as_deref().ok_or_else(|| {
                Error::InvalidSchema(format!("nested list without element: {qualified}"))
            })?;
            validate_element(inner, qualified)
        }
        Kind::Map => Err(Error::InvalidSchema(format!(
            "map elements are not supported: {qualified}"
        ))),
        _ => Ok(()),
    }
}
