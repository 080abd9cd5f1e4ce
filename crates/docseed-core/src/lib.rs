//! Core contracts and helpers for docseed.
//!
//! This crate defines the declarative schema model, the constraint tree the
//! analyzer derives from it, and the value types generated documents are
//! built from.

pub mod constraints;
pub mod error;
pub mod producers;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use constraints::{
    ConstraintNode, ConstraintTree, Element, Facets, ListFacets, MapFacets, NumberFacets,
    ReferenceFacets, TextFacets, TimestampFacets,
};
pub use error::{Error, Result};
pub use producers::{DefaultValue, RefTarget, Required, Setter};
pub use schema::{
    Bound, Facet, FieldDefinition, PathInspect, PathOptions, SchemaDefinition, SchemaInspect,
};
pub use types::{Kind, TimestampLabels};
pub use validation::validate_schema;
pub use value::{Document, DocumentId, FieldValue};

/// Identity key every stored document carries.
pub const ID_PATH: &str = "_id";
/// Version counter maintained by the store.
pub const VERSION_PATH: &str = "__v";
