use thiserror::Error;

use docseed_core::Kind;

/// Errors emitted while generating documents.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The target entity has no known or loadable identifiers.
    #[error(
        "unable to resolve reference for entity '{entity}': the collection is empty and no reference documents are available; seed the '{entity}' collection first"
    )]
    ReferenceUnresolvable { entity: String },
    /// No collection is registered under the target entity name.
    #[error(
        "reference resolution failed: entity '{entity}' is not registered with the store; define and register it before seeding documents that reference it"
    )]
    ReferenceTargetUnregistered { entity: String },
    /// A bare value was requested for a kind that needs a child descriptor.
    #[error("unsupported primitive kind '{kind}' for {path}")]
    UnsupportedPrimitive { kind: Kind, path: String },
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Core(#[from] docseed_core::Error),
}

/// Errors raised by a persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown collection: {0}")]
    UnknownCollection(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt record in {collection}: {message}")]
    Corrupt { collection: String, message: String },
}
