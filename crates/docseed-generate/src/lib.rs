//! Document generation for docseed.
//!
//! A [`Generator`] turns a constraint tree into documents for one entity,
//! choosing realistic values from name-keyed heuristics and resolving
//! reference fields through a shared [`Registry`]. [`seed`] drives one
//! generate-then-insert batch against a [`Collection`].

pub mod errors;
pub mod generator;
pub mod generators;
pub mod matchers;
pub mod model;
pub mod registry;
pub mod seeder;
pub mod store;

pub use errors::{GenerationError, StoreError};
pub use generator::Generator;
pub use model::{
    FieldOverrides, GeneratorOptions, OverrideFn, Quantity, SeedConfig, SeedReport,
    TimestampProducer,
};
pub use registry::Registry;
pub use seeder::seed;
pub use store::{Collection, DocumentStore, InMemoryCollection, InMemoryStore, ensure_id};
