//! Constraint extraction from declarative schemas.

pub mod analyzer;
pub mod options;

pub use analyzer::{SchemaAnalyzer, constraints};
pub use options::AnalyzerOptions;

pub use docseed_core::ConstraintTree;
