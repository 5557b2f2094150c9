//! Conversion between `serde_yaml` documents and crdform [`Value`](crdform_document::Value) trees.

mod convert;
mod error;

pub use convert::{parse_documents, to_yaml_string, value_to_yaml, yaml_to_value};
pub use error::Error;

#[cfg(test)]
mod tests;

/// Result type for crdform-yaml operations
pub type Result<T> = std::result::Result<T, Error>;
