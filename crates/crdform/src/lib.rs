//! Form templates from CustomResourceDefinition schemas, and manifests from
//! filled-in form fields.
//!
//! The two core operations are [`extract_template`], which flattens a schema
//! into default and optional [`FieldDefinition`]s, and [`generate_document`],
//! which writes such fields back into a nested resource document.
//!
//! ```
//! let template = crdform::extract_template(
//!     "apiVersion: apps/v1\nkind: Deployment\nspec:\n  replicas: 2\n",
//! )
//! .unwrap();
//! let yaml = crdform::generate_yaml(
//!     &template.api_version,
//!     &template.kind,
//!     &template.default_fields,
//! )
//! .unwrap();
//! assert!(yaml.contains("replicas: 2"));
//! ```

pub mod catalog;
mod generate;
pub mod source;
pub mod store;

pub use crdform_document::{FieldPath, FieldType, Mapping, PathError, Value};
pub use crdform_schema::{
    ExtractConfig, ExtractError, FieldDefinition, SeedConfig, TemplateDefinition,
    ValidationReport, extract_template, extract_template_with_config, normalize_id,
    validate_crd,
};
pub use generate::{
    GenerateError, GenerateRequest, GeneratedDocument, SkippedField, generate_document,
    generate_yaml,
};
