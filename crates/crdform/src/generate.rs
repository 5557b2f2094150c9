use crdform_document::{FieldPath, Mapping, Value, coerce};
use crdform_schema::FieldDefinition;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("apiVersion is required")]
    MissingApiVersion,
    #[error("kind is required")]
    MissingKind,
    #[error("failed to render YAML: {0}")]
    Render(#[from] crdform_yaml::Error),
}

/// A field that was left out of the generated document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedField {
    pub path: String,
    pub reason: String,
}

/// Input of a generation call, as sent by form clients.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl GenerateRequest {
    pub fn generate(&self) -> Result<GeneratedDocument, GenerateError> {
        generate_document(&self.api_version, &self.kind, &self.fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDocument {
    pub document: Value,
    /// Fields whose path did not parse or clashed with an earlier field.
    pub skipped: Vec<SkippedField>,
}

impl GeneratedDocument {
    pub fn to_yaml(&self) -> Result<String, GenerateError> {
        Ok(crdform_yaml::to_yaml_string(&self.document)?)
    }
}

/// Builds a resource document from form fields.
///
/// `apiVersion` and `kind` come first, then every field is written in input
/// order, later fields overwriting earlier ones at the same path. Fields with a
/// blank path are ignored. A field that cannot be placed is recorded in
/// [`GeneratedDocument::skipped`] and leaves the rest of the document intact.
pub fn generate_document(
    api_version: &str,
    kind: &str,
    fields: &[FieldDefinition],
) -> Result<GeneratedDocument, GenerateError> {
    if api_version.trim().is_empty() {
        return Err(GenerateError::MissingApiVersion);
    }
    if kind.trim().is_empty() {
        return Err(GenerateError::MissingKind);
    }

    let mut root = Mapping::new();
    root.insert("apiVersion".to_string(), Value::from(api_version));
    root.insert("kind".to_string(), Value::from(kind));
    let mut document = Value::Mapping(root);
    let mut skipped = Vec::new();

    for field in fields {
        if field.path.trim().is_empty() {
            continue;
        }
        let written = field
            .path
            .parse::<FieldPath>()
            .map_err(|err| err.to_string())
            .and_then(|path| {
                document
                    .set_path(&path, coerce(&field.value, field.field_type))
                    .map_err(|err| err.to_string())
            });
        if let Err(reason) = written {
            warn!(path = %field.path, "skipping field: {reason}");
            skipped.push(SkippedField {
                path: field.path.clone(),
                reason,
            });
        }
    }

    Ok(GeneratedDocument { document, skipped })
}

/// [`generate_document`] rendered as YAML.
pub fn generate_yaml(
    api_version: &str,
    kind: &str,
    fields: &[FieldDefinition],
) -> Result<String, GenerateError> {
    generate_document(api_version, kind, fields)?.to_yaml()
}
