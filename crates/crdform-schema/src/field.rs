use std::sync::LazyLock;

use crdform_document::{FieldPath, FieldType};
use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_ID_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Identifier used when nothing usable is left after normalization.
pub const FALLBACK_TEMPLATE_ID: &str = "parsed-custom-resource";

/// One editable form field: an address, a seed value and a type hint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "FieldType::is_unspecified"
    )]
    pub field_type: FieldType,
}

impl FieldDefinition {
    pub fn new(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// The key directly under `spec` this field lives in, without any index.
    pub fn top_level_spec_key(&self) -> Option<&str> {
        top_level_spec_key(&self.path)
    }
}

/// A named bundle of default and optional fields for one resource kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: String,
    pub title: String,
    pub api_version: String,
    pub kind: String,
    pub note: String,
    pub default_fields: Vec<FieldDefinition>,
    pub optional_fields: Vec<FieldDefinition>,
}

impl TemplateDefinition {
    /// Every field of the template, defaults first.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.default_fields.iter().chain(&self.optional_fields)
    }
}

/// Lower-cases `input` and collapses every run of other characters into one `-`.
pub fn normalize_id(input: &str) -> String {
    let lower = input.to_lowercase();
    let id = NON_ID_CHARS.replace_all(&lower, "-");
    let id = id.trim_matches('-');
    if id.is_empty() {
        FALLBACK_TEMPLATE_ID.to_string()
    } else {
        id.to_string()
    }
}

pub(crate) fn top_level_spec_key(path: &str) -> Option<&str> {
    let mut parts = path.split('.');
    if parts.next() != Some("spec") {
        return None;
    }
    let key = parts.next()?;
    let key = key.split_once('[').map_or(key, |(key, _)| key);
    (!key.is_empty()).then_some(key)
}

/// Drops blank paths and every repeat of an already seen path.
pub(crate) fn dedup_fields(fields: impl IntoIterator<Item = FieldDefinition>) -> Vec<FieldDefinition> {
    let mut seen = std::collections::HashSet::new();
    fields
        .into_iter()
        .filter(|field| !field.path.trim().is_empty() && seen.insert(field.path.clone()))
        .collect()
}

pub(crate) fn spec_path(key: &str) -> FieldPath {
    FieldPath::key("spec").child(key)
}
