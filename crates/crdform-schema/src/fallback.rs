//! Pattern-based template recovery for payloads that do not decode.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::ExtractConfig;
use crate::crd::{CRD_KIND, DEFAULT_API_VERSION, DEFAULT_KIND, PLACEHOLDER_PATH};
use crate::field::{FieldDefinition, TemplateDefinition, normalize_id};

static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::init);

/// Keys that describe schema structure rather than resource fields.
const STRUCTURAL_KEYS: [&str; 8] = [
    "type",
    "properties",
    "items",
    "description",
    "required",
    "metadata",
    "spec",
    "status",
];

struct Patterns {
    group: Regex,
    version: Regex,
    version_ref: Regex,
    names_kind: Regex,
    top_level_kind: Regex,
    top_level_api_version: Regex,
    field: Regex,
}

impl Patterns {
    fn init() -> Self {
        Self {
            group: Regex::new(r"(?m)^[ \t]*group:[ \t]*([A-Za-z0-9.-]+)[ \t]*\r?$").unwrap(),
            version: Regex::new(r"(?m)^[ \t]*version:[ \t]*(v[0-9A-Za-z.-]+)[ \t]*\r?$").unwrap(),
            version_ref: Regex::new(r"(?m)^[ \t]*-[ \t]*name:[ \t]*(v[0-9A-Za-z.-]+)[ \t]*\r?$")
                .unwrap(),
            names_kind: Regex::new(r"names:[ \t]*(?:\n[^\n]*){0,20}?\n[ \t]*kind:[ \t]*([A-Za-z0-9]+)")
                .unwrap(),
            top_level_kind: Regex::new(r"(?m)^kind:[ \t]*([A-Za-z0-9]+)[ \t]*\r?$").unwrap(),
            top_level_api_version: Regex::new(r"(?m)^apiVersion:[ \t]*([A-Za-z0-9./-]+)[ \t]*\r?$")
                .unwrap(),
            field: Regex::new(r"(?m)^[ \t]{8,}([A-Za-z][A-Za-z0-9_-]*):[ \t]*\r?$").unwrap(),
        }
    }
}

fn first_capture<'a>(pattern: &Regex, input: &'a str) -> Option<&'a str> {
    pattern
        .captures(input)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .filter(|text| !text.is_empty())
}

/// Recovers a minimal template from text that could not be decoded as a
/// resource.
///
/// The kind comes from a `names:` block or a top-level `kind:` line and the
/// API version from `group:`/version lines or a top-level `apiVersion:` line.
/// Heavily indented bare keys stand in for schema property names.
pub fn fallback_template(raw: &str, config: &ExtractConfig) -> TemplateDefinition {
    let patterns = &*PATTERNS;

    let kind = first_capture(&patterns.names_kind, raw)
        .or_else(|| {
            first_capture(&patterns.top_level_kind, raw)
                .filter(|kind| !kind.eq_ignore_ascii_case(CRD_KIND))
        })
        .unwrap_or(DEFAULT_KIND);

    let group = first_capture(&patterns.group, raw);
    let version = first_capture(&patterns.version_ref, raw)
        .or_else(|| first_capture(&patterns.version, raw));
    let api_version = match (group, version) {
        (Some(group), Some(version)) => format!("{group}/{version}"),
        _ => first_capture(&patterns.top_level_api_version, raw)
            .filter(|api_version| !api_version.starts_with("apiextensions.k8s.io"))
            .unwrap_or(DEFAULT_API_VERSION)
            .to_string(),
    };

    let mut fields: Vec<FieldDefinition> = Vec::new();
    for captures in patterns.field.captures_iter(raw) {
        if fields.len() >= config.fallback_field_limit {
            break;
        }
        let name = &captures[1];
        if STRUCTURAL_KEYS
            .iter()
            .any(|keyword| name.eq_ignore_ascii_case(keyword))
        {
            continue;
        }
        let path = format!("spec.{name}");
        if fields.iter().any(|field| field.path == path) {
            continue;
        }
        fields.push(FieldDefinition::new(
            path,
            format!("Inferred from parsed field '{name}'."),
        ));
    }
    if fields.is_empty() {
        fields.push(FieldDefinition::new(
            PLACEHOLDER_PATH,
            "No schema fields inferred from input. Replace this with real fields.",
        ));
    }

    let mut default_fields = vec![
        FieldDefinition::new("metadata.name", "Name for this resource.")
            .with_value(format!("{}-sample", kind.to_lowercase())),
        FieldDefinition::new("metadata.namespace", "Namespace for this resource.")
            .with_value("default"),
    ];
    default_fields.extend(fields);

    TemplateDefinition {
        id: normalize_id(&format!("parsed-{kind}")),
        title: format!("{kind} (Parsed)"),
        api_version,
        kind: kind.to_string(),
        note: "Generated with fallback parser. Prefer full CRD YAML for richer field inference."
            .to_string(),
        default_fields,
        optional_fields: vec![
            FieldDefinition::new("metadata.labels.app", "Optional labels."),
            FieldDefinition::new("metadata.annotations.owner", "Optional annotations."),
        ],
    }
}
