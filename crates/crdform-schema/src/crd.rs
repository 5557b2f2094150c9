//! Templates built from decoded resource documents.

use std::collections::HashMap;

use crdform_document::{FieldPath, FieldType, Mapping, Value, format_literal};
use tracing::debug;

use crate::config::ExtractConfig;
use crate::error::StructuredParseError;
use crate::extract::collect_fields;
use crate::field::{FieldDefinition, TemplateDefinition, dedup_fields, normalize_id, spec_path};
use crate::node::SchemaNode;
use crate::rank::{Priority, fit_budget, rank};
use crate::seed::{ensure_top_level_coverage, extract_service_seeds};

pub const CRD_KIND: &str = "CustomResourceDefinition";
pub const LIST_KIND: &str = "List";
pub const DEFAULT_API_VERSION: &str = "example.io/v1";
pub const DEFAULT_KIND: &str = "CustomResource";
pub(crate) const PLACEHOLDER_PATH: &str = "spec.example";

/// Follows `keys` through nested mappings.
pub(crate) fn lookup<'a>(root: &'a Mapping, keys: &[&str]) -> Option<&'a Value> {
    let (first, rest) = keys.split_first()?;
    rest.iter()
        .try_fold(root.get(*first)?, |current, key| current.get(key))
}

/// Trimmed string at `keys`, or an empty string.
pub(crate) fn text_at<'a>(root: &'a Mapping, keys: &[&str]) -> &'a str {
    lookup(root, keys)
        .and_then(Value::as_str)
        .map_or("", str::trim)
}

pub(crate) fn kind_of(document: &Mapping) -> &str {
    text_at(document, &["kind"])
}

/// Decodes `raw` and keeps the non-empty mapping documents.
pub(crate) fn decode_resources(raw: &str) -> Result<Vec<Mapping>, StructuredParseError> {
    let resources: Vec<Mapping> = crdform_yaml::parse_documents(raw)?
        .into_iter()
        .filter_map(|document| match document {
            Value::Mapping(mapping) if !mapping.is_empty() => Some(mapping),
            _ => None,
        })
        .collect();
    if resources.is_empty() {
        return Err(StructuredParseError::NoResource);
    }
    Ok(resources)
}

/// Picks the document a template is built from.
///
/// A CRD wins, then a CRD inside a `List`, then anything with a kind, then
/// the first document.
pub(crate) fn select_primary_resource(documents: &[Mapping]) -> Option<&Mapping> {
    let is_crd = |document: &&Mapping| kind_of(document).eq_ignore_ascii_case(CRD_KIND);

    documents
        .iter()
        .find(is_crd)
        .or_else(|| {
            documents
                .iter()
                .filter(|document| kind_of(document).eq_ignore_ascii_case(LIST_KIND))
                .filter_map(|list| list.get("items").and_then(Value::as_sequence))
                .flatten()
                .filter_map(Value::as_mapping)
                .find(is_crd)
        })
        .or_else(|| documents.iter().find(|document| !kind_of(document).is_empty()))
        .or_else(|| documents.first())
}

fn open_api_spec<'a>(schema_holder: &'a Mapping, keys: &[&str]) -> Option<&'a Mapping> {
    lookup(schema_holder, keys).and_then(Value::as_mapping)
}

/// The schema of the resource's `spec` together with the version it belongs to.
///
/// Among `spec.versions` the storage version is preferred, then a served one,
/// then the first entry carrying a schema. CRDs without per-version schemas
/// fall back to `spec.validation.openAPIV3Schema`.
pub(crate) fn select_spec_schema(root: &Mapping) -> (Option<SchemaNode<'_>>, String) {
    let Some(spec) = lookup(root, &["spec"]).and_then(Value::as_mapping) else {
        return (None, String::new());
    };

    let versions: Vec<(&Mapping, &Mapping)> = spec
        .get("versions")
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(Value::as_mapping)
        .filter_map(|version| {
            let schema = open_api_spec(
                version,
                &["schema", "openAPIV3Schema", "properties", "spec"],
            )?;
            Some((version, schema))
        })
        .collect();

    let flag = |version: &Mapping, key: &str| version.get(key).and_then(Value::as_bool) == Some(true);
    let picked = versions
        .iter()
        .find(|(version, _)| flag(*version, "storage"))
        .or_else(|| versions.iter().find(|(version, _)| flag(*version, "served")))
        .or_else(|| versions.first());
    if let Some(&(version, schema)) = picked {
        return (
            Some(SchemaNode::new(schema)),
            text_at(version, &["name"]).to_string(),
        );
    }

    let legacy = open_api_spec(spec, &["validation", "openAPIV3Schema", "properties", "spec"]);
    (
        legacy.map(SchemaNode::new),
        text_at(spec, &["version"]).to_string(),
    )
}

/// Name of the first named entry of a `versions` list.
pub(crate) fn first_version(root: &Mapping) -> String {
    lookup(root, &["spec", "versions"])
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(Value::as_mapping)
        .map(|version| text_at(version, &["name"]))
        .find(|name| !name.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn has_crd_schema(root: &Mapping) -> bool {
    let present = |value: Option<&Value>| value.is_some_and(|value| !value.is_null());
    if present(lookup(root, &["spec", "validation", "openAPIV3Schema"])) {
        return true;
    }
    lookup(root, &["spec", "versions"])
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(Value::as_mapping)
        .any(|version| present(lookup(version, &["schema", "openAPIV3Schema"])))
}

pub(crate) fn parse_structured(raw: &str, config: &ExtractConfig) -> Result<TemplateDefinition, StructuredParseError> {
    let documents = decode_resources(raw)?;
    let root = select_primary_resource(&documents).ok_or(StructuredParseError::NoResource)?;
    let kind = kind_of(root);
    if kind.eq_ignore_ascii_case(CRD_KIND) {
        debug!("building template from CRD schema");
        Ok(parse_crd_document(root, config))
    } else if !kind.is_empty() {
        debug!(kind, "building template from resource object");
        Ok(parse_arbitrary_resource(root, config))
    } else {
        Err(StructuredParseError::MissingKind)
    }
}

/// Ranked fields of one spec schema.
struct SpecFields {
    defaults: Vec<FieldDefinition>,
    optionals: Vec<FieldDefinition>,
    priorities: HashMap<String, Priority>,
}

fn extract_spec_fields(spec_schema: SchemaNode<'_>, config: &ExtractConfig) -> SpecFields {
    let collected = collect_fields(
        FieldPath::key("spec"),
        spec_schema,
        config.max_depth,
        config.candidate_limit,
    );
    debug!(count = collected.len(), "collected schema candidates");

    let ranked = rank(collected, config.max_default_fields);
    let priorities = ranked
        .candidates
        .iter()
        .filter_map(|candidate| {
            let priority = if candidate.required {
                Priority::Required
            } else if candidate.has_default {
                Priority::DefaultBacked
            } else {
                return None;
            };
            Some((candidate.field.path.clone(), priority))
        })
        .collect();
    let defaults = ensure_top_level_coverage(spec_schema, ranked.defaults, &ranked.candidates, &config.seeds);

    SpecFields {
        defaults,
        optionals: ranked.optionals,
        priorities,
    }
}

pub(crate) fn parse_crd_document(root: &Mapping, config: &ExtractConfig) -> TemplateDefinition {
    let kind = Some(text_at(root, &["spec", "names", "kind"]))
        .filter(|kind| !kind.is_empty())
        .unwrap_or(DEFAULT_KIND);
    let group = text_at(root, &["spec", "group"]);

    let (spec_schema, schema_version) = select_spec_schema(root);
    let mut version = text_at(root, &["spec", "version"]).to_string();
    if version.is_empty() {
        version = schema_version;
    }
    if version.is_empty() {
        version = first_version(root);
    }
    let api_version = if !group.is_empty() && !version.is_empty() {
        format!("{group}/{version}")
    } else {
        DEFAULT_API_VERSION.to_string()
    };

    let (seeds, spec_fields) = match spec_schema {
        Some(schema) => (
            extract_service_seeds(schema, &config.seeds),
            Some(extract_spec_fields(schema, config)),
        ),
        None => (Vec::new(), None),
    };
    let SpecFields {
        defaults: ranked_defaults,
        optionals: ranked_optionals,
        mut priorities,
    } = spec_fields.unwrap_or(SpecFields {
        defaults: Vec::new(),
        optionals: Vec::new(),
        priorities: HashMap::new(),
    });

    for seed in &seeds {
        priorities.entry(seed.path.clone()).or_insert(Priority::Seed);
    }

    let mut spec_defaults = dedup_fields(seeds.into_iter().chain(ranked_defaults));
    if spec_defaults.is_empty() {
        spec_defaults.push(FieldDefinition::new(
            PLACEHOLDER_PATH,
            "No explicit schema fields found in CRD. Replace with a valid spec field.",
        ));
    }

    let metadata = [
        FieldDefinition::new("metadata.name", "Name for this custom resource.")
            .with_value(format!("{}-sample", kind.to_lowercase())),
        FieldDefinition::new("metadata.namespace", "Namespace for this custom resource.")
            .with_value("default"),
    ];
    let mut default_fields = dedup_fields(metadata.into_iter().chain(spec_defaults));
    let mut optional_fields = dedup_fields(ranked_optionals.into_iter().chain([
        FieldDefinition::new("metadata.labels.app", "Optional labels for grouping and selectors."),
        FieldDefinition::new(
            "metadata.annotations.owner",
            "Optional metadata annotation for ownership.",
        ),
    ]));

    for field in &default_fields {
        if field.path.starts_with("metadata.") || field.path == PLACEHOLDER_PATH {
            priorities.insert(field.path.clone(), Priority::Pinned);
        }
    }
    fit_budget(
        &mut default_fields,
        &mut optional_fields,
        &priorities,
        config.max_default_fields,
        config.candidate_limit,
    );

    TemplateDefinition {
        id: normalize_id(&format!("parsed-{kind}")),
        title: format!("{kind} (Parsed)"),
        api_version,
        kind: kind.to_string(),
        note: "Generated from CRD schema. Prioritizing required and high-signal fields for cleaner authoring."
            .to_string(),
        default_fields,
        optional_fields,
    }
}

/// Template inferred from a concrete object rather than a schema.
pub(crate) fn parse_arbitrary_resource(root: &Mapping, config: &ExtractConfig) -> TemplateDefinition {
    let kind = kind_of(root);
    let api_version = Some(text_at(root, &["apiVersion"]))
        .filter(|api_version| !api_version.is_empty())
        .unwrap_or(DEFAULT_API_VERSION);
    let name = Some(text_at(root, &["metadata", "name"]))
        .filter(|name| !name.is_empty())
        .map_or_else(|| format!("{}-sample", kind.to_lowercase()), str::to_string);
    let namespace = Some(text_at(root, &["metadata", "namespace"]))
        .filter(|namespace| !namespace.is_empty())
        .unwrap_or("default");

    let mut fields = vec![
        FieldDefinition::new("metadata.name", "Name for this resource.").with_value(name),
        FieldDefinition::new("metadata.namespace", "Namespace for this resource.")
            .with_value(namespace),
    ];

    if let Some(spec) = lookup(root, &["spec"]).and_then(Value::as_mapping) {
        let mut keys: Vec<&String> = spec
            .keys()
            .filter(|key| FieldPath::is_valid_key(key))
            .collect();
        keys.sort();
        for key in keys {
            if fields.len() >= config.resource_field_limit {
                break;
            }
            let field = FieldDefinition::new(
                spec_path(key).to_string(),
                format!("Inferred from resource spec field '{key}'."),
            );
            let field = match &spec[key.as_str()] {
                Value::String(text) => field.with_value(text.as_str()),
                value @ Value::Bool(_) => field
                    .with_value(format_literal(value))
                    .with_type(FieldType::Boolean),
                value @ (Value::Integer(_) | Value::Float(_)) => field
                    .with_value(format_literal(value))
                    .with_type(FieldType::Number),
                _ => field,
            };
            fields.push(field);
        }
    }

    TemplateDefinition {
        id: normalize_id(&format!("parsed-{kind}")),
        title: format!("{kind} (Parsed)"),
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        note: "Parsed from a Kubernetes object. Fields were inferred from current manifest.".to_string(),
        default_fields: fields,
        optional_fields: Vec::new(),
    }
}
