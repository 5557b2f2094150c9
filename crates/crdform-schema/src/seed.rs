//! Representative fields for component-shaped parts of a spec.
//!
//! Operator CRDs often group each managed service under one top-level spec key
//! (`spec.bootstrapper`, `spec.madara`, ...) whose subtree is too large to show
//! flat. A [`ComponentRecognizer`] decides which keys are such components, and
//! each one then gets a single seed field.

use std::fmt;
use std::sync::Arc;

use crdform_document::{FieldPath, Value, format_literal};

use crate::extract::{Candidate, map_entry_field};
use crate::field::{FieldDefinition, dedup_fields, spec_path, top_level_spec_key};
use crate::node::SchemaNode;

const CONFIG_MAPS: &str = "configMaps";
const ENV_FROM_SECRET: &str = "envFromSecret";
const NESTED_SPEC: &str = "spec";

/// Decides whether a top-level spec property describes a component.
pub trait ComponentRecognizer: Send + Sync {
    fn name(&self) -> &str;

    /// `node` is already known to be an object with properties.
    fn recognizes(&self, name: &str, node: SchemaNode<'_>) -> bool;
}

/// Matches nodes that declare the given property.
#[derive(Debug, Clone)]
pub struct HasProperty(pub String);

impl ComponentRecognizer for HasProperty {
    fn name(&self) -> &str {
        &self.0
    }

    fn recognizes(&self, _name: &str, node: SchemaNode<'_>) -> bool {
        node.property(&self.0).is_some()
    }
}

/// Matches nodes with a nested `spec` object whose own name contains one of
/// the keywords, compared case-insensitively.
#[derive(Debug, Clone)]
pub struct NamedSpec {
    pub keywords: Vec<String>,
}

impl ComponentRecognizer for NamedSpec {
    fn name(&self) -> &str {
        "named-spec"
    }

    fn recognizes(&self, name: &str, node: SchemaNode<'_>) -> bool {
        if node.property(NESTED_SPEC).is_none() {
            return false;
        }
        let lower = name.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| lower.contains(&keyword.to_lowercase()))
    }
}

#[derive(Clone)]
pub struct SeedConfig {
    pub recognizers: Vec<Arc<dyn ComponentRecognizer>>,
    /// Keys tried, in order, inside a component's nested `spec`.
    pub preferred_spec_keys: Vec<String>,
    /// How deep the scalar scan of a nested `spec` may go.
    pub scan_depth: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            recognizers: vec![
                Arc::new(HasProperty(CONFIG_MAPS.to_string())),
                Arc::new(HasProperty(ENV_FROM_SECRET.to_string())),
                Arc::new(NamedSpec {
                    keywords: ["madara", "bootstrapper", "orchestrator", "path", "dna", "faucet"]
                        .map(String::from)
                        .to_vec(),
                }),
            ],
            preferred_spec_keys: ["roleArn", "serviceAccountName", "minUnavailable"]
                .map(String::from)
                .to_vec(),
            scan_depth: 2,
        }
    }
}

impl fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.recognizers.iter().map(|r| r.name()).collect();
        f.debug_struct("SeedConfig")
            .field("recognizers", &names)
            .field("preferred_spec_keys", &self.preferred_spec_keys)
            .field("scan_depth", &self.scan_depth)
            .finish()
    }
}

impl SeedConfig {
    pub fn is_component(&self, name: &str, node: SchemaNode<'_>) -> bool {
        let type_name = node.type_name();
        if !(type_name.is_empty() || type_name == "object") || !node.has_properties() {
            return false;
        }
        self.recognizers
            .iter()
            .any(|recognizer| recognizer.recognizes(name, node))
    }
}

/// One seed field per recognized component of `spec_schema`, in key order.
pub fn extract_service_seeds(spec_schema: SchemaNode<'_>, config: &SeedConfig) -> Vec<FieldDefinition> {
    let seeds = spec_schema
        .properties()
        .into_iter()
        .filter(|(name, node)| config.is_component(name, *node))
        .filter_map(|(name, node)| build_seed_field(name, node, config));
    dedup_fields(seeds)
}

/// Picks the single field that stands in for the component `name`.
///
/// Tried in order: an entry of its `configMaps` list, its `envFromSecret`
/// reference, then a key inside its nested `spec`.
pub fn build_seed_field(name: &str, node: SchemaNode<'_>, config: &SeedConfig) -> Option<FieldDefinition> {
    if !FieldPath::is_valid_key(name) || !node.has_properties() {
        return None;
    }
    let description = format!("Service component '{name}'. Expand as needed with optional fields.");
    let prefix = spec_path(name);

    seed_from_config_maps(&prefix, node, &description)
        .or_else(|| seed_from_env_from_secret(&prefix, node, &description))
        .or_else(|| seed_from_nested_spec(&prefix, node, &description, config))
}

fn first_addressable(properties: &[(&str, SchemaNode<'_>)]) -> Option<String> {
    properties
        .iter()
        .map(|(name, _)| *name)
        .find(|name| FieldPath::is_valid_key(name))
        .map(str::to_string)
}

fn seed_from_config_maps(prefix: &FieldPath, node: SchemaNode<'_>, description: &str) -> Option<FieldDefinition> {
    let config_maps = node.property(CONFIG_MAPS).filter(|n| n.is_type("array"))?;
    let items = config_maps.items()?;
    let properties = items.properties();
    let key = ["name", "mountPath"]
        .into_iter()
        .find(|key| items.property(key).is_some())
        .map(str::to_string)
        .or_else(|| first_addressable(&properties))?;
    let path = prefix.child(CONFIG_MAPS).index(0).child(key);
    Some(FieldDefinition::new(path.to_string(), description))
}

fn seed_from_env_from_secret(prefix: &FieldPath, node: SchemaNode<'_>, description: &str) -> Option<FieldDefinition> {
    let secret = node.property(ENV_FROM_SECRET).filter(|n| n.is_type("object"))?;
    let key = if secret.property("name").is_some() {
        "name".to_string()
    } else {
        first_addressable(&secret.properties())?
    };
    let path = prefix.child(ENV_FROM_SECRET).child(key);
    Some(FieldDefinition::new(path.to_string(), description))
}

fn seed_from_nested_spec(
    prefix: &FieldPath,
    node: SchemaNode<'_>,
    description: &str,
    config: &SeedConfig,
) -> Option<FieldDefinition> {
    let spec = node.property(NESTED_SPEC).filter(|n| n.is_type("object"))?;
    let prefix = prefix.child(NESTED_SPEC);

    for key in &config.preferred_spec_keys {
        if let Some(property) = spec.property(key) {
            return Some(
                FieldDefinition::new(prefix.child(key.as_str()).to_string(), description)
                    .with_value(property.default_text().unwrap_or_default())
                    .with_type(property.field_type()),
            );
        }
    }

    first_scalar_seed(&prefix, spec, description, 0, config.scan_depth)
}

/// First leaf found by a sorted depth-first scan of `node`'s properties,
/// no deeper than `max_depth` levels.
fn first_scalar_seed(
    prefix: &FieldPath,
    node: SchemaNode<'_>,
    description: &str,
    depth: usize,
    max_depth: usize,
) -> Option<FieldDefinition> {
    if depth > max_depth {
        return None;
    }

    for (name, child) in node.properties() {
        if !FieldPath::is_valid_key(name) {
            continue;
        }
        let path = prefix.child(name);

        if child.is_type("array") {
            match child.items().filter(|items| items.has_properties()) {
                Some(items) => {
                    let seed = first_scalar_seed(&path.index(0), items, description, depth + 1, max_depth);
                    if seed.is_some() {
                        return seed;
                    }
                    continue;
                }
                None => {
                    return Some(FieldDefinition::new(path.index(0).to_string(), description));
                }
            }
        }

        if child.has_properties() {
            if let Some(seed) = first_scalar_seed(&path, child, description, depth + 1, max_depth) {
                return Some(seed);
            }
            continue;
        }

        if child.is_type("object")
            || (child.type_name().is_empty() && child.declares_additional_properties())
        {
            if let Some(seed) = map_entry_field(&path, child, description) {
                return Some(seed);
            }
            if child.preserves_unknown_fields() {
                continue;
            }
        }

        return Some(
            FieldDefinition::new(path.to_string(), description)
                .with_value(child.default_text().unwrap_or_default())
                .with_type(child.field_type()),
        );
    }

    None
}

/// Appends a field for every top-level spec key that no default covers yet.
///
/// The best ranked candidate under the key is used when one exists, then a
/// component seed, then a field read straight off the key's schema. Only keys
/// that cannot be addressed stay uncovered.
pub(crate) fn ensure_top_level_coverage(
    spec_schema: SchemaNode<'_>,
    mut defaults: Vec<FieldDefinition>,
    ranked: &[Candidate],
    config: &SeedConfig,
) -> Vec<FieldDefinition> {
    let properties = spec_schema.properties();
    if properties.is_empty() {
        return defaults;
    }

    let covered: std::collections::HashSet<String> = defaults
        .iter()
        .filter_map(|field| top_level_spec_key(&field.path))
        .map(str::to_string)
        .collect();

    for (name, node) in properties {
        if covered.contains(name) {
            continue;
        }
        let best = ranked
            .iter()
            .find(|candidate| top_level_spec_key(&candidate.field.path) == Some(name))
            .map(|candidate| candidate.field.clone());
        if let Some(field) = best
            .or_else(|| build_seed_field(name, node, config))
            .or_else(|| coverage_field(name, node, config))
        {
            defaults.push(field);
        }
    }

    dedup_fields(defaults)
}

/// A field for a top-level key that neither the walk nor the seeds reached,
/// shaped the way the walk would have shaped it.
fn coverage_field(name: &str, node: SchemaNode<'_>, config: &SeedConfig) -> Option<FieldDefinition> {
    if !FieldPath::is_valid_key(name) {
        return None;
    }
    let description = node
        .description()
        .map(str::to_string)
        .unwrap_or_else(|| format!("Inferred from CRD schema field '{name}'."));
    let path = spec_path(name);

    if node.preserves_unknown_fields() {
        return Some(typed_leaf(&path, node, &description));
    }

    if node.is_type("array") {
        let element = path.index(0);
        let items = node.items();
        if let Some(items) = items.filter(|items| items.has_properties() && !items.preserves_unknown_fields())
            && let Some(seed) = first_scalar_seed(&element, items, &description, 0, config.scan_depth)
        {
            return Some(seed);
        }
        let value = match node.default_value() {
            Some(Value::Sequence(values)) => values.first().map(format_literal),
            Some(other) => Some(format_literal(other)),
            None => items.and_then(|items| items.default_text()),
        };
        return Some(
            FieldDefinition::new(element.to_string(), description)
                .with_value(value.unwrap_or_default())
                .with_type(items.map(|items| items.field_type()).unwrap_or_default()),
        );
    }

    if node.has_properties()
        && let Some(seed) = first_scalar_seed(&path, node, &description, 0, config.scan_depth)
    {
        return Some(seed);
    }

    map_entry_field(&path, node, &description).or_else(|| Some(typed_leaf(&path, node, &description)))
}

fn typed_leaf(path: &FieldPath, node: SchemaNode<'_>, description: &str) -> FieldDefinition {
    FieldDefinition::new(path.to_string(), description)
        .with_value(node.default_text().unwrap_or_default())
        .with_type(node.field_type())
}
