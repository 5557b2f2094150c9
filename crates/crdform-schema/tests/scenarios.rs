use std::collections::HashSet;

use crdform_document::{FieldPath, FieldType};
use crdform_schema::{
    DEFAULT_API_VERSION, ExtractConfig, ExtractError, TemplateDefinition, extract_template,
    extract_template_with_config,
};

fn wrap_spec_schema(kind: &str, group: Option<&str>, spec_schema: &str) -> String {
    let indented: String = spec_schema
        .lines()
        .map(|line| format!("              {line}\n"))
        .collect();
    let group = group.map(|g| format!("  group: {g}\n")).unwrap_or_default();
    format!(
        "apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: sample
spec:
{group}  names:
    kind: {kind}
  versions:
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
{indented}"
    )
}

fn default_paths(template: &TemplateDefinition) -> Vec<&str> {
    template
        .default_fields
        .iter()
        .map(|field| field.path.as_str())
        .collect()
}

fn assert_well_formed(template: &TemplateDefinition, config: &ExtractConfig) {
    assert!(template.default_fields.len() <= config.max_default_fields);
    assert!(template.default_fields.len() + template.optional_fields.len() <= config.candidate_limit);
    let mut seen = HashSet::new();
    for field in template.fields() {
        assert!(seen.insert(field.path.as_str()), "duplicate path {}", field.path);
        assert!(
            field.path.parse::<FieldPath>().is_ok(),
            "unparsable path {}",
            field.path
        );
    }
}

fn covered_top_level_keys(template: &TemplateDefinition) -> HashSet<String> {
    template
        .default_fields
        .iter()
        .filter_map(|field| field.top_level_spec_key())
        .map(str::to_string)
        .collect()
}

#[test]
fn plain_spec_fields_become_defaults() {
    let raw = wrap_spec_schema(
        "Widget",
        None,
        "type: object
properties:
  size:
    type: string
  replicas:
    type: integer
  settings:
    type: object
    properties:
      region:
        type: string",
    );
    let template = extract_template(&raw).unwrap();

    assert_eq!(template.api_version, DEFAULT_API_VERSION);
    assert_eq!(template.kind, "Widget");
    assert_eq!(template.id, "parsed-widget");
    assert_eq!(
        default_paths(&template),
        [
            "metadata.name",
            "metadata.namespace",
            "spec.replicas",
            "spec.size",
            "spec.settings.region",
        ]
    );
    let replicas = &template.default_fields[2];
    assert_eq!(replicas.field_type, FieldType::Number);
    assert_eq!(template.default_fields[0].value, "widget-sample");
    let optional: Vec<_> = template.optional_fields.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(optional, ["metadata.labels.app", "metadata.annotations.owner"]);
    assert_well_formed(&template, &ExtractConfig::default());
}

#[test]
fn required_references_are_defaults_and_opaque_subtrees_stay_closed() {
    let raw = wrap_spec_schema(
        "MadaraNode",
        Some("infra.example.io"),
        "type: object
required: [instanceRef, versionRef]
properties:
  instanceRef:
    type: object
    required: [name]
    properties:
      name: {type: string}
      namespace: {type: string}
  versionRef:
    type: object
    required: [name]
    properties:
      name: {type: string}
  extras:
    type: object
    properties:
      tuning:
        type: object
        properties:
          raw:
            type: object
            x-kubernetes-preserve-unknown-fields: true
            properties:
              secret: {type: string}
          level: {type: integer, default: 3}
  bootstrapper:
    type: object
    x-kubernetes-preserve-unknown-fields: true",
    );
    let template = extract_template(&raw).unwrap();

    assert_eq!(template.api_version, "infra.example.io/v1");
    let defaults = default_paths(&template);
    assert!(defaults.contains(&"spec.instanceRef.name"));
    assert!(defaults.contains(&"spec.versionRef.name"));
    assert!(defaults.contains(&"spec.extras.tuning.level"));
    assert!(template.fields().all(|field| !field.path.contains(".raw")));
    let bootstrapper: Vec<_> = template
        .fields()
        .filter(|field| field.path.starts_with("spec.bootstrapper"))
        .map(|field| field.path.as_str())
        .collect();
    assert_eq!(bootstrapper, ["spec.bootstrapper"]);
    assert!(defaults.contains(&"spec.bootstrapper"));

    let required_position = defaults
        .iter()
        .position(|path| *path == "spec.instanceRef.name")
        .unwrap();
    let optional_position = defaults
        .iter()
        .position(|path| *path == "spec.instanceRef.namespace")
        .unwrap();
    assert!(required_position < optional_position);
    assert_well_formed(&template, &ExtractConfig::default());
}

#[test]
fn component_seeds_lead_the_spec_defaults() {
    let raw = wrap_spec_schema(
        "Deployment",
        Some("ops.example.io"),
        "type: object
properties:
  bootstrapper:
    type: object
    properties:
      configMaps:
        type: array
        items:
          type: object
          properties:
            mountPath: {type: string}
      image: {type: string}
  dna:
    type: object
    properties:
      spec:
        type: object
        properties:
          serviceAccountName: {type: string}
          image: {type: string}
  madara:
    type: object
    properties:
      envFromSecret:
        type: object
        properties:
          name: {type: string}
  madaraOrchestrator:
    type: object
    properties:
      spec:
        type: object
        properties:
          roleArn: {type: string}
          serviceAccountName: {type: string}
  madaraFullNode:
    type: object
    properties:
      configMaps:
        type: array
        items:
          type: object
          properties:
            mountPath: {type: string}
            name: {type: string}",
    );
    let template = extract_template(&raw).unwrap();
    let defaults = default_paths(&template);

    assert_eq!(
        &defaults[..7],
        [
            "metadata.name",
            "metadata.namespace",
            "spec.bootstrapper.configMaps[0].mountPath",
            "spec.dna.spec.serviceAccountName",
            "spec.madara.envFromSecret.name",
            "spec.madaraFullNode.configMaps[0].name",
            "spec.madaraOrchestrator.spec.roleArn",
        ]
    );
    let seed = &template.default_fields[2];
    assert_eq!(
        seed.description,
        "Service component 'bootstrapper'. Expand as needed with optional fields."
    );

    let keys = covered_top_level_keys(&template);
    for key in ["bootstrapper", "dna", "madara", "madaraOrchestrator", "madaraFullNode"] {
        assert!(keys.contains(key), "{key} not covered");
    }
    assert_well_formed(&template, &ExtractConfig::default());
}

fn wide_schema(keys: usize, leaves: usize, required: &[(usize, usize)]) -> String {
    let mut schema = String::from("type: object\nproperties:\n");
    for key in 0..keys {
        schema.push_str(&format!("  c{key:02}:\n    type: object\n"));
        let required_leaves: Vec<String> = required
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, leaf)| format!("f{leaf}"))
            .collect();
        if !required_leaves.is_empty() {
            schema.push_str(&format!("    required: [{}]\n", required_leaves.join(", ")));
        }
        schema.push_str("    properties:\n");
        for leaf in 0..leaves {
            schema.push_str(&format!("      f{leaf}: {{type: string}}\n"));
        }
    }
    schema
}

#[test]
fn every_top_level_key_is_covered_within_the_budget() {
    let raw = wrap_spec_schema("Grid", Some("grid.example.io"), &wide_schema(20, 5, &[]));
    let config = ExtractConfig::default();
    let template = extract_template_with_config(&raw, &config).unwrap();

    assert_eq!(template.default_fields.len(), config.max_default_fields);
    let keys = covered_top_level_keys(&template);
    for key in 0..20 {
        assert!(keys.contains(&format!("c{key:02}")), "c{key:02} not covered");
    }
    assert_eq!(
        template.default_fields.len() + template.optional_fields.len(),
        100 + 2 + 2
    );
    assert_well_formed(&template, &config);
}

#[test]
fn keys_past_the_candidate_limit_are_still_covered() {
    let mut schema = String::from("type: object\nproperties:\n  aaa:\n    type: object\n    properties:\n");
    for leaf in 0..500 {
        schema.push_str(&format!("      f{leaf:03}: {{type: string}}\n"));
    }
    schema.push_str("  zzz: {type: string, description: Trailing key}\n");
    let raw = wrap_spec_schema("Tall", Some("tall.example.io"), &schema);
    let config = ExtractConfig::default();
    let template = extract_template_with_config(&raw, &config).unwrap();

    let zzz = template
        .default_fields
        .iter()
        .find(|field| field.path == "spec.zzz")
        .expect("spec.zzz is a default");
    assert_eq!(zzz.description, "Trailing key");
    let keys = covered_top_level_keys(&template);
    assert!(keys.contains("aaa"));
    assert!(keys.contains("zzz"));
    assert!(template.default_fields.len() <= config.max_default_fields);
    assert!(template.default_fields.len() + template.optional_fields.len() <= config.candidate_limit);
    assert_well_formed(&template, &config);
}

#[test]
fn oversized_schemas_stay_within_limits() {
    let raw = wrap_spec_schema("Huge", Some("huge.example.io"), &wide_schema(100, 10, &[(5, 9)]));
    let config = ExtractConfig::default();
    let template = extract_template_with_config(&raw, &config).unwrap();

    assert_eq!(template.default_fields.len(), config.max_default_fields);
    assert_eq!(
        template.default_fields.len() + template.optional_fields.len(),
        config.candidate_limit
    );
    assert!(default_paths(&template).contains(&"spec.c05.f9"));
    assert_eq!(template.default_fields[0].path, "metadata.name");
    assert_well_formed(&template, &config);
}

#[test]
fn tighter_configuration_is_honoured() {
    let raw = wrap_spec_schema("Grid", Some("grid.example.io"), &wide_schema(6, 6, &[]));
    let config = ExtractConfig {
        max_default_fields: 10,
        candidate_limit: 20,
        ..ExtractConfig::default()
    };
    let template = extract_template_with_config(&raw, &config).unwrap();
    assert_eq!(template.default_fields.len(), 10);
    assert_eq!(template.default_fields.len() + template.optional_fields.len(), 20);
    assert_well_formed(&template, &config);
}

#[test]
fn extraction_is_deterministic() {
    let raw = wrap_spec_schema("Grid", Some("grid.example.io"), &wide_schema(30, 4, &[(3, 1)]));
    let first = extract_template(&raw).unwrap();
    let second = extract_template(&raw).unwrap();
    assert_eq!(first, second);
}

#[test]
fn crd_inside_list_document() {
    let raw = r#"
apiVersion: v1
kind: List
items:
  - apiVersion: apiextensions.k8s.io/v1
    kind: CustomResourceDefinition
    spec:
      group: batch.example.io
      names: {kind: Job}
      versions:
        - name: v2
          served: true
          schema:
            openAPIV3Schema:
              properties:
                spec:
                  properties:
                    parallelism: {type: integer, default: 1}
"#;
    let template = extract_template(raw).unwrap();
    assert_eq!(template.kind, "Job");
    assert_eq!(template.api_version, "batch.example.io/v2");
    let parallelism = template
        .default_fields
        .iter()
        .find(|field| field.path == "spec.parallelism")
        .unwrap();
    assert_eq!(parallelism.value, "1");
    assert_eq!(parallelism.field_type, FieldType::Number);
}

#[test]
fn plain_resources_are_inferred_from_values() {
    let raw = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
spec:
  replicas: 3
  revisionHistoryLimit: 5
"#;
    let template = extract_template(raw).unwrap();
    assert_eq!(template.kind, "Deployment");
    assert_eq!(template.api_version, "apps/v1");
    assert_eq!(
        default_paths(&template),
        [
            "metadata.name",
            "metadata.namespace",
            "spec.replicas",
            "spec.revisionHistoryLimit",
        ]
    );
    assert_eq!(template.default_fields[1].value, "prod");
    assert!(template.optional_fields.is_empty());
}

#[test]
fn undecodable_input_uses_fallback() {
    let raw = "apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
spec:
  group: queue.example.io
  version: v3
  names:
    kind: Queue
  validation: [
";
    let template = extract_template(raw).unwrap();
    assert_eq!(template.kind, "Queue");
    assert_eq!(template.api_version, "queue.example.io/v3");
    assert!(template.note.contains("fallback"));
    assert_eq!(default_paths(&template)[2], "spec.example");
}

#[test]
fn kindless_documents_use_fallback() {
    let template = extract_template("foo: bar\n").unwrap();
    assert_eq!(template.kind, "CustomResource");
    assert_eq!(template.id, "parsed-customresource");
}

#[test]
fn blank_input_is_rejected() {
    assert!(matches!(extract_template(" \n\t"), Err(ExtractError::EmptyInput)));
}
