use crdform_document::Value;
use serde::{Deserialize, Serialize};

use crate::crd::{CRD_KIND, decode_resources, has_crd_schema, lookup, select_primary_resource, text_at};
use crate::error::StructuredParseError;

/// Outcome of a light structural check of a CRD payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
}

/// Checks that `raw` carries the top-level fields a CRD needs.
///
/// Problems are reported in the returned value, never as an error.
pub fn validate_crd(raw: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    let raw = raw.trim();
    if raw.is_empty() {
        report.errors.push("CRD payload is empty.".to_string());
        return report;
    }

    let documents = match decode_resources(raw) {
        Ok(documents) => documents,
        Err(StructuredParseError::Yaml(err)) => {
            report.errors.push(format!("YAML parse error: {err}"));
            return report;
        }
        Err(_) => {
            report
                .errors
                .push("YAML payload has no valid resource documents.".to_string());
            return report;
        }
    };
    let Some(root) = select_primary_resource(&documents) else {
        report
            .errors
            .push("YAML payload has no valid resource documents.".to_string());
        return report;
    };

    report.kind = text_at(root, &["kind"]).to_string();
    report.api_version = text_at(root, &["apiVersion"]).to_string();
    if report.kind.is_empty() {
        report
            .errors
            .push("Missing required top-level field: kind".to_string());
    }
    if report.api_version.is_empty() {
        report
            .errors
            .push("Missing required top-level field: apiVersion".to_string());
    }

    if report.kind.eq_ignore_ascii_case(CRD_KIND) {
        match lookup(root, &["spec"]).and_then(Value::as_mapping) {
            None => report
                .errors
                .push("Missing required object: spec".to_string()),
            Some(spec) => {
                if text_at(spec, &["group"]).is_empty() {
                    report
                        .errors
                        .push("Missing required CRD field: spec.group".to_string());
                }
                if text_at(spec, &["names", "kind"]).is_empty() {
                    report
                        .errors
                        .push("Missing required CRD field: spec.names.kind".to_string());
                }

                let versions = spec
                    .get("versions")
                    .and_then(Value::as_sequence)
                    .unwrap_or_default();
                if text_at(spec, &["version"]).is_empty() && versions.is_empty() {
                    report.errors.push(
                        "Missing required CRD version field: spec.version or spec.versions"
                            .to_string(),
                    );
                }
                for (index, version) in versions.iter().enumerate() {
                    let named = version
                        .as_mapping()
                        .is_some_and(|version| !text_at(version, &["name"]).is_empty());
                    if !named {
                        report
                            .errors
                            .push(format!("Invalid spec.versions[{index}]: missing name"));
                    }
                }

                if !has_crd_schema(root) {
                    report.warnings.push(
                        "CRD schema not found. Add openAPIV3Schema for richer field guidance."
                            .to_string(),
                    );
                }
            }
        }
    } else if !report.kind.is_empty() {
        report.warnings.push(
            "Input kind is not CustomResourceDefinition. It will still be accepted.".to_string(),
        );
    }

    report.valid = report.errors.is_empty();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_crd_is_valid() {
        let report = validate_crd(
            r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
spec:
  group: example.io
  names: {kind: Widget}
  versions:
    - name: v1
      schema:
        openAPIV3Schema: {type: object}
"#,
        );
        assert!(report.valid, "{report:?}");
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.kind, "CustomResourceDefinition");
        assert_eq!(report.api_version, "apiextensions.k8s.io/v1");
    }

    #[test]
    fn empty_payload() {
        let report = validate_crd("  \n ");
        assert!(!report.valid);
        assert_eq!(report.errors, ["CRD payload is empty."]);
    }

    #[test]
    fn yaml_errors_are_reported() {
        let report = validate_crd("kind: [unclosed");
        assert!(!report.valid);
        assert!(report.errors[0].starts_with("YAML parse error: "));
    }

    #[test]
    fn crd_structure_problems() {
        let report = validate_crd(
            r#"
kind: CustomResourceDefinition
spec:
  names: {}
  versions:
    - served: true
    - name: v1
"#,
        );
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            [
                "Missing required top-level field: apiVersion",
                "Missing required CRD field: spec.group",
                "Missing required CRD field: spec.names.kind",
                "Invalid spec.versions[0]: missing name",
            ]
        );
        assert_eq!(
            report.warnings,
            ["CRD schema not found. Add openAPIV3Schema for richer field guidance."]
        );
    }

    #[test]
    fn missing_spec_and_versions() {
        let report = validate_crd("apiVersion: v1\nkind: CustomResourceDefinition\n");
        assert_eq!(report.errors, ["Missing required object: spec"]);

        let report = validate_crd(
            "apiVersion: v1\nkind: CustomResourceDefinition\nspec:\n  group: a.io\n  names: {kind: A}\n",
        );
        assert_eq!(
            report.errors,
            ["Missing required CRD version field: spec.version or spec.versions"]
        );
    }

    #[test]
    fn other_kinds_only_warn() {
        let report = validate_crd("apiVersion: v1\nkind: ConfigMap\n");
        assert!(report.valid);
        assert_eq!(
            report.warnings,
            ["Input kind is not CustomResourceDefinition. It will still be accepted."]
        );
    }

    #[test]
    fn report_serializes_camel_case() {
        let report = validate_crd("apiVersion: v1\nkind: ConfigMap\n");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["apiVersion"], "v1");
        assert_eq!(json["valid"], true);

        let report = validate_crd("");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("kind").is_none());
    }
}
