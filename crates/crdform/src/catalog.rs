//! Built-in templates for common workload and storage kinds.

use crdform_document::FieldType;
use crdform_schema::{FieldDefinition, TemplateDefinition};

fn field(path: &str, value: &str, description: &str) -> FieldDefinition {
    FieldDefinition::new(path, description).with_value(value)
}

fn number(path: &str, value: &str, description: &str) -> FieldDefinition {
    field(path, value, description).with_type(FieldType::Number)
}

fn optional(path: &str, description: &str) -> FieldDefinition {
    FieldDefinition::new(path, description)
}

fn template(
    id: &str,
    title: &str,
    api_version: &str,
    kind: &str,
    note: &str,
    default_fields: Vec<FieldDefinition>,
    optional_fields: Vec<FieldDefinition>,
) -> TemplateDefinition {
    TemplateDefinition {
        id: id.to_string(),
        title: title.to_string(),
        api_version: api_version.to_string(),
        kind: kind.to_string(),
        note: note.to_string(),
        default_fields,
        optional_fields,
    }
}

/// Templates every store starts with, in display order.
pub fn builtin_templates() -> Vec<TemplateDefinition> {
    vec![
        template(
            "deployment",
            "Deployment",
            "apps/v1",
            "Deployment",
            "Progressive delivery for stateless workloads with rollout controls.",
            vec![
                field("metadata.name", "web-app", "Unique deployment name."),
                field("metadata.namespace", "default", "Target namespace."),
                number("spec.replicas", "3", "Desired replica count."),
                field("spec.selector.matchLabels.app", "web-app", "Pod label selector."),
                field("spec.template.spec.containers[0].name", "app", "Container name."),
                field(
                    "spec.template.spec.containers[0].image",
                    "nginx:1.27",
                    "Container image.",
                ),
            ],
            vec![
                optional("spec.strategy.type", "Deployment strategy type."),
                number(
                    "spec.template.spec.containers[0].ports[0].containerPort",
                    "",
                    "Exposed container port.",
                ),
                optional("spec.template.spec.imagePullSecrets[0].name", "Image pull secret."),
            ],
        ),
        template(
            "statefulset",
            "StatefulSet",
            "apps/v1",
            "StatefulSet",
            "Stable identity and storage for stateful workloads.",
            vec![
                field("metadata.name", "db", "StatefulSet name."),
                field("metadata.namespace", "default", "Target namespace."),
                field("spec.serviceName", "db-headless", "Headless service name."),
                number("spec.replicas", "2", "Replica count."),
                field("spec.template.spec.containers[0].name", "postgres", "Container name."),
                field(
                    "spec.template.spec.containers[0].image",
                    "postgres:17",
                    "Container image.",
                ),
            ],
            vec![
                optional("spec.volumeClaimTemplates[0].metadata.name", "PVC template name."),
                optional(
                    "spec.volumeClaimTemplates[0].spec.resources.requests.storage",
                    "Per-pod requested storage.",
                ),
                optional(
                    "spec.persistentVolumeClaimRetentionPolicy.whenDeleted",
                    "PVC retention policy.",
                ),
            ],
        ),
        template(
            "pvc",
            "PVC",
            "v1",
            "PersistentVolumeClaim",
            "Declarative persistent storage request with class and size.",
            vec![
                field("metadata.name", "app-data", "PVC name."),
                field("metadata.namespace", "default", "Target namespace."),
                field("spec.accessModes[0]", "ReadWriteOnce", "Access mode."),
                field("spec.storageClassName", "standard", "StorageClass name."),
                field("spec.resources.requests.storage", "20Gi", "Requested size."),
            ],
            vec![
                optional("spec.volumeMode", "Filesystem or Block mode."),
                optional("spec.dataSource.name", "Snapshot/PVC data source."),
                optional("spec.selector.matchLabels.tier", "PV selector label."),
            ],
        ),
        template(
            "volumesnapshot",
            "VolumeSnapshot",
            "snapshot.storage.k8s.io/v1",
            "VolumeSnapshot",
            "Point-in-time snapshots for backup and restore.",
            vec![
                field("metadata.name", "db-snapshot-001", "Snapshot name."),
                field("metadata.namespace", "default", "Target namespace."),
                field(
                    "spec.volumeSnapshotClassName",
                    "csi-hostpath-snapclass",
                    "Snapshot class.",
                ),
                field("spec.source.persistentVolumeClaimName", "db-data", "Source PVC."),
            ],
            vec![
                optional("metadata.labels.backup", "Backup retention label."),
                optional("metadata.annotations.purpose", "Snapshot purpose annotation."),
                optional(
                    "spec.source.volumeSnapshotContentName",
                    "Pre-provisioned snapshot content.",
                ),
            ],
        ),
        template(
            "cronjob",
            "CronJob",
            "batch/v1",
            "CronJob",
            "Scheduled Kubernetes jobs with retry controls.",
            vec![
                field("metadata.name", "nightly-report", "CronJob name."),
                field("metadata.namespace", "default", "Target namespace."),
                field("spec.schedule", "0 2 * * *", "Cron schedule expression."),
                field(
                    "spec.jobTemplate.spec.template.spec.containers[0].name",
                    "runner",
                    "Container name.",
                ),
                field(
                    "spec.jobTemplate.spec.template.spec.containers[0].image",
                    "alpine:3.21",
                    "Container image.",
                ),
                field(
                    "spec.jobTemplate.spec.template.spec.restartPolicy",
                    "OnFailure",
                    "Restart behavior.",
                ),
            ],
            vec![
                optional("spec.concurrencyPolicy", "Concurrency handling."),
                number("spec.successfulJobsHistoryLimit", "", "Successful job history length."),
                number("spec.failedJobsHistoryLimit", "", "Failed job history length."),
            ],
        ),
    ]
}
