//! Template and manifest-history stores.
//!
//! Both are traits so a persistent backend can replace the in-memory
//! implementations shipped here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use crdform_schema::TemplateDefinition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::builtin_templates;

/// Most records kept by [`MemoryManifestHistory`].
pub const HISTORY_CAPACITY: usize = 200;
/// Page size used when a requested limit is out of range.
pub const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("template id is required")]
    MissingTemplateId,
    #[error("yaml is required")]
    MissingYaml,
}

pub trait TemplateStore: Send + Sync {
    fn get(&self, id: &str) -> Option<TemplateDefinition>;
    /// Inserts or replaces the template with the same id.
    fn upsert(&self, template: TemplateDefinition) -> Result<(), StoreError>;
    fn list(&self) -> Vec<TemplateDefinition>;
}

#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: RwLock<IndexMap<String, TemplateDefinition>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_templates() -> Self {
        let templates = builtin_templates()
            .into_iter()
            .map(|template| (template.id.clone(), template))
            .collect();
        Self {
            templates: RwLock::new(templates),
        }
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn get(&self, id: &str) -> Option<TemplateDefinition> {
        let templates = self.templates.read().unwrap_or_else(PoisonError::into_inner);
        templates.get(id).cloned()
    }

    fn upsert(&self, template: TemplateDefinition) -> Result<(), StoreError> {
        if template.id.trim().is_empty() {
            return Err(StoreError::MissingTemplateId);
        }
        let mut templates = self.templates.write().unwrap_or_else(PoisonError::into_inner);
        templates.insert(template.id.clone(), template);
        Ok(())
    }

    fn list(&self) -> Vec<TemplateDefinition> {
        let templates = self.templates.read().unwrap_or_else(PoisonError::into_inner);
        templates.values().cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveManifest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub yaml: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestRecord {
    pub id: String,
    pub title: String,
    pub resource: String,
    pub api_version: String,
    pub kind: String,
    pub yaml: String,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl ManifestRecord {
    fn matches(&self, lower_query: &str) -> bool {
        [
            &self.title,
            &self.resource,
            &self.kind,
            &self.api_version,
            &self.yaml,
        ]
        .iter()
        .any(|text| text.to_lowercase().contains(lower_query))
    }
}

pub trait ManifestHistory: Send + Sync {
    fn save(&self, request: SaveManifest) -> Result<ManifestRecord, StoreError>;
    /// Newest records first, filtered by a case-insensitive substring query.
    fn list(&self, query: &str, limit: usize) -> Vec<ManifestRecord>;
}

#[derive(Debug, Default)]
pub struct MemoryManifestHistory {
    records: RwLock<Vec<ManifestRecord>>,
    next_id: AtomicU64,
}

impl MemoryManifestHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ManifestHistory for MemoryManifestHistory {
    fn save(&self, request: SaveManifest) -> Result<ManifestRecord, StoreError> {
        if request.yaml.trim().is_empty() {
            return Err(StoreError::MissingYaml);
        }

        let title = request.title.trim();
        let now = SystemTime::now();
        let record = ManifestRecord {
            id: format!("{:016x}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1),
            title: if title.is_empty() { "Manifest" } else { title }.to_string(),
            resource: request.resource.trim().to_string(),
            api_version: request.api_version.trim().to_string(),
            kind: request.kind.trim().to_string(),
            yaml: request.yaml,
            created_at: now,
            updated_at: now,
        };

        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records.insert(0, record.clone());
        records.truncate(HISTORY_CAPACITY);
        Ok(record)
    }

    fn list(&self, query: &str, limit: usize) -> Vec<ManifestRecord> {
        let limit = if (1..=HISTORY_CAPACITY).contains(&limit) {
            limit
        } else {
            DEFAULT_LIST_LIMIT
        };
        let query = query.trim().to_lowercase();

        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records
            .iter()
            .filter(|record| query.is_empty() || record.matches(&query))
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(title: &str, kind: &str, yaml: &str) -> SaveManifest {
        SaveManifest {
            title: title.to_string(),
            kind: kind.to_string(),
            yaml: yaml.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn builtin_store_lists_catalog_in_order() {
        let store = MemoryTemplateStore::with_builtin_templates();
        let ids: Vec<_> = store.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, ["deployment", "statefulset", "pvc", "volumesnapshot", "cronjob"]);
        assert_eq!(store.get("pvc").unwrap().kind, "PersistentVolumeClaim");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn upsert_replaces_in_place() {
        let store = MemoryTemplateStore::with_builtin_templates();
        let mut pvc = store.get("pvc").unwrap();
        pvc.title = "Volume claim".to_string();
        store.upsert(pvc).unwrap();

        let templates = store.list();
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[2].title, "Volume claim");

        let blank = TemplateDefinition::default();
        assert_eq!(store.upsert(blank), Err(StoreError::MissingTemplateId));
    }

    #[test]
    fn save_normalizes_and_rejects_blank_yaml() {
        let history = MemoryManifestHistory::new();
        assert_eq!(
            history.save(manifest("x", "Deployment", "  \n")),
            Err(StoreError::MissingYaml)
        );

        let record = history
            .save(SaveManifest {
                title: "   ".to_string(),
                kind: " Deployment ".to_string(),
                yaml: "kind: Deployment\n".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(record.title, "Manifest");
        assert_eq!(record.kind, "Deployment");
        assert_eq!(record.created_at, record.updated_at);
        assert!(!record.id.is_empty());
    }

    #[test]
    fn list_is_newest_first_and_filtered() {
        let history = MemoryManifestHistory::new();
        history.save(manifest("web", "Deployment", "a: 1\n")).unwrap();
        history.save(manifest("db", "StatefulSet", "b: 2\n")).unwrap();
        history.save(manifest("cache", "Deployment", "c: 3\n")).unwrap();

        let titles: Vec<_> = history.list("", 0).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, ["cache", "db", "web"]);

        let titles: Vec<_> = history
            .list(" deployment ", 10)
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, ["cache", "web"]);

        assert_eq!(history.list("", 1).len(), 1);
        assert!(history.list("nothing", 10).is_empty());
    }

    #[test]
    fn history_is_capped() {
        let history = MemoryManifestHistory::new();
        for i in 0..(HISTORY_CAPACITY + 5) {
            history
                .save(manifest(&format!("m{i}"), "ConfigMap", "data: {}\n"))
                .unwrap();
        }
        let all = history.list("", HISTORY_CAPACITY);
        assert_eq!(all.len(), HISTORY_CAPACITY);
        assert_eq!(all[0].title, format!("m{}", HISTORY_CAPACITY + 4));
        assert_eq!(history.list("", 500).len(), DEFAULT_LIST_LIMIT);
    }
}
