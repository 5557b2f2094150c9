use crate::seed::SeedConfig;

/// Bounds and heuristics used by template extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Deepest object nesting the schema walk descends into. Arrays of
    /// objects do not count as a level.
    pub max_depth: usize,
    /// Upper bound on collected candidates, and on the total number of
    /// fields in a template.
    pub candidate_limit: usize,
    pub max_default_fields: usize,
    /// Number of `spec.*` keys the pattern fallback recovers.
    pub fallback_field_limit: usize,
    /// Number of default fields inferred from a plain (non-CRD) resource.
    pub resource_field_limit: usize,
    pub seeds: SeedConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            candidate_limit: 420,
            max_default_fields: 64,
            fallback_field_limit: 8,
            resource_field_limit: 10,
            seeds: SeedConfig::default(),
        }
    }
}
