//! Turns CustomResourceDefinition schemas into flat form templates.
//!
//! [`extract_template`] walks the `spec` schema of a CRD, ranks the leaves it
//! finds and splits them into default and optional [`FieldDefinition`]s.
//! Payloads that are plain resources get a template inferred from their
//! values, and anything that does not decode goes through a pattern-based
//! fallback, so extraction of non-blank input always yields a template.

mod config;
mod crd;
mod error;
mod extract;
mod fallback;
mod field;
mod node;
mod rank;
mod seed;
mod validate;

use tracing::{debug, warn};

pub use config::ExtractConfig;
pub use crd::{CRD_KIND, DEFAULT_API_VERSION, DEFAULT_KIND};
pub use error::{ExtractError, StructuredParseError};
pub use extract::MAP_ENTRY_KEY;
pub use fallback::fallback_template;
pub use field::{FALLBACK_TEMPLATE_ID, FieldDefinition, TemplateDefinition, normalize_id};
pub use node::SchemaNode;
pub use seed::{
    ComponentRecognizer, HasProperty, NamedSpec, SeedConfig, build_seed_field,
    extract_service_seeds,
};
pub use validate::{ValidationReport, validate_crd};

/// Extracts a template from `raw` with the default configuration.
pub fn extract_template(raw: &str) -> Result<TemplateDefinition, ExtractError> {
    extract_template_with_config(raw, &ExtractConfig::default())
}

pub fn extract_template_with_config(
    raw: &str,
    config: &ExtractConfig,
) -> Result<TemplateDefinition, ExtractError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    match crd::parse_structured(raw, config) {
        Ok(template) => {
            debug!(
                kind = %template.kind,
                defaults = template.default_fields.len(),
                optionals = template.optional_fields.len(),
                "extracted template"
            );
            Ok(template)
        }
        Err(err) => {
            warn!("structured parse failed, using fallback extractor: {err}");
            Ok(fallback_template(raw, config))
        }
    }
}
