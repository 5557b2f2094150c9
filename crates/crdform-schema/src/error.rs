use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("CRD payload is empty")]
    EmptyInput,
}

/// Why the structured parse of a payload was abandoned in favour of the
/// pattern-based fallback.
#[derive(Debug, Error)]
pub enum StructuredParseError {
    #[error(transparent)]
    Yaml(#[from] crdform_yaml::Error),
    #[error("no resource document found")]
    NoResource,
    #[error("resource document has no kind")]
    MissingKind,
}
