use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("YAML parsing error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    #[error("Conversion error: {0}")]
    ConversionError(String),

    #[error("Input contains no YAML documents")]
    NoDocuments,
}
