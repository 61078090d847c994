//! Error types for the LDT processor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("URI template error: {0}")]
    UriTemplate(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Failed to load ontology: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    RegexError(String),
}

impl ProcessorError {
    /// Configuration errors are fatal; they are never fixed by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProcessorError::Configuration(_) | ProcessorError::UriTemplate(_))
    }
}

impl From<regex::Error> for ProcessorError {
    fn from(err: regex::Error) -> Self {
        ProcessorError::RegexError(err.to_string())
    }
}

impl From<oxigraph::model::IriParseError> for ProcessorError {
    fn from(err: oxigraph::model::IriParseError) -> Self {
        ProcessorError::InvalidIri(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
