//! Error types for choice sources and the picker controller.

use std::path::PathBuf;

/// Result type alias for choice source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for picker operations.
pub type PickerResult<T> = std::result::Result<T, PickerError>;

/// Errors produced while fetching candidates from a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The remote endpoint answered with a non-success status.
    #[error("Problem retrieving choices - {status} error")]
    Status { status: u16 },

    /// The request could not be sent or the body could not be read.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SourceError {
    /// Returns the HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::Json(_) => None,
        }
    }
}

/// Errors raised by picker configuration and result handling.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    /// No external model binding was configured.
    #[error("The picker requires a model binding")]
    MissingModel,

    /// The picker refused an operation because it is misconfigured.
    #[error("Picker is disabled: {0}")]
    Disabled(String),

    /// A results path segment was not present in the response.
    #[error("Results path segment '{segment}' not found in response")]
    ResultsPathNotFound { segment: String },

    /// The value reached by the results path is not an array.
    #[error("Expected an array of results, found {found}")]
    NotAnArray { found: &'static str },

    /// Failed to read a configuration file.
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A TOML configuration file could not be parsed.
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A JSON configuration file could not be parsed.
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// The choice source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl PickerError {
    /// Creates a new `ResultsPathNotFound` error.
    pub fn path_not_found(segment: impl Into<String>) -> Self {
        Self::ResultsPathNotFound {
            segment: segment.into(),
        }
    }

    /// Creates a new `ReadConfig` error.
    pub fn read_config(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadConfig {
            path: path.into(),
            source,
        }
    }
}
