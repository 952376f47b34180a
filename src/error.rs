//! Error types for loading SML documents

use thiserror::Error;

/// Errors that can occur while loading a document.
///
/// Validation itself never fails; it reports [`crate::Diag`]s instead.
#[derive(Debug, Error)]
pub enum ParseError {
    /// IO error reading file
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// YAML deserialization error
    #[error("invalid SML document '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
