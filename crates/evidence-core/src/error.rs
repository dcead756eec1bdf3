use thiserror::Error;

/// Failures that abort a whole merge or packaging run.
///
/// Problems with a single evidence file are never reported here; they end up
/// as [`crate::compose::Unembedded`] values instead.
#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error("Failed to load primary document: {0}")]
    PrimaryDocument(String),

    #[error("Failed to render report: {0}")]
    Generation(String),

    #[error("Failed to serialize composite document: {0}")]
    Serialization(String),

    #[error("Failed to build archive: {0}")]
    Archive(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
