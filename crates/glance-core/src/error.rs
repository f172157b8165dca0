use thiserror::Error;

/// Top-level error type for the Glance system.
///
/// Each variant wraps a subsystem-specific failure. Collaborator seams (OCR,
/// vision, entity services) surface their failures through the matching
/// variant so that the `?` operator works across crate boundaries; the core
/// algorithms themselves never fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GlanceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Vision error: {0}")]
    Vision(String),

    #[error("Entity extraction error: {0}")]
    Entity(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for GlanceError {
    fn from(err: toml::de::Error) -> Self {
        GlanceError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GlanceError {
    fn from(err: toml::ser::Error) -> Self {
        GlanceError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GlanceError {
    fn from(err: serde_json::Error) -> Self {
        GlanceError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Glance operations.
pub type Result<T> = std::result::Result<T, GlanceError>;
