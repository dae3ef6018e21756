use thiserror::Error;

/// Top-level error type for the Concierge system.
///
/// Subsystem crates define their own error types and implement
/// `From<ConciergeError>` so that `?` works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConciergeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile lookup error: {0}")]
    ProfileLookup(String),

    #[error("Responder error: {0}")]
    Responder(String),

    #[error("Email handoff error: {0}")]
    EmailHandoff(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ConciergeError {
    fn from(err: toml::de::Error) -> Self {
        ConciergeError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ConciergeError {
    fn from(err: toml::ser::Error) -> Self {
        ConciergeError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ConciergeError {
    fn from(err: serde_json::Error) -> Self {
        ConciergeError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Concierge operations.
pub type Result<T> = std::result::Result<T, ConciergeError>;
