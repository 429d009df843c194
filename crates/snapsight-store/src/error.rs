//! Storage error types

/// Specialized result type for capture persistence.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while persisting or loading capture artifacts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<Error> for snapsight_core::Error {
    fn from(error: Error) -> Self {
        let message = error.to_string();
        match error {
            Error::Io(source) => snapsight_core::Error::storage()
                .with_message(message)
                .with_source(source),
            Error::Serialization(source) => snapsight_core::Error::serialization()
                .with_message(message)
                .with_source(source),
        }
    }
}
