use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlameError {
    #[error("Version control error: {0}")]
    VersionControl(String),

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Decoration error: {0}")]
    Decoration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for BlameError {
    fn from(err: serde_json::Error) -> Self {
        BlameError::SerializationError(err.to_string())
    }
}
