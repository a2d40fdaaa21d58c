use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Input is not a parsable table: {message}")]
    MalformedInput { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Catalog service request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error ({field}): {message}")]
    ConfigError { field: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
