use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemoForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Unknown similarity method: {0}")]
    UnknownMethod(String),

    #[error("Unsupported type for key {0}")]
    UnsupportedType(String),
}

pub type DfResult<T> = Result<T, DemoForgeError>;
