use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("lua syntax error in {file}: {message}")]
    Syntax { file: String, message: String },
    #[error("manifest error: {0}")]
    Manifest(String),
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
}

impl From<serde_json::Error> for CodegenError {
    fn from(value: serde_json::Error) -> Self {
        Self::Manifest(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CodegenError>;
