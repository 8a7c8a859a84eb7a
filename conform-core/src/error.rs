use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConformError {
    #[error("unsupported schema type `{ty}` at {path}")]
    UnsupportedType { path: String, ty: String },

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("generation marker missing from partial value")]
    MarkerMissing,

    #[error("model gateway error: {0}")]
    Gateway(String),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ConformError>;
