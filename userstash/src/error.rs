use thiserror::Error;

#[derive(Error, Debug)]
pub enum StashError {
    #[error("User not found: {id}")]
    NotFound { id: i64 },

    #[error("Invalid id parameter: '{0}'")]
    InvalidId(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Seed fetch failed: {0}")]
    Seed(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, StashError>;
