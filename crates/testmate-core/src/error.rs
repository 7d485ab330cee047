use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestmateError {
    #[error("Unknown use case: {0}")]
    InvalidUseCase(String),

    #[error("Invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("Inference service returned no assistant message")]
    EmptyInferenceResult,

    #[error("Inference service error: {0}")]
    InferenceService(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Authentication unavailable: {0}")]
    AuthenticationUnavailable(String),

    #[error("A request is already in flight")]
    Busy,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TestmateError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable(err.to_string())
    }

    pub fn inference(err: impl std::fmt::Display) -> Self {
        Self::InferenceService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TestmateError>;
