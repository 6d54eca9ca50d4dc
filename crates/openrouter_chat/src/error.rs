/// Error types for chat operations
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("Received empty response from model")]
    EmptyResponse,

    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, ChatError>;
