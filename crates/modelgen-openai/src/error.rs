use modelgen_core::error::GenerationError;
use reqwest::{StatusCode, header::InvalidHeaderValue};

/// Everything that can go wrong while talking to the OpenAI API.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t serialise body: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("API key is not a valid header value")]
    InvalidApiKey(#[from] InvalidHeaderValue),

    #[error("OpenAI returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("OpenAI format error: {0}")]
    Format(String),
}

impl From<OpenAiError> for GenerationError {
    fn from(value: OpenAiError) -> Self {
        GenerationError::Backend(Box::new(value))
    }
}
