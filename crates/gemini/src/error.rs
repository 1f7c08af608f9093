use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Retries exhausted after {attempts} attempts (last status {status})")]
    RetriesExhausted { attempts: u32, status: u16 },

    #[error("Response contained no candidates")]
    EmptyResponse,

    #[error("Missing API key: set GEMINI_API_KEY or pass --api-key")]
    MissingApiKey,
}

pub type Result<T> = std::result::Result<T, GeminiError>;
