use thiserror::Error;

#[derive(Debug, Error)]
pub enum TryOnError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The client was built without a credential. Every call fails with this.
    #[error("Initialization error: {0}")]
    InitializationError(String),

    #[error("Request was blocked. Reason: {reason}.{}", blocked_detail(.message))]
    BlockedContent {
        reason: String,
        message: Option<String>,
    },

    #[error("Image generation stopped unexpectedly. Reason: {0}. This often relates to safety settings.")]
    GenerationInterrupted(String),

    #[error("The model did not return an image. {0}")]
    NoImageReturned(String),

    #[error("Malformed image input: {0}")]
    MalformedInput(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("API returned HTTP {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for TryOnError {
    fn from(e: std::io::Error) -> Self {
        TryOnError::IoError(e.to_string())
    }
}

impl From<serde_json::Error> for TryOnError {
    fn from(e: serde_json::Error) -> Self {
        TryOnError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TryOnError>;

fn blocked_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(" {}", m))
        .unwrap_or_default()
}
