use thiserror::Error;

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Rate limited by {provider}, retry after {retry_after_seconds}s")]
    RateLimited {
        provider: String,
        retry_after_seconds: u64,
    },

    #[error("Failed to parse response: {0}")]
    JsonParse(String),

    #[error("Query is empty")]
    EmptyQuery,

    #[error("Resolution cancelled")]
    Cancelled,

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, LyricsError>;
