use thiserror::Error;

/// Failures of a single query round trip. Every variant is terminal for the
/// request that produced it; nothing here is retried automatically.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Status 400: the filter JSON was malformed or named an unknown
    /// field/value. The API reports the detail in a response header.
    #[error("invalid query: {}", reason.as_deref().unwrap_or("no reason given"))]
    InvalidQuery { reason: Option<String> },

    /// Status 500: opaque upstream failure, detail likewise header-carried.
    #[error("server error: {}", reason.as_deref().unwrap_or("no reason given"))]
    ServerError { reason: Option<String> },

    /// Any other non-200 status.
    #[error("unexpected status {code}: {}", reason.as_deref().unwrap_or("no reason given"))]
    UnexpectedStatus { code: u16, reason: Option<String> },

    /// Body bytes were not valid text for the declared charset.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Body was not JSON, or parsed JSON lacked the expected top-level shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The GET itself failed before any response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, FetchError>;
