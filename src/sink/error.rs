//! Sink error types.

/// Errors from delivering a record.
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    /// Failed to build the HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid sink URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport-level failure.
    #[error("Request to sink failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Sink request timed out")]
    Timeout,

    /// The endpoint answered with a non-success status.
    #[error("Sink rejected record: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Failed to serialize the payload.
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The receiving side of an in-process sink is gone.
    #[error("Channel closed")]
    ChannelClosed,
}

impl SinkError {
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}
