use thiserror::Error;

/// Startup conditions that prevent the poll loop from ever starting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} env var not specified")]
    MissingCredential { var: String },
}

/// A single failed attempt against the API.
#[derive(Debug, Error)]
pub enum RequestError {
    /// No response was received (connect failure, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    #[error("API error: {status} - {body}")]
    Status {
        status: u16,
        /// Raw `x-app-usage` header bytes, if the response carried one.
        usage_header: Option<Vec<u8>>,
        body: String,
    },

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl RequestError {
    pub fn usage_header(&self) -> Option<&[u8]> {
        match self {
            RequestError::Status { usage_header, .. } => usage_header.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum UsageParseError {
    #[error("x-app-usage header missing")]
    Missing,

    #[error("x-app-usage header is not a metric mapping: {0}")]
    Malformed(#[from] serde_json::Error),
}
