//! Error types for polyfaq

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the polyfaq assistant
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{service} returned status {status}: {body}")]
    Service {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error belongs to a single question's round trip.
    ///
    /// The assistant loop reports these and moves on to the next prompt.
    /// Anything else (console I/O, configuration) ends the loop.
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            Error::Network(_)
                | Error::Service { .. }
                | Error::UnexpectedResponse(_)
                | Error::InvalidInput(_)
                | Error::Timeout(_)
        )
    }
}
