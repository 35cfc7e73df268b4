//! Unified error types for sitemeta.
//!
//! Failures are classified at their point of origin (fetcher or store
//! adapter) and carried upward as typed variants; the server maps each
//! variant to a stable JSON-RPC error code.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the sitemeta server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL string).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Input could not be normalized into a canonical URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Outbound request exceeded the configured timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Outbound request exceeded the redirect limit.
    #[error("TOO_MANY_REDIRECTS: {0}")]
    TooManyRedirects(String),

    /// Any other transport-level fetch failure (DNS, refused
    /// connection, TLS, interrupted body). A remote 4xx/5xx response
    /// is not one of these; it is a successful fetch.
    #[error("FETCH_TRANSPORT: {0}")]
    FetchTransport(String),

    /// The document store is unreachable or erroring.
    #[error("STORE_UNAVAILABLE: {0}")]
    StoreUnavailable(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_UNAVAILABLE: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => {
                Error::StoreUnavailable(tokio_rusqlite::Error::ConnectionClosed)
            }
            tokio_rusqlite::Error::Close(c) => Error::StoreUnavailable(tokio_rusqlite::Error::Close(c)),
            _ => Error::StoreUnavailable(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::StoreUnavailable(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::StoreUnavailable(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32001, msg.clone()),
            Error::FetchTimeout(msg) => (-32002, msg.clone()),
            Error::TooManyRedirects(msg) => (-32003, msg.clone()),
            Error::FetchTransport(msg) => (-32004, msg.clone()),
            Error::StoreUnavailable(e) => (-32005, e.to_string()),
            Error::MigrationFailed(msg) => (-32006, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
