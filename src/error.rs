//! Error handling for restline

use thiserror::Error;

/// Precondition and validation failures raised by the request builder.
///
/// Transport failures are not represented here; they are reported as a
/// string inside [`crate::http::RequestOutcome`].
#[derive(Error, Debug)]
pub enum RestError {
    #[error("Method not set")]
    MethodNotSet,

    #[error("URL not set")]
    UrlNotSet,

    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    #[error("Invalid accept type: {0}")]
    InvalidAcceptType(String),

    #[error("Could not write body to buffer: {0}")]
    BufferWrite(#[source] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for restline operations
pub type Result<T> = std::result::Result<T, RestError>;
