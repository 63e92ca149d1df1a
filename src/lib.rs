//! restline - a fluent builder for single HTTP requests
//!
//! Configure a URL, headers, method, body, authentication and TLS policy on a
//! [`RestClient`], then execute it synchronously to get the response body,
//! transfer metadata and any transport error back.

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod ssl;

pub use config::{Config, HttpMethod, TransferOption};
pub use error::{Result, RestError};
pub use http::{RequestOutcome, RestClient, TransferInfo};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
