//! HTTP authentication utilities

use crate::config::Credentials;
use base64::Engine;

/// Authentication helper
pub struct Auth;

impl Auth {
    /// Create basic auth header value
    pub fn basic_auth(username: &str, password: &str) -> String {
        let credentials = format!("{}:{}", username, password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }

    /// `Authorization` header value for stored credentials
    pub fn authorization(credentials: &Credentials) -> String {
        Self::basic_auth(&credentials.username, &credentials.password)
    }
}
