//! Transfer results

use crate::error::Result;
use serde::Serialize;

/// Metadata describing one transfer.
///
/// Fields the transport could not determine keep their zero value, so a
/// failed connection still yields a record with the URL and elapsed time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferInfo {
    /// Request method as sent on the wire.
    pub method: String,
    /// Final URL after any redirects.
    pub url: String,
    /// HTTP status code, 0 when no response was received.
    pub http_code: u16,
    pub http_version: Option<String>,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub primary_ip: Option<String>,
    pub primary_port: Option<u16>,
    pub size_upload: u64,
    pub size_download: u64,
    /// Total transfer time in seconds.
    pub total_time: f64,
}

impl TransferInfo {
    /// Render the record as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// First response header matching `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response body, transfer metadata and transport error of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestOutcome {
    pub response: String,
    pub info: TransferInfo,
    /// Empty when the transport completed without error.
    pub error: String,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }
}
