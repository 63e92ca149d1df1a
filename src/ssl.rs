//! SSL/TLS configuration and utilities

use crate::config::SslConfig;
use log::debug;
use reqwest::blocking::ClientBuilder;

/// SSL/TLS verification helpers
pub struct SslUtils;

impl SslUtils {
    /// Whether any part of certificate verification is switched off.
    pub fn is_insecure(config: &SslConfig) -> bool {
        !config.verify_peer || !config.verify_host
    }

    /// Apply the verification policy to a client builder.
    pub fn apply(builder: ClientBuilder, config: &SslConfig) -> ClientBuilder {
        if Self::is_insecure(config) {
            debug!(
                "TLS verification relaxed (peer: {}, host: {})",
                config.verify_peer, config.verify_host
            );
        }

        builder
            .danger_accept_invalid_certs(!config.verify_peer)
            .danger_accept_invalid_hostnames(!config.verify_host)
    }
}
