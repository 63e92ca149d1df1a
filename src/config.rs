//! Configuration management for restline

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::warn;

use crate::error::RestError;

/// Environment variable overriding the default `User-Agent`.
pub const ENV_USER_AGENT: &str = "RESTLINE_USER_AGENT";
/// Environment variable holding the total timeout in seconds.
pub const ENV_TIMEOUT: &str = "RESTLINE_TIMEOUT";
/// Environment variable holding the connect timeout in seconds.
pub const ENV_CONNECT_TIMEOUT: &str = "RESTLINE_CONNECT_TIMEOUT";
/// Environment variable holding a proxy URL.
pub const ENV_PROXY: &str = "RESTLINE_PROXY";
/// Environment variable disabling TLS verification when set to `1` or `true`.
pub const ENV_INSECURE: &str = "RESTLINE_INSECURE";

/// HTTP methods the builder can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RestError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            _ => Err(RestError::InvalidMethod(s.to_string())),
        }
    }
}

/// Basic authentication credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// SSL/TLS verification policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SslConfig {
    /// Verify the peer's certificate chain.
    pub verify_peer: bool,
    /// Verify that the certificate matches the requested host name.
    pub verify_host: bool,
}

impl Default for SslConfig {
    fn default() -> Self {
        SslConfig {
            verify_peer: true,
            verify_host: true,
        }
    }
}

/// Transfer-level settings handed to the transport on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Prefix the response body with the status line and response headers.
    pub include_headers: bool,
    pub auto_referer: bool,
    /// Never reuse a pooled connection.
    pub fresh_connect: bool,
    pub follow_redirects: bool,
    pub max_redirects: u32,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub ssl: SslConfig,
    pub credentials: Option<Credentials>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        TransferOptions {
            include_headers: false,
            auto_referer: true,
            fresh_connect: true,
            follow_redirects: false,
            max_redirects: 50,
            timeout: None,
            connect_timeout: None,
            user_agent: None,
            proxy: None,
            ssl: SslConfig::default(),
            credentials: None,
        }
    }
}

/// A single transfer option, as accepted by `RestClient::set_option`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOption {
    IncludeHeaders(bool),
    AutoReferer(bool),
    FreshConnect(bool),
    FollowRedirects(bool),
    MaxRedirects(u32),
    Timeout(Duration),
    ConnectTimeout(Duration),
    UserAgent(String),
    Proxy(String),
    VerifyPeer(bool),
    VerifyHost(bool),
    BasicAuth(Credentials),
}

impl TransferOption {
    /// Write this option into `options`, replacing any previous value.
    pub fn apply(self, options: &mut TransferOptions) {
        match self {
            TransferOption::IncludeHeaders(on) => options.include_headers = on,
            TransferOption::AutoReferer(on) => options.auto_referer = on,
            TransferOption::FreshConnect(on) => options.fresh_connect = on,
            TransferOption::FollowRedirects(on) => options.follow_redirects = on,
            TransferOption::MaxRedirects(max) => options.max_redirects = max,
            TransferOption::Timeout(timeout) => options.timeout = Some(timeout),
            TransferOption::ConnectTimeout(timeout) => options.connect_timeout = Some(timeout),
            TransferOption::UserAgent(agent) => options.user_agent = Some(agent),
            TransferOption::Proxy(proxy) => options.proxy = Some(proxy),
            TransferOption::VerifyPeer(on) => options.ssl.verify_peer = on,
            TransferOption::VerifyHost(on) => options.ssl.verify_host = on,
            TransferOption::BasicAuth(credentials) => options.credentials = Some(credentials),
        }
    }
}

/// Initial state for a new `RestClient`.
#[derive(Debug, Clone)]
pub struct Config {
    pub headers: Vec<(String, String)>,
    pub accept_types: Vec<(String, String)>,
    pub options: TransferOptions,
}

impl Default for Config {
    fn default() -> Self {
        let pairs = |items: &[(&str, &str)]| {
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>()
        };

        Config {
            headers: pairs(&[
                ("Cache-Control", "max-age=0"),
                ("Connection", "keep-alive"),
                ("Keep-Alive", "300"),
            ]),
            accept_types: pairs(&[
                ("xml", "text/xml"),
                ("html", "text/html"),
                ("json", "application/json"),
                ("text", "text/plain"),
                ("form", "application/x-www-form-urlencoded"),
            ]),
            options: TransferOptions::default(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the `RESTLINE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values returned by `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let options = &mut config.options;

        if let Some(agent) = lookup(ENV_USER_AGENT) {
            options.user_agent = Some(agent);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT).and_then(|v| parse_seconds(ENV_TIMEOUT, &v)) {
            options.timeout = Some(timeout);
        }
        if let Some(timeout) =
            lookup(ENV_CONNECT_TIMEOUT).and_then(|v| parse_seconds(ENV_CONNECT_TIMEOUT, &v))
        {
            options.connect_timeout = Some(timeout);
        }
        if let Some(proxy) = lookup(ENV_PROXY).filter(|p| !p.is_empty()) {
            options.proxy = Some(proxy);
        }
        if let Some(insecure) = lookup(ENV_INSECURE) {
            if matches!(insecure.trim().to_lowercase().as_str(), "1" | "true" | "yes") {
                warn!("TLS verification disabled by {}", ENV_INSECURE);
                options.ssl.verify_peer = false;
                options.ssl.verify_host = false;
            }
        }

        config
    }
}

fn parse_seconds(key: &str, value: &str) -> Option<Duration> {
    match value.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        _ => {
            warn!("ignoring {}={:?}: expected a positive number of seconds", key, value);
            None
        }
    }
}
