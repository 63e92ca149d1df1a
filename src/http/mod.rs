//! HTTP request builder
//!
//! [`RestClient`] accumulates the configuration of one request through
//! chained calls and executes it synchronously on a [`Transport`].

use crate::config::{Config, Credentials, HttpMethod, TransferOption, TransferOptions};
use crate::error::{Result, RestError};
use log::{debug, info, warn};

pub mod accept;
pub mod auth;
pub mod body;
pub mod headers;
pub mod response;
pub mod transport;


pub use accept::AcceptTypes;
pub use body::{RequestBody, StreamedBody};
pub use headers::HeaderSet;
pub use response::{RequestOutcome, TransferInfo};
pub use transport::{PreparedRequest, ReqwestTransport, Transport};

/// Fluent builder for a single HTTP request.
pub struct RestClient<T: Transport = ReqwestTransport> {
    transport: T,
    url: String,
    method: Option<HttpMethod>,
    headers: HeaderSet,
    accept_types: AcceptTypes,
    accept_type: Option<String>,
    data: Vec<u8>,
    stream_post: bool,
    options: TransferOptions,
    last: Option<RequestOutcome>,
}

impl RestClient {
    /// Create a client with default headers, accept types and options.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::from_parts(config, ReqwestTransport::new())
    }
}

impl Default for RestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> RestClient<T> {
    /// Create a client with default configuration on a custom transport.
    pub fn with_transport(transport: T) -> Self {
        Self::from_parts(Config::default(), transport)
    }

    pub fn from_parts(config: Config, transport: T) -> Self {
        let mut headers = HeaderSet::new();
        for (field, value) in &config.headers {
            headers.insert(field, value);
        }

        RestClient {
            transport,
            url: String::new(),
            method: None,
            headers,
            accept_types: config.accept_types.into_iter().collect(),
            accept_type: None,
            data: Vec::new(),
            stream_post: false,
            options: config.options,
            last: None,
        }
    }

    /// Set the target URL. The URL is not checked until the transport uses it.
    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = url.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn add_header(&mut self, field: &str, value: &str) -> &mut Self {
        self.headers.insert(field, value);
        self
    }

    pub fn add_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (field, value) in headers {
            self.headers.insert(field.as_ref(), value.as_ref());
        }
        self
    }

    pub fn clear_headers(&mut self) -> &mut Self {
        self.headers.clear();
        self
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn set_option(&mut self, option: TransferOption) -> &mut Self {
        option.apply(&mut self.options);
        self
    }

    pub fn set_options<I>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = TransferOption>,
    {
        for option in options {
            option.apply(&mut self.options);
        }
        self
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    /// Register `key` as an accept type mapped to `mime`.
    pub fn add_accept_type(&mut self, key: &str, mime: &str) -> &mut Self {
        self.accept_types.register(key, mime);
        self
    }

    pub fn add_accept_types<I, K, V>(&mut self, types: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, mime) in types {
            self.accept_types.register(key.as_ref(), mime.as_ref());
        }
        self
    }

    pub fn accept_types(&self) -> &AcceptTypes {
        &self.accept_types
    }

    /// The selected accept type keys, joined with `", "`.
    pub fn accept_type(&self) -> Option<&str> {
        self.accept_type.as_deref()
    }

    pub fn add_basic_authentication(&mut self, username: &str, password: &str) -> &mut Self {
        self.set_option(TransferOption::BasicAuth(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }))
    }

    /// Turn off certificate and host name verification.
    pub fn ignore_ssl(&mut self) -> &mut Self {
        warn!("TLS verification disabled for {}", self.describe_target());
        self.set_options([
            TransferOption::VerifyHost(false),
            TransferOption::VerifyPeer(false),
        ])
    }

    pub fn set_accept_type(&mut self, accept_type: &str) -> Result<&mut Self> {
        self.set_accept_types(&[accept_type])
    }

    /// Select one or more registered accept types.
    ///
    /// `Content-Type` is set to the MIME type of the first key. Nothing
    /// changes if any key is unregistered.
    pub fn set_accept_types(&mut self, accept_types: &[&str]) -> Result<&mut Self> {
        if let Some(unknown) = accept_types
            .iter()
            .find(|key| !self.accept_types.contains(key))
        {
            return Err(RestError::InvalidAcceptType(unknown.to_string()));
        }

        let primary = accept_types
            .first()
            .and_then(|key| self.accept_types.mime(key))
            .map(str::to_string)
            .ok_or_else(|| RestError::InvalidAcceptType(String::new()))?;

        self.accept_type = Some(accept_types.join(", "));
        self.headers.insert("Content-Type", &primary);
        Ok(self)
    }

    /// Select the method by name (`get`, `post`, `put` or `delete`).
    pub fn set_method(&mut self, method: &str) -> Result<&mut Self> {
        let method = method.parse::<HttpMethod>()?;
        Ok(self.set_http_method(method))
    }

    pub fn set_http_method(&mut self, method: HttpMethod) -> &mut Self {
        self.method = Some(method);
        self
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) -> &mut Self {
        self.data = data.into();
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Send POST bodies through the streamed buffer instead of as fields.
    ///
    /// PUT and DELETE always stream; GET never sends a body.
    pub fn stream_post_body(&mut self, stream: bool) -> &mut Self {
        self.stream_post = stream;
        self
    }

    /// Execute the request.
    ///
    /// Returns `Err` only for configuration problems detected before any
    /// network activity. Transport failures are reported in
    /// [`RequestOutcome::error`].
    pub fn request(&mut self) -> Result<RequestOutcome> {
        let method = self.method.ok_or(RestError::MethodNotSet)?;

        let streamed = if self.streams_body(method) && !self.data.is_empty() {
            Some(StreamedBody::from_payload(&self.data)?)
        } else {
            None
        };

        if self.url.is_empty() {
            return Err(RestError::UrlNotSet);
        }

        let request = self.prepare(method, streamed);
        debug!(
            "{} {}: {} header(s), {} byte body{}",
            request.verb(),
            request.url,
            request.headers.len(),
            request.body.len(),
            if request.body.is_streamed() { " (streamed)" } else { "" }
        );

        let outcome = self.transport.perform(request);
        if outcome.is_success() {
            info!(
                "{} {} -> {} in {:.3}s",
                outcome.info.method, outcome.info.url, outcome.info.http_code, outcome.info.total_time
            );
        }

        self.last = Some(outcome.clone());
        Ok(outcome)
    }

    fn streams_body(&self, method: HttpMethod) -> bool {
        match method {
            HttpMethod::Get => false,
            HttpMethod::Post => self.stream_post,
            HttpMethod::Put | HttpMethod::Delete => true,
        }
    }

    fn prepare(&self, method: HttpMethod, streamed: Option<StreamedBody>) -> PreparedRequest {
        let streamed_or_empty = |streamed: Option<StreamedBody>| match streamed {
            Some(body) => RequestBody::Streamed(body),
            None => RequestBody::None,
        };

        let (custom_request, body) = match method {
            HttpMethod::Get => (None, RequestBody::None),
            HttpMethod::Post => match streamed {
                Some(body) => (None, RequestBody::Streamed(body)),
                None => (None, RequestBody::Fields(self.data.clone())),
            },
            HttpMethod::Put => (None, streamed_or_empty(streamed)),
            HttpMethod::Delete => (Some("DELETE".to_string()), streamed_or_empty(streamed)),
        };

        PreparedRequest {
            method,
            custom_request,
            url: self.url.clone(),
            headers: self
                .headers
                .pairs()
                .map(|(field, value)| (field.to_string(), value.to_string()))
                .collect(),
            body,
            options: self.options.clone(),
        }
    }

    /// Response body of the last executed request.
    pub fn response(&self) -> Option<&str> {
        self.last.as_ref().map(|o| o.response.as_str())
    }

    /// Transfer metadata of the last executed request.
    pub fn info(&self) -> Option<&TransferInfo> {
        self.last.as_ref().map(|o| &o.info)
    }

    /// Transport error of the last executed request, empty on success.
    pub fn error(&self) -> Option<&str> {
        self.last.as_ref().map(|o| o.error.as_str())
    }

    pub fn last_outcome(&self) -> Option<&RequestOutcome> {
        self.last.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn describe_target(&self) -> &str {
        if self.url.is_empty() {
            "<unset URL>"
        } else {
            &self.url
        }
    }
}
