//! Transport backends
//!
//! The builder hands a fully resolved [`PreparedRequest`] to a [`Transport`]
//! and gets a [`RequestOutcome`] back. Transport failures never surface as
//! `Err`; they are reported through the outcome's error string.

use std::error::Error as StdError;
use std::time::{Duration, Instant};

use log::{debug, warn};
use reqwest::blocking::{Body, Client, Response};
use reqwest::Method;
use url::Url;

use super::auth::Auth;
use super::body::RequestBody;
use super::response::{RequestOutcome, TransferInfo};
use crate::config::{HttpMethod, SslConfig, TransferOptions};
use crate::ssl::SslUtils;

/// A request ready to go on the wire.
#[derive(Debug)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    /// Verb string overriding `method` on the wire.
    pub custom_request: Option<String>,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub options: TransferOptions,
}

impl PreparedRequest {
    /// The verb actually sent.
    pub fn verb(&self) -> &str {
        self.custom_request
            .as_deref()
            .unwrap_or_else(|| self.method.as_str())
    }
}

/// Content type of a POST body sent as fields when the caller set none.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Executes prepared requests.
pub trait Transport {
    /// Perform one blocking exchange.
    fn perform(&mut self, request: PreparedRequest) -> RequestOutcome;
}

/// Options that require a new `reqwest` client when they change.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClientSettings {
    auto_referer: bool,
    fresh_connect: bool,
    follow_redirects: bool,
    max_redirects: u32,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    proxy: Option<String>,
    ssl: SslConfig,
}

impl From<&TransferOptions> for ClientSettings {
    fn from(options: &TransferOptions) -> Self {
        ClientSettings {
            auto_referer: options.auto_referer,
            fresh_connect: options.fresh_connect,
            follow_redirects: options.follow_redirects,
            max_redirects: options.max_redirects,
            timeout: options.timeout,
            connect_timeout: options.connect_timeout,
            user_agent: options.user_agent.clone(),
            proxy: options.proxy.clone(),
            ssl: options.ssl.clone(),
        }
    }
}

impl ClientSettings {
    fn build(&self) -> reqwest::Result<Client> {
        let mut builder = Client::builder()
            .referer(self.auto_referer)
            .redirect(if self.follow_redirects {
                reqwest::redirect::Policy::limited(self.max_redirects as usize)
            } else {
                reqwest::redirect::Policy::none()
            })
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout);

        if self.fresh_connect {
            builder = builder.pool_max_idle_per_host(0);
        }

        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        if let Some(proxy) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }

        SslUtils::apply(builder, &self.ssl).build()
    }
}

/// [`Transport`] backed by the blocking `reqwest` client.
///
/// The underlying client is kept between calls unless a fresh connection is
/// requested or a client-level option changed.
#[derive(Default)]
pub struct ReqwestTransport {
    cached: Option<(ClientSettings, Client)>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&mut self, options: &TransferOptions) -> reqwest::Result<Client> {
        let settings = ClientSettings::from(options);

        if let Some((cached, client)) = &self.cached {
            if !settings.fresh_connect && *cached == settings {
                return Ok(client.clone());
            }
        }

        debug!("building transport client");
        let client = settings.build()?;
        self.cached = if settings.fresh_connect {
            None
        } else {
            Some((settings, client.clone()))
        };
        Ok(client)
    }

    fn execute(
        &mut self,
        request: PreparedRequest,
        info: &mut TransferInfo,
    ) -> std::result::Result<String, String> {
        let url = Url::parse(&request.url)
            .map_err(|e| format!("URL rejected: {} ({})", request.url, e))?;
        let method = Method::from_bytes(request.verb().as_bytes()).map_err(|e| describe(&e))?;
        let client = self.client(&request.options).map_err(|e| describe(&e))?;

        let mut builder = client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = &request.options.credentials {
            if !has_header(&request.headers, "Authorization") {
                builder = builder.header("Authorization", Auth::authorization(credentials));
            }
        }

        builder = match request.body {
            RequestBody::None => builder,
            RequestBody::Fields(bytes) if has_header(&request.headers, "Content-Type") => {
                builder.body(bytes)
            }
            RequestBody::Fields(bytes) => builder
                .header("Content-Type", FORM_CONTENT_TYPE)
                .body(bytes),
            RequestBody::Streamed(body) => {
                let size = body.size();
                builder.body(Body::sized(body, size))
            }
        };

        let response = builder.send().map_err(|e| describe(&e))?;
        record_response(&response, info);

        let head = if request.options.include_headers {
            status_block(&response)
        } else {
            String::new()
        };

        let body = response.bytes().map_err(|e| describe(&e))?;
        info.size_download = body.len() as u64;

        Ok(head + &String::from_utf8_lossy(&body))
    }
}

impl Transport for ReqwestTransport {
    fn perform(&mut self, request: PreparedRequest) -> RequestOutcome {
        let started = Instant::now();
        let mut info = TransferInfo {
            method: request.verb().to_string(),
            url: request.url.clone(),
            size_upload: request.body.len(),
            ..TransferInfo::default()
        };

        let result = self.execute(request, &mut info);
        info.total_time = started.elapsed().as_secs_f64();

        match result {
            Ok(response) => RequestOutcome {
                response,
                info,
                error: String::new(),
            },
            Err(error) => {
                warn!("{} {} failed: {}", info.method, info.url, error);
                RequestOutcome {
                    response: String::new(),
                    info,
                    error,
                }
            }
        }
    }
}

fn record_response(response: &Response, info: &mut TransferInfo) {
    info.url = response.url().to_string();
    info.http_code = response.status().as_u16();
    info.http_version = Some(format!("{:?}", response.version()));
    info.headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    info.content_type = info.header("content-type").map(str::to_string);
    if let Some(addr) = response.remote_addr() {
        info.primary_ip = Some(addr.ip().to_string());
        info.primary_port = Some(addr.port());
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(field, _)| field.eq_ignore_ascii_case(name))
}

/// Status line and headers as they would appear on the wire.
fn status_block(response: &Response) -> String {
    let mut block = format!("{:?} {}\r\n", response.version(), response.status());
    for (name, value) in response.headers() {
        block.push_str(name.as_str());
        block.push_str(": ");
        block.push_str(&String::from_utf8_lossy(value.as_bytes()));
        block.push_str("\r\n");
    }
    block.push_str("\r\n");
    block
}

/// Render an error with its full source chain.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
