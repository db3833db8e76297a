//! Request construction, execution and status classification.
//!
//! # Design
//! `ApiClient` owns a base URL, a user-agent and a `Transport`. Endpoint
//! methods build a request with `new_request` and run it with `execute`
//! (typed decode) or `execute_empty` (body ignored). The destination type is
//! chosen by the endpoint method; `serde_json::Value` serves endpoints that
//! answer with a bare JSON scalar.
//!
//! One call is one HTTP request. There is no retry, caching or cross-call
//! state, so a shared `&ApiClient` is usable from many threads at once.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::{default_user_agent, ClientConfig};
use crate::error::{ApiError, CreatesendError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ApiKeyAuth, Transport, UreqTransport};

/// Blocking client for the createsend API.
#[derive(Debug, Clone)]
pub struct ApiClient<T = ApiKeyAuth<UreqTransport>> {
    transport: T,
    /// Base URL for API requests. Relative paths resolve against it, so it
    /// should end with `/`.
    pub base_url: Url,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
    log_response_bodies: bool,
}

impl ApiClient {
    /// Builds a client that authenticates with `config.api_key` over the
    /// default ureq transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let transport =
            ApiKeyAuth::with_transport(UreqTransport::new(config.timeout), &config.api_key);
        Ok(Self {
            transport,
            base_url,
            user_agent: config.user_agent,
            log_response_bodies: config.log_response_bodies,
        })
    }
}

impl<T: Transport> ApiClient<T> {
    /// Builds a client over an arbitrary transport. Authentication, if any,
    /// is the transport's responsibility.
    pub fn with_transport(transport: T, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
            user_agent: default_user_agent(),
            log_response_bodies: false,
        }
    }

    /// Log the body of unexpected error responses at `warn` level.
    pub fn with_response_logging(mut self, enabled: bool) -> Self {
        self.log_response_bodies = enabled;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds a request for `path` relative to the base URL.
    ///
    /// `path` must not start with `/`; it may carry a query string. If `body`
    /// is given it is JSON-encoded; an encoding failure is returned before
    /// anything is sent.
    pub fn new_request<B>(&self, method: HttpMethod, path: &str, body: Option<&B>) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        if path.starts_with('/') {
            return Err(ApiError::InvalidPath {
                path: path.to_string(),
                reason: "relative paths must not start with '/'".to_string(),
            });
        }
        if has_dot_segment(path) {
            return Err(ApiError::InvalidPath {
                path: path.to_string(),
                reason: "relative paths must not contain '.' or '..' segments".to_string(),
            });
        }
        let url = self.base_url.join(path).map_err(|e| ApiError::InvalidPath {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let mut headers = vec![("User-Agent".to_string(), self.user_agent.clone())];
        let body = match body {
            Some(body) => {
                let encoded = serde_json::to_string(body).map_err(ApiError::Serialization)?;
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(encoded)
            }
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        })
    }

    /// Shorthand for a request without a body.
    pub fn request(&self, method: HttpMethod, path: &str) -> Result<HttpRequest> {
        self.new_request::<()>(method, path, None)
    }

    /// Sends `request` and decodes a 2xx body into `R`.
    pub fn execute<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R> {
        let response = self.send(request)?;
        serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
    }

    /// Sends `request` and discards any 2xx body.
    pub fn execute_empty(&self, request: HttpRequest) -> Result<()> {
        self.send(request).map(drop)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.send(request)?;
        debug!(status = response.status, "received response");
        check_status(response, self.log_response_bodies)
    }
}

/// Map the response status to success, a structured API error (400) or a
/// generic HTTP error.
fn check_status(response: HttpResponse, log_body: bool) -> Result<HttpResponse> {
    if response.status == 400 {
        let error: CreatesendError =
            serde_json::from_str(&response.body).map_err(ApiError::Deserialization)?;
        return Err(ApiError::Api(error));
    }
    if !response.is_success() {
        if log_body {
            warn!(status = response.status, body = %response.body, "unexpected http response");
        }
        return Err(ApiError::Http {
            status: response.status,
        });
    }
    Ok(response)
}

/// Whether the path part of `path` has a segment that URL resolution would
/// treat as `.` or `..`, including percent-encoded spellings.
fn has_dot_segment(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.split('/').any(|segment| {
        let segment = segment.to_ascii_lowercase().replace("%2e", ".");
        segment == "." || segment == ".."
    })
}

/// Parses `raw` as an absolute base URL, appending a trailing `/` so that
/// relative resolution keeps the last path segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).map_err(|e| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
