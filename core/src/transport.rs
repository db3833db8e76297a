//! Transports that execute an `HttpRequest` and return an `HttpResponse`.
//!
//! # Design
//! `Transport` is the seam between request building and I/O. `UreqTransport`
//! is the default blocking implementation; `ApiKeyAuth` is a decorator that
//! stamps the Basic credential on each request and delegates, so the
//! underlying agent and its connection pool stay shared.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use ureq::RequestBuilder;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Placeholder password paired with the API key in Basic auth.
pub const API_KEY_PASSWORD: &str = "x";

/// Request timeout used by `UreqTransport::default`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok`; status
/// interpretation belongs to the client.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
/// responses come back as data. A request body is sent whatever the method,
/// GET and DELETE included.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wraps an agent built elsewhere. The agent must not treat HTTP status
    /// codes as errors.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Some(DEFAULT_TIMEOUT))
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut response = match method {
            HttpMethod::Get => {
                let builder = with_headers(self.agent.get(&url), &headers);
                match body {
                    Some(body) => builder.force_send_body().send(body.as_bytes()),
                    None => builder.call(),
                }
            }
            HttpMethod::Delete => {
                let builder = with_headers(self.agent.delete(&url), &headers);
                match body {
                    Some(body) => builder.force_send_body().send(body.as_bytes()),
                    None => builder.call(),
                }
            }
            HttpMethod::Post => {
                let builder = with_headers(self.agent.post(&url), &headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
            HttpMethod::Put => {
                let builder = with_headers(self.agent.put(&url), &headers);
                match body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Decorator that authenticates every request with an API key.
///
/// The key is sent as the username half of HTTP Basic auth with
/// [`API_KEY_PASSWORD`] as the password. The decorator holds no mutable
/// state and is safe to share between threads.
#[derive(Clone)]
pub struct ApiKeyAuth<T = UreqTransport> {
    transport: T,
    authorization: String,
}

impl ApiKeyAuth<UreqTransport> {
    /// Authenticates requests sent through a default `UreqTransport`.
    pub fn new(api_key: &str) -> Self {
        Self::with_transport(UreqTransport::default(), api_key)
    }
}

impl<T> ApiKeyAuth<T> {
    pub fn with_transport(transport: T, api_key: &str) -> Self {
        Self {
            transport,
            authorization: basic_authorization(api_key),
        }
    }

    pub fn inner(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Transport for ApiKeyAuth<T> {
    fn send(&self, mut request: HttpRequest) -> Result<HttpResponse, TransportError> {
        request.set_header("Authorization", self.authorization.as_str());
        self.transport.send(request)
    }
}

impl<T: fmt::Debug> fmt::Debug for ApiKeyAuth<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("transport", &self.transport)
            .field("authorization", &"<redacted>")
            .finish()
    }
}

/// `Authorization` header value for `api_key`.
pub fn basic_authorization(api_key: &str) -> String {
    let credentials = format!("{api_key}:{API_KEY_PASSWORD}");
    format!("Basic {}", general_purpose::STANDARD.encode(credentials))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Capture {
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for Capture {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            Ok(HttpResponse {
                status: 204,
                headers: Vec::new(),
                body: String::new(),
            })
        }
    }

    struct Failing;

    impl Transport for Failing {
        fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError::Other("connection refused".to_string()))
        }
    }

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.example.com/api/v3.1/clients.json".to_string(),
            headers: vec![("User-Agent".to_string(), "test".to_string())],
            body: None,
        }
    }

    #[test]
    fn basic_authorization_encodes_key_and_placeholder() {
        // base64("abc123:x")
        assert_eq!(basic_authorization("abc123"), "Basic YWJjMTIzOng=");
    }

    #[test]
    fn api_key_auth_adds_header_and_delegates() {
        let auth = ApiKeyAuth::with_transport(Capture::default(), "abc123");
        let original = request();
        let resp = auth.send(original.clone()).unwrap();
        assert_eq!(resp.status, 204);

        let seen = auth.inner().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].header("authorization"), Some("Basic YWJjMTIzOng="));
        assert_eq!(seen[0].header("user-agent"), Some("test"));
        assert_eq!(seen[0].url, original.url);
        assert!(original.header("authorization").is_none());
    }

    #[test]
    fn api_key_auth_overrides_existing_authorization() {
        let auth = ApiKeyAuth::with_transport(Capture::default(), "abc123");
        let mut req = request();
        req.set_header("Authorization", "Bearer stale");
        auth.send(req).unwrap();

        let seen = auth.inner().seen.lock().unwrap();
        let values: Vec<_> = seen[0]
            .headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case("authorization"))
            .collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].1, "Basic YWJjMTIzOng=");
    }

    #[test]
    fn api_key_auth_propagates_transport_errors() {
        let auth = ApiKeyAuth::with_transport(Failing, "abc123");
        let err = auth.send(request()).unwrap_err();
        assert!(matches!(err, TransportError::Other(ref msg) if msg == "connection refused"));
    }

    #[test]
    fn debug_output_hides_credential() {
        let auth = ApiKeyAuth::with_transport(UreqTransport::default(), "secret-key");
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("c2VjcmV0"));
        assert!(rendered.contains("<redacted>"));
    }
}
