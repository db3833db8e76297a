//! HTTP requests and responses as plain data.
//!
//! # Design
//! `ApiClient` builds `HttpRequest` values and classifies `HttpResponse`
//! values; a `Transport` sits between the two and performs the actual I/O.
//! Keeping both sides as owned data lets tests intercept the exchange with a
//! recording transport and lets decorators rewrite a request without touching
//! the caller's copy.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
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

/// A fully-qualified HTTP request.
///
/// Built by `ApiClient::new_request`. `url` is absolute; `body` is already
/// JSON-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Returns the first header value matching `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Replaces every header named `name` with a single `value`.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }
}

/// An HTTP response with its body fully read.
///
/// Returned by a `Transport` and consumed by the client's status
/// classification. Owning the body means it is released on every exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.example.com/api/v3.1/clients.json".to_string(),
            headers: vec![("User-Agent".to_string(), "test".to_string())],
            body: None,
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = request();
        assert_eq!(req.header("user-agent"), Some("test"));
        assert_eq!(req.header("USER-AGENT"), Some("test"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn set_header_replaces_existing_value() {
        let mut req = request();
        req.set_header("user-agent", "other");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("User-Agent"), Some("other"));
    }

    #[test]
    fn success_range_is_2xx() {
        let mut resp = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(resp.is_success());
        resp.status = 299;
        assert!(resp.is_success());
        resp.status = 300;
        assert!(!resp.is_success());
        resp.status = 199;
        assert!(!resp.is_success());
    }

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
    }
}
