//! HTTP wire types and the transport seam.
//!
//! # Design
//! Requests and responses are plain data. The client builds an `HttpRequest`,
//! hands it to a `Transport`, and classifies the `HttpResponse` it gets back
//! without ever touching a socket itself. Any HTTP library can sit behind
//! `Transport`; the classifier only cares that headers are a string-to-string
//! mapping and that the body is an optional string.
//!
//! Headers are kept in a `BTreeMap` so that two requests built from the same
//! inputs compare equal regardless of insertion order.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Header name to header value.
pub type Headers = BTreeMap<String, String>;

/// Error raised by a `Transport` when no response could be obtained.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `JsonApiClient::build_*` methods and never mutated once sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Option<String>,
}

impl HttpResponse {
    /// Case-insensitive header lookup, so `Content-Type` and `content-type`
    /// both resolve regardless of how the transport spelled the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// The `Content-Type` header value, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// True when the body is absent or only whitespace.
    pub fn has_blank_body(&self) -> bool {
        self.body.as_deref().map_or(true, |body| body.trim().is_empty())
    }
}

fn find_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    if let Some(value) = headers.get(name) {
        return Some(value.as_str());
    }
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Sends one HTTP request and returns one HTTP response.
///
/// Implementations must return non-2xx statuses as responses, not errors:
/// status interpretation belongs to the client. Retries, timeouts and
/// cancellation are the implementation's business.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(headers: &[(&str, &str)], body: Option<&str>) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn method_renders_as_uppercase_verb() {
        let verbs = [HttpMethod::Get, HttpMethod::Post, HttpMethod::Patch, HttpMethod::Delete].map(|m| m.as_str());
        assert_eq!(verbs, ["GET", "POST", "PATCH", "DELETE"]);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn header_lookup_ignores_name_case() {
        let canonical = response(&[("Content-Type", "application/vnd.api+json")], None);
        let lower = response(&[("content-type", "application/vnd.api+json")], None);
        let shouting = response(&[("CONTENT-TYPE", "text/html")], None);

        assert_eq!(canonical.content_type(), Some("application/vnd.api+json"));
        assert_eq!(lower.content_type(), Some("application/vnd.api+json"));
        assert_eq!(shouting.content_type(), Some("text/html"));
        assert_eq!(response(&[], None).content_type(), None);
    }

    #[test]
    fn blank_body_detection() {
        assert!(response(&[], None).has_blank_body());
        assert!(response(&[], Some("")).has_blank_body());
        assert!(response(&[], Some("  \n\t")).has_blank_body());
        assert!(!response(&[], Some("{}")).has_blank_body());
    }

    #[test]
    fn references_and_arcs_are_transports() {
        struct Fixed;
        impl Transport for Fixed {
            fn send(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
                Ok(HttpResponse {
                    status: 204,
                    headers: Headers::new(),
                    body: None,
                })
            }
        }

        let request = HttpRequest {
            url: "http://example.com".to_string(),
            method: HttpMethod::Get,
            headers: Headers::new(),
            body: None,
        };
        let shared: Arc<dyn Transport> = Arc::new(Fixed);
        assert_eq!(shared.send(&request).unwrap().status, 204);
        assert_eq!((&Fixed).send(&request).unwrap().status, 204);
    }
}
