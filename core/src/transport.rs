//! Blocking `Transport` backed by ureq.

use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Sends requests through a `ureq::Agent`.
///
/// The default agent has `http_status_as_error` disabled so that 4xx/5xx
/// responses come back as data for the classifier instead of as `Err`.
/// Response bodies are read without a size limit unless one is set with
/// `with_body_limit`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(agent)
    }

    /// Use a caller-configured agent (timeouts, proxies, TLS). It should keep
    /// `http_status_as_error` disabled.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self {
            agent,
            body_limit: u64::MAX,
        }
    }

    /// Refuse response bodies larger than `limit` bytes. Exceeding it is a
    /// transport error.
    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.body_limit = limit;
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &Headers) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Repeated header lines are joined with `", "`.
fn collect_headers(headers: &ureq::http::HeaderMap) -> Headers {
    let mut collected = Headers::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        collected
            .entry(name.as_str().to_string())
            .and_modify(|joined: &mut String| {
                joined.push_str(", ");
                joined.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let headers = &request.headers;
        let body = request.body.as_deref();

        // Removing to-many relationship members is a DELETE with a body.
        let mut response = match (request.method, body) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(body)) => {
                with_headers(self.agent.delete(url).force_send_body(), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => with_headers(self.agent.patch(url), headers).send(body.as_bytes()),
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
        }?;

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body: (!body.is_empty()).then_some(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ureq::http::{HeaderMap, HeaderValue};

    #[test]
    fn repeated_headers_are_joined() {
        let mut headers = HeaderMap::new();
        headers.append("link", HeaderValue::from_static("<http://example.com/a>; rel=\"next\""));
        headers.append("link", HeaderValue::from_static("<http://example.com/b>; rel=\"last\""));
        headers.append("content-type", HeaderValue::from_static("application/vnd.api+json"));

        let collected = collect_headers(&headers);

        assert_eq!(
            collected["link"],
            "<http://example.com/a>; rel=\"next\", <http://example.com/b>; rel=\"last\""
        );
        assert_eq!(collected["content-type"], "application/vnd.api+json");
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn body_limit_defaults_to_unbounded() {
        assert_eq!(UreqTransport::new().body_limit, u64::MAX);
        assert_eq!(UreqTransport::new().with_body_limit(1024).body_limit, 1024);
    }
}
