//! Shared fixtures for the client tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use jsonapi_core::{Headers, HttpRequest, HttpResponse, JsonApiClient, Transport, TransportError, JSON_API_MEDIA_TYPE};
use serde_json::Value;

pub const BASE_URL: &str = "http://example.com";

/// Answers every request with the next queued response, or fails when the
/// queue is empty. Every request it sees is recorded.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| "connection refused".into())
    }
}

/// A response carrying `body` as a JSON:API document.
pub fn json_api(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: Headers::from([("Content-Type".to_string(), JSON_API_MEDIA_TYPE.to_string())]),
        body: Some(body.to_string()),
    }
}

/// A response with no body at all.
pub fn empty(status: u16) -> HttpResponse {
    HttpResponse {
        status,
        headers: Headers::new(),
        body: None,
    }
}

pub fn client(transport: MockTransport) -> JsonApiClient<MockTransport> {
    JsonApiClient::new(transport)
}

pub fn url(path: &str) -> String {
    format!("{BASE_URL}{path}")
}
