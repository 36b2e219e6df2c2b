//! Error types for the JSON:API client.
//!
//! # Design
//! Only two kinds of failure cross the client boundary as `Err`: the
//! transport could not produce a response, or the server answered with a
//! body that is not `application/vnd.api+json`. Everything the server says in
//! JSON:API terms, including error documents and unexpected statuses, is an
//! ordinary `Outcome::Failure` value instead.

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse, TransportError};

/// Errors returned by `JsonApiClient` operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed before a response was received. The transport's
    /// own error is kept as the source.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    /// The server returned a non-blank body whose `Content-Type` is not the
    /// JSON:API media type.
    #[error("invalid response media type")]
    InvalidMediaType {
        request: Box<HttpRequest>,
        response: Box<HttpResponse>,
    },

    /// The request document could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// The request that provoked a protocol fault.
    pub fn request(&self) -> Option<&HttpRequest> {
        match self {
            ClientError::InvalidMediaType { request, .. } => Some(&**request),
            _ => None,
        }
    }

    /// The response that provoked a protocol fault.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ClientError::InvalidMediaType { response, .. } => Some(&**response),
            _ => None,
        }
    }
}
