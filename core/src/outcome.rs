//! The result of one JSON:API operation.

use crate::document::ErrorDocument;
use crate::http::{HttpRequest, HttpResponse};

/// Success or failure of an operation, together with the exchange that
/// produced it.
///
/// A `Failure` is an ordinary answer from the server (an error status, or a
/// body that does not match what the operation expects), not a fault. Its
/// document is present only when the body was a valid error document.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<D> {
    Success {
        document: Option<D>,
        request: HttpRequest,
        response: HttpResponse,
    },
    Failure {
        document: Option<ErrorDocument>,
        request: HttpRequest,
        response: HttpResponse,
    },
}

impl<D> Outcome<D> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn request(&self) -> &HttpRequest {
        match self {
            Outcome::Success { request, .. } | Outcome::Failure { request, .. } => request,
        }
    }

    pub fn response(&self) -> &HttpResponse {
        match self {
            Outcome::Success { response, .. } | Outcome::Failure { response, .. } => response,
        }
    }

    /// The document of a successful outcome.
    pub fn document(&self) -> Option<&D> {
        match self {
            Outcome::Success { document, .. } => document.as_ref(),
            Outcome::Failure { .. } => None,
        }
    }

    /// The error document of a failed outcome.
    pub fn error_document(&self) -> Option<&ErrorDocument> {
        match self {
            Outcome::Failure { document, .. } => document.as_ref(),
            Outcome::Success { .. } => None,
        }
    }

    /// Drop the exchange and keep only the documents.
    pub fn into_result(self) -> Result<Option<D>, Option<ErrorDocument>> {
        match self {
            Outcome::Success { document, .. } => Ok(document),
            Outcome::Failure { document, .. } => Err(document),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(D) -> U) -> Outcome<U> {
        match self {
            Outcome::Success {
                document,
                request,
                response,
            } => Outcome::Success {
                document: document.map(f),
                request,
                response,
            },
            Outcome::Failure {
                document,
                request,
                response,
            } => Outcome::Failure {
                document,
                request,
                response,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Headers, HttpMethod};
    use crate::types::ErrorObject;

    fn exchange() -> (HttpRequest, HttpResponse) {
        (
            HttpRequest {
                url: "http://example.com/articles/1".to_string(),
                method: HttpMethod::Delete,
                headers: Headers::new(),
                body: None,
            },
            HttpResponse {
                status: 404,
                headers: Headers::new(),
                body: None,
            },
        )
    }

    #[test]
    fn failure_accessors() {
        let (request, response) = exchange();
        let errors = ErrorDocument {
            errors: vec![ErrorObject {
                status: Some("404".to_string()),
                ..ErrorObject::default()
            }],
            meta: None,
            jsonapi: None,
            links: None,
        };
        let outcome: Outcome<()> = Outcome::Failure {
            document: Some(errors.clone()),
            request,
            response,
        };

        assert!(!outcome.is_success());
        assert_eq!(outcome.response().status, 404);
        assert_eq!(outcome.request().method, HttpMethod::Delete);
        assert!(outcome.document().is_none());
        assert_eq!(outcome.error_document(), Some(&errors));
        assert_eq!(outcome.into_result(), Err(Some(errors)));
    }

    #[test]
    fn map_keeps_the_exchange() {
        let (request, response) = exchange();
        let outcome = Outcome::Success {
            document: Some(2),
            request: request.clone(),
            response: response.clone(),
        };

        let mapped = outcome.map(|n| n * 10);
        assert!(mapped.is_success());
        assert_eq!(mapped.document(), Some(&20));
        assert_eq!(mapped.request(), &request);
        assert_eq!(mapped.into_result(), Ok(Some(20)));
    }
}
