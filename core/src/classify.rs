//! Response classification.
//!
//! # Overview
//! Given the request that was sent and the response that came back, decide
//! whether the operation succeeded and which document, if any, the response
//! carried. Every function here is pure: it reads the exchange, never
//! mutates it, and returns the same `Outcome` for the same input.
//!
//! # Rules
//! 1. A non-blank body must be served as `application/vnd.api+json`
//!    (parameters ignored). Otherwise classification stops with
//!    `ClientError::InvalidMediaType`, whatever the status.
//! 2. The status picks the branch. Each operation accepts its own set of
//!    success statuses; everything else is a failure.
//! 3. A body-bearing success status must carry the expected document shape,
//!    or the exchange falls through to the failure branch.
//! 4. A failure exposes the body only when it is a valid error document.
//!
//! Malformed JSON is never an error: it simply matches no document.

use serde_json::Value;

use crate::document::{ErrorDocument, FetchResourceIndividualResponse, MetaDocument, ResponseDocument};
use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};
use crate::outcome::Outcome;

/// The JSON:API media type.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// True when the response body is blank or served as JSON:API.
pub fn validate_media_type(response: &HttpResponse) -> bool {
    if response.has_blank_body() {
        return true;
    }
    response
        .content_type()
        .is_some_and(|content_type| content_type.starts_with(JSON_API_MEDIA_TYPE))
}

/// Decode the body as JSON; absent, empty or malformed bodies yield `None`.
pub fn parse_body(response: &HttpResponse) -> Option<Value> {
    let body = response.body.as_deref()?;
    serde_json::from_str(body).ok()
}

/// Decode the body as `D`, consulting `D`'s guard first.
pub fn parse_document<D: ResponseDocument>(response: &HttpResponse) -> Option<D> {
    parse_body(response).and_then(|value| D::from_value(&value))
}

fn ensure_media_type(request: HttpRequest, response: HttpResponse) -> Result<(HttpRequest, HttpResponse), ClientError> {
    if validate_media_type(&response) {
        return Ok((request, response));
    }
    tracing::warn!(
        status = response.status,
        content_type = response.content_type().unwrap_or_default(),
        url = %request.url,
        "response is not a JSON:API document"
    );
    Err(ClientError::InvalidMediaType {
        request: Box::new(request),
        response: Box::new(response),
    })
}

fn success<D>(document: Option<D>, request: HttpRequest, response: HttpResponse) -> Outcome<D> {
    tracing::debug!(status = response.status, success = true, "classified response");
    Outcome::Success {
        document,
        request,
        response,
    }
}

/// The shared failure branch: expose the body only if it is an error document.
fn failure<D>(request: HttpRequest, response: HttpResponse) -> Outcome<D> {
    let document = parse_document::<ErrorDocument>(&response);
    tracing::debug!(
        status = response.status,
        success = false,
        error_document = document.is_some(),
        "classified response"
    );
    Outcome::Failure {
        document,
        request,
        response,
    }
}

/// `GET` of any kind: only `200` with a body of shape `D` succeeds.
pub fn classify_fetch<D: ResponseDocument>(
    request: HttpRequest,
    response: HttpResponse,
) -> Result<Outcome<D>, ClientError> {
    let (request, response) = ensure_media_type(request, response)?;
    if response.status == 200 {
        if let Some(document) = parse_document::<D>(&response) {
            return Ok(success(Some(document), request, response));
        }
    }
    Ok(failure(request, response))
}

/// `POST` creating a resource.
///
/// `201` must carry the created resource, `202` means accepted for later
/// processing, and `204` is only acceptable when the request supplied a
/// client-generated id.
pub fn classify_create_resource(
    request: HttpRequest,
    response: HttpResponse,
    client_generated_id: bool,
) -> Result<Outcome<FetchResourceIndividualResponse>, ClientError> {
    let (request, response) = ensure_media_type(request, response)?;
    match response.status {
        201 => {
            if let Some(document) = parse_document(&response) {
                return Ok(success(Some(document), request, response));
            }
        }
        202 => return Ok(success(None, request, response)),
        204 if client_generated_id => return Ok(success(None, request, response)),
        _ => {}
    }
    Ok(failure(request, response))
}

/// `PATCH` of a resource, and every relationship modification.
///
/// `200` must carry a document of shape `D` (which for these operations also
/// admits a meta-only document); `202` and `204` succeed without a document.
pub fn classify_update<D: ResponseDocument>(
    request: HttpRequest,
    response: HttpResponse,
) -> Result<Outcome<D>, ClientError> {
    let (request, response) = ensure_media_type(request, response)?;
    match response.status {
        200 => {
            if let Some(document) = parse_document::<D>(&response) {
                return Ok(success(Some(document), request, response));
            }
        }
        202 | 204 => return Ok(success(None, request, response)),
        _ => {}
    }
    Ok(failure(request, response))
}

/// `DELETE` of a resource: `200` must carry a meta document, `202` and `204`
/// succeed without one.
pub fn classify_delete_resource(
    request: HttpRequest,
    response: HttpResponse,
) -> Result<Outcome<MetaDocument>, ClientError> {
    let (request, response) = ensure_media_type(request, response)?;
    match response.status {
        200 => {
            if let Some(document) = parse_document(&response) {
                return Ok(success(Some(document), request, response));
            }
        }
        202 | 204 => return Ok(success(None, request, response)),
        _ => {}
    }
    Ok(failure(request, response))
}
