//! JSON:API client: request building and operation orchestration.
//!
//! # Design
//! `JsonApiClient` holds a `Transport` and a map of default headers, and
//! nothing else; it is safe to share between threads whenever the transport
//! is. Each operation runs the same fixed sequence:
//!
//! build request → send → validate media type → branch on status →
//! classify body → `Outcome`.
//!
//! Building (`build_*`) and classifying (`classify::*`) are pure, so callers
//! who would rather run the HTTP round-trip themselves can use those two
//! halves directly and skip `Transport` entirely.

use serde::Serialize;

use crate::classify::{self, JSON_API_MEDIA_TYPE};
use crate::document::{
    FetchRelationshipResponse, FetchRelationshipToManyResponse, FetchRelationshipToOneResponse,
    FetchResourceCollectionResponse, FetchResourceIndividualResponse, FetchResourceResponse, FetchResponse,
    MetaDocument, ResponseDocument, UpdateRelationshipToManyResponse, UpdateRelationshipToOneResponse,
    UpdateResourceResponse,
};
use crate::error::ClientError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::outcome::Outcome;
use crate::types::{
    CreateResourceDocument, UpdateRelationshipToManyDocument, UpdateRelationshipToOneDocument,
    UpdateResourceDocument,
};

/// Client for a JSON:API server reached through `T`.
#[derive(Debug, Clone)]
pub struct JsonApiClient<T> {
    transport: T,
    default_headers: Headers,
}

impl<T> JsonApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            default_headers: Headers::new(),
        }
    }

    /// Replace the headers sent with every request.
    pub fn with_default_headers(mut self, headers: Headers) -> Self {
        self.default_headers = headers;
        self
    }

    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET` with no body.
    pub fn build_fetch(&self, url: &str) -> HttpRequest {
        self.build_request(HttpMethod::Get, url, None)
    }

    /// `POST` of a creation document.
    pub fn build_create_resource(
        &self,
        url: &str,
        document: &CreateResourceDocument,
    ) -> Result<HttpRequest, ClientError> {
        self.build_write(HttpMethod::Post, url, document)
    }

    /// `PATCH` of a resource.
    pub fn build_update_resource(
        &self,
        url: &str,
        document: &UpdateResourceDocument,
    ) -> Result<HttpRequest, ClientError> {
        self.build_write(HttpMethod::Patch, url, document)
    }

    /// `PATCH` of a to-one relationship.
    pub fn build_update_relationship_to_one(
        &self,
        url: &str,
        document: &UpdateRelationshipToOneDocument,
    ) -> Result<HttpRequest, ClientError> {
        self.build_write(HttpMethod::Patch, url, document)
    }

    /// A to-many relationship modification: `POST` adds members, `PATCH`
    /// replaces them, `DELETE` removes them.
    pub fn build_relationship_to_many(
        &self,
        method: HttpMethod,
        url: &str,
        document: &UpdateRelationshipToManyDocument,
    ) -> Result<HttpRequest, ClientError> {
        self.build_write(method, url, document)
    }

    /// `DELETE` of a resource, with no body.
    pub fn build_delete_resource(&self, url: &str) -> HttpRequest {
        self.build_request(HttpMethod::Delete, url, None)
    }

    fn build_write<D: Serialize>(
        &self,
        method: HttpMethod,
        url: &str,
        document: &D,
    ) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(document)?;
        Ok(self.build_request(method, url, Some(body)))
    }

    /// Default headers first, then the operation's own headers, which replace
    /// any default of the same name in any letter case. Only requests with a
    /// body declare a `Content-Type`.
    fn build_request(&self, method: HttpMethod, url: &str, body: Option<String>) -> HttpRequest {
        let mut headers = self.default_headers.clone();
        set_header(&mut headers, "Accept", JSON_API_MEDIA_TYPE);
        if body.is_some() {
            set_header(&mut headers, "Content-Type", JSON_API_MEDIA_TYPE);
        }
        HttpRequest {
            url: url.to_string(),
            method,
            headers,
            body,
        }
    }
}

fn set_header(headers: &mut Headers, name: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

impl<T: Transport> JsonApiClient<T> {
    /// Fetch an individual resource, a resource collection, or either kind of
    /// relationship.
    pub fn fetch(&self, url: &str) -> Result<Outcome<FetchResponse>, ClientError> {
        self.fetch_as(url)
    }

    /// Fetch an individual resource or a resource collection.
    pub fn fetch_resource(&self, url: &str) -> Result<Outcome<FetchResourceResponse>, ClientError> {
        self.fetch_as(url)
    }

    pub fn fetch_resource_individual(
        &self,
        url: &str,
    ) -> Result<Outcome<FetchResourceIndividualResponse>, ClientError> {
        self.fetch_as(url)
    }

    pub fn fetch_resource_collection(
        &self,
        url: &str,
    ) -> Result<Outcome<FetchResourceCollectionResponse>, ClientError> {
        self.fetch_as(url)
    }

    /// Fetch a to-one or to-many relationship.
    pub fn fetch_relationship(&self, url: &str) -> Result<Outcome<FetchRelationshipResponse>, ClientError> {
        self.fetch_as(url)
    }

    pub fn fetch_relationship_to_one(
        &self,
        url: &str,
    ) -> Result<Outcome<FetchRelationshipToOneResponse>, ClientError> {
        self.fetch_as(url)
    }

    pub fn fetch_relationship_to_many(
        &self,
        url: &str,
    ) -> Result<Outcome<FetchRelationshipToManyResponse>, ClientError> {
        self.fetch_as(url)
    }

    /// Create a resource. A `204 No Content` answer counts as success only
    /// when `document` carries a client-generated id.
    pub fn create_resource(
        &self,
        url: &str,
        document: &CreateResourceDocument,
    ) -> Result<Outcome<FetchResourceIndividualResponse>, ClientError> {
        let request = self.build_create_resource(url, document)?;
        let response = self.send(&request)?;
        classify::classify_create_resource(request, response, document.has_client_generated_id())
    }

    /// Add members to a to-many relationship.
    pub fn create_relationship_to_many(
        &self,
        url: &str,
        document: &UpdateRelationshipToManyDocument,
    ) -> Result<Outcome<UpdateRelationshipToManyResponse>, ClientError> {
        self.modify_relationship_to_many(HttpMethod::Post, url, document)
    }

    pub fn update_resource(
        &self,
        url: &str,
        document: &UpdateResourceDocument,
    ) -> Result<Outcome<UpdateResourceResponse>, ClientError> {
        let request = self.build_update_resource(url, document)?;
        let response = self.send(&request)?;
        classify::classify_update(request, response)
    }

    /// Replace (or clear, with `data: None`) a to-one relationship.
    pub fn update_relationship_to_one(
        &self,
        url: &str,
        document: &UpdateRelationshipToOneDocument,
    ) -> Result<Outcome<UpdateRelationshipToOneResponse>, ClientError> {
        let request = self.build_update_relationship_to_one(url, document)?;
        let response = self.send(&request)?;
        classify::classify_update(request, response)
    }

    /// Replace every member of a to-many relationship.
    pub fn update_relationship_to_many(
        &self,
        url: &str,
        document: &UpdateRelationshipToManyDocument,
    ) -> Result<Outcome<UpdateRelationshipToManyResponse>, ClientError> {
        self.modify_relationship_to_many(HttpMethod::Patch, url, document)
    }

    pub fn delete_resource(&self, url: &str) -> Result<Outcome<MetaDocument>, ClientError> {
        let request = self.build_delete_resource(url);
        let response = self.send(&request)?;
        classify::classify_delete_resource(request, response)
    }

    /// Remove members from a to-many relationship.
    pub fn delete_relationship_to_many(
        &self,
        url: &str,
        document: &UpdateRelationshipToManyDocument,
    ) -> Result<Outcome<UpdateRelationshipToManyResponse>, ClientError> {
        self.modify_relationship_to_many(HttpMethod::Delete, url, document)
    }

    fn fetch_as<D: ResponseDocument>(&self, url: &str) -> Result<Outcome<D>, ClientError> {
        let request = self.build_fetch(url);
        let response = self.send(&request)?;
        classify::classify_fetch(request, response)
    }

    fn modify_relationship_to_many(
        &self,
        method: HttpMethod,
        url: &str,
        document: &UpdateRelationshipToManyDocument,
    ) -> Result<Outcome<UpdateRelationshipToManyResponse>, ClientError> {
        let request = self.build_relationship_to_many(method, url, document)?;
        let response = self.send(&request)?;
        classify::classify_update(request, response)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ClientError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending JSON:API request");
        self.transport.send(request).map_err(ClientError::Transport)
    }
}
