//! Client core for JSON:API servers.
//!
//! # Overview
//! `JsonApiClient` builds JSON:API requests, hands them to a pluggable
//! `Transport`, and classifies each response into an `Outcome`: a success
//! carrying the document the operation expects, or a failure carrying the
//! server's error document. Both variants keep the raw exchange.
//!
//! # Design
//! - The client is stateless apart from its transport and default headers.
//! - Request building (`JsonApiClient::build_*`) and response classification
//!   (`classify::*`) are pure functions over `HttpRequest` / `HttpResponse`,
//!   so the host can also run the HTTP round-trip itself.
//! - Response documents are checked structurally by `guards` before serde
//!   decodes them; a body that fails the check never becomes a typed value.
//! - Only transport faults, wrong media types and request serialization
//!   errors are `Err`. Error statuses are `Outcome::Failure`.
//! - The `ureq` feature (on by default) provides `UreqTransport`.

pub mod classify;
pub mod client;
pub mod document;
pub mod error;
pub mod guards;
pub mod http;
pub mod outcome;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use classify::JSON_API_MEDIA_TYPE;
pub use client::JsonApiClient;
pub use document::{
    DataDocument, Document, ErrorDocument, FetchRelationshipResponse, FetchRelationshipToManyResponse,
    FetchRelationshipToOneResponse, FetchResourceCollectionResponse, FetchResourceIndividualResponse,
    FetchResourceResponse, FetchResponse, MetaDocument, PrimaryData, ResponseDocument,
    UpdateRelationshipToManyResponse, UpdateRelationshipToOneResponse, UpdateResourceResponse,
};
pub use error::ClientError;
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use outcome::Outcome;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{
    CreateResourceDocument, ErrorObject, NewResourceObject, RelationshipObject, ResourceIdentifierObject,
    ResourceLinkage, ResourceObject, UpdateRelationshipToManyDocument, UpdateRelationshipToOneDocument,
    UpdateResourceDocument,
};
