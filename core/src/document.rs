//! Top-level JSON:API documents and the typed response shapes.
//!
//! # Design
//! `ResponseDocument` turns a decoded JSON value into a typed document. Every
//! implementation consults its guard before decoding, and union types try
//! their variants in a fixed order, so the narrower expected shape always
//! wins over a structurally ambiguous one:
//!
//! individual resource → resource collection → to-one relationship →
//! to-many relationship, and for update responses the data shape before the
//! meta-only shape.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::guards;
use crate::types::{
    ErrorObject, JsonApiObject, LinksObject, MetaObject, ResourceIdentifierObject, ResourceObject,
};

/// A document the classifier can recognise in a response body.
pub trait ResponseDocument: Sized {
    /// Decode `value` if, and only if, it has this document's shape.
    fn from_value(value: &Value) -> Option<Self>;
}

/// Guard first, then let serde do the decoding.
fn decode<D: DeserializeOwned>(value: &Value, guard: fn(&Value) -> bool) -> Option<D> {
    if !guard(value) {
        return None;
    }
    D::deserialize(value).ok()
}

macro_rules! guarded_document {
    ($($document:ty => $guard:path),+ $(,)?) => {
        $(
            impl ResponseDocument for $document {
                fn from_value(value: &Value) -> Option<Self> {
                    decode(value, $guard)
                }
            }
        )+
    };
}

// ---------------------------------------------------------------------------
// Top-level documents
// ---------------------------------------------------------------------------

/// Primary data of a `DataDocument`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Null,
    Resource(ResourceObject),
    Identifier(ResourceIdentifierObject),
    ResourceCollection(Vec<ResourceObject>),
    IdentifierCollection(Vec<ResourceIdentifierObject>),
}

impl PrimaryData {
    /// An object is read as a resource object whenever it qualifies as one; an
    /// empty array is read as an empty resource collection.
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(PrimaryData::Null);
        }
        if guards::is_resource_object(value) {
            return ResourceObject::deserialize(value).ok().map(PrimaryData::Resource);
        }
        if guards::is_resource_identifier_object(value) {
            return ResourceIdentifierObject::deserialize(value)
                .ok()
                .map(PrimaryData::Identifier);
        }
        let items = value.as_array()?;
        if items.iter().all(guards::is_resource_object) {
            return Vec::<ResourceObject>::deserialize(value)
                .ok()
                .map(PrimaryData::ResourceCollection);
        }
        if items.iter().all(guards::is_resource_identifier_object) {
            return Vec::<ResourceIdentifierObject>::deserialize(value)
                .ok()
                .map(PrimaryData::IdentifierCollection);
        }
        None
    }
}

impl<'de> Deserialize<'de> for PrimaryData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        PrimaryData::from_value(&value)
            .ok_or_else(|| D::Error::custom("data is not a resource, identifier, array of either, or null"))
    }
}

/// A document carrying primary data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDocument {
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
}

/// A document carrying only top-level meta-information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaDocument {
    pub meta: MetaObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
}

/// A document reporting one or more errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
}

/// Any conforming top-level document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Data(DataDocument),
    Meta(MetaDocument),
    Error(ErrorDocument),
}

impl ResponseDocument for Document {
    fn from_value(value: &Value) -> Option<Self> {
        DataDocument::from_value(value)
            .map(Document::Data)
            .or_else(|| MetaDocument::from_value(value).map(Document::Meta))
            .or_else(|| ErrorDocument::from_value(value).map(Document::Error))
    }
}

// ---------------------------------------------------------------------------
// Fetch responses
// ---------------------------------------------------------------------------

/// Response to fetching an individual resource; `data` is `None` when the
/// server answered with `"data": null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResourceIndividualResponse {
    pub data: Option<ResourceObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResourceCollectionResponse {
    pub data: Vec<ResourceObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRelationshipToOneResponse {
    pub data: Option<ResourceIdentifierObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRelationshipToManyResponse {
    pub data: Vec<ResourceIdentifierObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonapi: Option<JsonApiObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
}

guarded_document! {
    DataDocument => guards::is_data_document,
    MetaDocument => guards::is_meta_document,
    ErrorDocument => guards::is_error_document,
    FetchResourceIndividualResponse => guards::is_fetch_resource_individual_response,
    FetchResourceCollectionResponse => guards::is_fetch_resource_collection_response,
    FetchRelationshipToOneResponse => guards::is_fetch_relationship_to_one_response,
    FetchRelationshipToManyResponse => guards::is_fetch_relationship_to_many_response,
}

/// Individual resource or resource collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchResourceResponse {
    Individual(FetchResourceIndividualResponse),
    Collection(FetchResourceCollectionResponse),
}

impl ResponseDocument for FetchResourceResponse {
    fn from_value(value: &Value) -> Option<Self> {
        FetchResourceIndividualResponse::from_value(value)
            .map(FetchResourceResponse::Individual)
            .or_else(|| {
                FetchResourceCollectionResponse::from_value(value).map(FetchResourceResponse::Collection)
            })
    }
}

/// To-one or to-many relationship linkage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchRelationshipResponse {
    ToOne(FetchRelationshipToOneResponse),
    ToMany(FetchRelationshipToManyResponse),
}

impl ResponseDocument for FetchRelationshipResponse {
    fn from_value(value: &Value) -> Option<Self> {
        FetchRelationshipToOneResponse::from_value(value)
            .map(FetchRelationshipResponse::ToOne)
            .or_else(|| {
                FetchRelationshipToManyResponse::from_value(value).map(FetchRelationshipResponse::ToMany)
            })
    }
}

/// Anything a `GET` can return.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchResponse {
    Resource(FetchResourceResponse),
    Relationship(FetchRelationshipResponse),
}

impl ResponseDocument for FetchResponse {
    fn from_value(value: &Value) -> Option<Self> {
        FetchResourceResponse::from_value(value)
            .map(FetchResponse::Resource)
            .or_else(|| FetchRelationshipResponse::from_value(value).map(FetchResponse::Relationship))
    }
}

// ---------------------------------------------------------------------------
// Update responses
// ---------------------------------------------------------------------------

/// A `200 OK` answer to a resource update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpdateResourceResponse {
    Resource(FetchResourceIndividualResponse),
    Meta(MetaDocument),
}

impl ResponseDocument for UpdateResourceResponse {
    fn from_value(value: &Value) -> Option<Self> {
        FetchResourceIndividualResponse::from_value(value)
            .map(UpdateResourceResponse::Resource)
            .or_else(|| MetaDocument::from_value(value).map(UpdateResourceResponse::Meta))
    }
}

/// A `200 OK` answer to a to-one relationship update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpdateRelationshipToOneResponse {
    Relationship(FetchRelationshipToOneResponse),
    Meta(MetaDocument),
}

impl ResponseDocument for UpdateRelationshipToOneResponse {
    fn from_value(value: &Value) -> Option<Self> {
        FetchRelationshipToOneResponse::from_value(value)
            .map(UpdateRelationshipToOneResponse::Relationship)
            .or_else(|| MetaDocument::from_value(value).map(UpdateRelationshipToOneResponse::Meta))
    }
}

/// A `200 OK` answer to a to-many relationship update, addition or removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpdateRelationshipToManyResponse {
    Relationship(FetchRelationshipToManyResponse),
    Meta(MetaDocument),
}

impl ResponseDocument for UpdateRelationshipToManyResponse {
    fn from_value(value: &Value) -> Option<Self> {
        FetchRelationshipToManyResponse::from_value(value)
            .map(UpdateRelationshipToManyResponse::Relationship)
            .or_else(|| MetaDocument::from_value(value).map(UpdateRelationshipToManyResponse::Meta))
    }
}
