//! JSON:API document members and request documents.
//!
//! # Design
//! Members are plain serde structs that mirror the JSON:API format. Incoming
//! JSON is never decoded into these types directly: the matching guard in
//! `guards` is consulted first, so a successful decode only ever happens on
//! input whose shape has already been vetted. Unknown members are ignored.
//!
//! Free-form objects (`meta`, `attributes`) stay as `serde_json::Map` since
//! their contents are application-defined.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Non-standard meta-information.
pub type MetaObject = Map<String, Value>;

/// Resource attributes.
pub type AttributesObject = Map<String, Value>;

/// Link name to link; pagination links may be `null`.
pub type LinksObject = BTreeMap<String, Option<Link>>;

/// Relationship name to relationship object.
pub type RelationshipsObject = BTreeMap<String, RelationshipObject>;

/// Keeps an explicit `null` distinct from an absent member: with
/// `#[serde(default)]` a missing member stays `None` while a present one,
/// `null` included, is handed to `T`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Information about the server's implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonApiObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

/// A link as a bare URL or as an object with `href` and `meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Link {
    Url(String),
    Object(LinkObject),
}

impl Link {
    pub fn href(&self) -> Option<&str> {
        match self {
            Link::Url(url) => Some(url),
            Link::Object(object) => object.href.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

/// Identifies an individual resource without carrying its representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifierObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

impl ResourceIdentifierObject {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            meta: None,
        }
    }
}

/// Resource linkage of a relationship: to-one (possibly empty) or to-many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceLinkage {
    ToMany(Vec<ResourceIdentifierObject>),
    ToOne(Option<ResourceIdentifierObject>),
}

/// A named reference from one resource to others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub data: Option<ResourceLinkage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

impl RelationshipObject {
    pub fn to_one(data: Option<ResourceIdentifierObject>) -> Self {
        Self {
            data: Some(ResourceLinkage::ToOne(data)),
            ..Self::default()
        }
    }

    pub fn to_many(data: Vec<ResourceIdentifierObject>) -> Self {
        Self {
            data: Some(ResourceLinkage::ToMany(data)),
            ..Self::default()
        }
    }
}

/// Full representation of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributesObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<RelationshipsObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

impl ResourceObject {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            attributes: None,
            relationships: None,
            links: None,
            meta: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_relationship(mut self, name: impl Into<String>, relationship: RelationshipObject) -> Self {
        self.relationships
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), relationship);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.as_ref()?.get(name)
    }

    pub fn identifier(&self) -> ResourceIdentifierObject {
        ResourceIdentifierObject::new(self.kind.clone(), self.id.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<Link>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Link>,
}

/// Which part of the request caused the error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
}

/// A problem encountered while performing an operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ErrorLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

// ---------------------------------------------------------------------------
// Request documents
// ---------------------------------------------------------------------------

/// Resource object submitted for creation; `id` is set only when the client
/// generates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResourceObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AttributesObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<RelationshipsObject>,
}

impl NewResourceObject {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            attributes: None,
            relationships: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Assign a random UUID v4 as the client-generated id.
    pub fn with_generated_id(self) -> Self {
        self.with_id(Uuid::new_v4().to_string())
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_relationship(mut self, name: impl Into<String>, relationship: RelationshipObject) -> Self {
        self.relationships
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), relationship);
        self
    }
}

/// Body of a `POST` that creates a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResourceDocument {
    pub data: NewResourceObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

impl CreateResourceDocument {
    pub fn new(data: NewResourceObject) -> Self {
        Self { data, meta: None }
    }

    /// True when the document carries a non-empty client-generated id.
    pub fn has_client_generated_id(&self) -> bool {
        self.data.id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Body of a `PATCH` that updates a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResourceDocument {
    pub data: ResourceObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

impl UpdateResourceDocument {
    pub fn new(data: ResourceObject) -> Self {
        Self { data, meta: None }
    }
}

/// Body of a `PATCH` that replaces a to-one relationship; `None` clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRelationshipToOneDocument {
    pub data: Option<ResourceIdentifierObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

impl UpdateRelationshipToOneDocument {
    pub fn new(data: Option<ResourceIdentifierObject>) -> Self {
        Self { data, meta: None }
    }
}

/// Body of a `POST`, `PATCH` or `DELETE` against a to-many relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRelationshipToManyDocument {
    pub data: Vec<ResourceIdentifierObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaObject>,
}

impl UpdateRelationshipToManyDocument {
    pub fn new(data: Vec<ResourceIdentifierObject>) -> Self {
        Self { data, meta: None }
    }
}
