//! Structural predicates over decoded JSON.
//!
//! Each `is_*` function answers whether an arbitrary `serde_json::Value` has
//! the shape of one JSON:API member or document. Checks are duck-typed:
//! required members must be present with the right JSON type, optional
//! members are only inspected when present.
//!
//! `is_resource_identifier_object` does not require the absence of
//! `attributes` or `relationships`, so a resource object carrying neither is
//! accepted by both it and `is_resource_object`. Callers that need to tell
//! them apart evaluate the guard for the narrower expected shape first.

use serde_json::{Map, Value};

type Object = Map<String, Value>;

fn optional(object: &Object, key: &str, guard: impl Fn(&Value) -> bool) -> bool {
    object.get(key).map_or(true, guard)
}

fn optional_string(object: &Object, key: &str) -> bool {
    optional(object, key, Value::is_string)
}

fn every(value: &Value, guard: impl Fn(&Value) -> bool) -> bool {
    value.as_array().is_some_and(|items| items.iter().all(guard))
}

fn null_or(value: &Value, guard: impl Fn(&Value) -> bool) -> bool {
    value.is_null() || guard(value)
}

/// `meta`, `jsonapi` and `links`, shared by every top-level document.
fn top_level_members(object: &Object) -> bool {
    optional(object, "meta", is_meta_object)
        && optional(object, "jsonapi", is_json_api_object)
        && optional(object, "links", is_links_object)
}

fn included_members(object: &Object) -> bool {
    optional(object, "included", |included| every(included, is_resource_object))
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

pub fn is_meta_object(value: &Value) -> bool {
    value.is_object()
}

pub fn is_attributes_object(value: &Value) -> bool {
    value.is_object()
}

pub fn is_json_api_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        optional_string(object, "version") && optional(object, "meta", is_meta_object)
    })
}

pub fn is_resource_identifier_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("type").is_some_and(Value::is_string)
            && object.get("id").is_some_and(Value::is_string)
            && optional(object, "meta", is_meta_object)
    })
}

pub fn is_link_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        optional_string(object, "href") && optional(object, "meta", is_meta_object)
    })
}

/// A link is either a URL string or a link object.
pub fn is_link(value: &Value) -> bool {
    value.is_string() || is_link_object(value)
}

/// Every member is a link or `null` (pagination links may be `null`).
pub fn is_links_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.values().all(|link| null_or(link, is_link)))
}

pub fn is_pagination_links(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        ["first", "last", "prev", "next"]
            .iter()
            .all(|key| optional(object, key, |link| null_or(link, is_link)))
    })
}

/// Relationship links must contain `self` or `related`.
pub fn is_relationship_object_links(value: &Value) -> bool {
    is_links_object(value)
        && value.as_object().is_some_and(|object| {
            object.get("self").is_some_and(is_link) || object.get("related").is_some_and(is_link)
        })
}

fn has_relationship_member(object: &Object) -> bool {
    ["links", "data", "meta"].iter().any(|key| object.contains_key(*key))
}

pub fn is_relationship_to_one_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        has_relationship_member(object)
            && optional(object, "links", is_relationship_object_links)
            && optional(object, "data", |data| null_or(data, is_resource_identifier_object))
            && optional(object, "meta", is_meta_object)
    })
}

pub fn is_relationship_to_many_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        has_relationship_member(object)
            && optional(object, "links", |links| {
                is_relationship_object_links(links) && is_pagination_links(links)
            })
            && optional(object, "data", |data| every(data, is_resource_identifier_object))
            && optional(object, "meta", is_meta_object)
    })
}

pub fn is_relationship_object(value: &Value) -> bool {
    is_relationship_to_one_object(value) || is_relationship_to_many_object(value)
}

pub fn is_relationships_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| object.values().all(is_relationship_object))
}

pub fn is_resource_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("id").is_some_and(Value::is_string)
            && object.get("type").is_some_and(Value::is_string)
            && optional(object, "attributes", is_attributes_object)
            && optional(object, "relationships", is_relationships_object)
            && optional(object, "links", is_links_object)
            && optional(object, "meta", is_meta_object)
    })
}

/// Every member of an error object is optional, so `{}` qualifies.
pub fn is_error_object(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        optional(object, "links", |links| {
            links.as_object().is_some_and(|links| {
                optional(links, "about", is_link) && optional(links, "type", is_link)
            })
        }) && optional_string(object, "status")
            && optional_string(object, "code")
            && optional_string(object, "title")
            && optional_string(object, "detail")
            && optional(object, "source", |source| {
                source.as_object().is_some_and(|source| {
                    optional_string(source, "pointer")
                        && optional_string(source, "parameter")
                        && optional_string(source, "header")
                })
            })
            && optional(object, "meta", is_meta_object)
    })
}

// ---------------------------------------------------------------------------
// Top-level documents
// ---------------------------------------------------------------------------

pub fn is_document(value: &Value) -> bool {
    is_data_document(value) || is_meta_document(value) || is_error_document(value)
}

pub fn is_data_document(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("data").is_some_and(|data| {
            data.is_null()
                || is_resource_identifier_object(data)
                || is_resource_object(data)
                || every(data, is_resource_object)
                || every(data, is_resource_identifier_object)
        }) && included_members(object)
            && top_level_members(object)
    })
}

/// Does not check for the absence of `data` or `errors`.
pub fn is_meta_document(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("meta").is_some_and(is_meta_object)
            && optional(object, "jsonapi", is_json_api_object)
            && optional(object, "links", is_links_object)
    })
}

pub fn is_error_document(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("errors").is_some_and(|errors| every(errors, is_error_object))
            && top_level_members(object)
    })
}

// ---------------------------------------------------------------------------
// Fetch responses
// ---------------------------------------------------------------------------

fn fetch_response(value: &Value, data_guard: impl Fn(&Value) -> bool) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("data").is_some_and(data_guard)
            && included_members(object)
            && top_level_members(object)
    })
}

pub fn is_fetch_response(value: &Value) -> bool {
    is_fetch_resource_response(value) || is_fetch_relationship_response(value)
}

pub fn is_fetch_resource_response(value: &Value) -> bool {
    is_fetch_resource_individual_response(value) || is_fetch_resource_collection_response(value)
}

pub fn is_fetch_resource_individual_response(value: &Value) -> bool {
    fetch_response(value, |data| null_or(data, is_resource_object))
}

pub fn is_fetch_resource_collection_response(value: &Value) -> bool {
    fetch_response(value, |data| every(data, is_resource_object))
}

pub fn is_fetch_relationship_response(value: &Value) -> bool {
    is_fetch_relationship_to_one_response(value) || is_fetch_relationship_to_many_response(value)
}

pub fn is_fetch_relationship_to_one_response(value: &Value) -> bool {
    fetch_response(value, |data| null_or(data, is_resource_identifier_object))
}

pub fn is_fetch_relationship_to_many_response(value: &Value) -> bool {
    fetch_response(value, |data| every(data, is_resource_identifier_object))
}

// ---------------------------------------------------------------------------
// Request documents
// ---------------------------------------------------------------------------

pub fn is_create_resource_document(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("data").and_then(Value::as_object).is_some_and(|data| {
            optional_string(data, "id")
                && data.get("type").is_some_and(Value::is_string)
                && optional(data, "attributes", is_attributes_object)
                && optional(data, "relationships", is_relationships_object)
        }) && optional(object, "meta", is_meta_object)
    })
}

pub fn is_update_resource_document(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object.get("data").is_some_and(is_resource_object)
            && optional(object, "meta", is_meta_object)
    })
}

pub fn is_update_relationship_document(value: &Value) -> bool {
    is_update_relationship_to_one_document(value) || is_update_relationship_to_many_document(value)
}

pub fn is_update_relationship_to_one_document(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object
            .get("data")
            .is_some_and(|data| null_or(data, is_resource_identifier_object))
            && optional(object, "meta", is_meta_object)
    })
}

pub fn is_update_relationship_to_many_document(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        object
            .get("data")
            .is_some_and(|data| every(data, is_resource_identifier_object))
            && optional(object, "meta", is_meta_object)
    })
}

// ---------------------------------------------------------------------------
// Update responses (a missing body is represented as `null`)
// ---------------------------------------------------------------------------

pub fn is_update_resource_response(value: &Value) -> bool {
    value.is_null() || is_fetch_resource_individual_response(value) || is_meta_document(value)
}

pub fn is_update_relationship_response(value: &Value) -> bool {
    is_update_relationship_to_one_response(value) || is_update_relationship_to_many_response(value)
}

pub fn is_update_relationship_to_one_response(value: &Value) -> bool {
    value.is_null() || is_meta_document(value) || is_fetch_relationship_to_one_response(value)
}

pub fn is_update_relationship_to_many_response(value: &Value) -> bool {
    value.is_null() || is_meta_document(value) || is_fetch_relationship_to_many_response(value)
}
