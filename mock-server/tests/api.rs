use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mock_server::{app, JSON_API_MEDIA_TYPE};
use serde_json::{json, Value};
use tower::ServiceExt;

struct Reply {
    status: StatusCode,
    content_type: Option<String>,
    body: Option<Value>,
}

/// Drive one request through a clone of `app`; clones share the store.
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(http::header::CONTENT_TYPE, JSON_API_MEDIA_TYPE);
    }
    let request = builder
        .body(body.map(|body| body.to_string()).unwrap_or_default())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = (!bytes.is_empty()).then(|| serde_json::from_slice(&bytes).unwrap());

    Reply {
        status,
        content_type,
        body,
    }
}

fn new_article(title: &str) -> Value {
    json!({ "data": { "type": "articles", "attributes": { "title": title } } })
}

async fn create(app: &Router, title: &str) -> String {
    let reply = send(app, "POST", "/articles", Some(new_article(title))).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body.unwrap()["data"]["id"].as_str().unwrap().to_string()
}

// --- list ---

#[tokio::test]
async fn list_articles_empty() {
    let reply = send(&app(), "GET", "/articles", None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.content_type.as_deref(), Some(JSON_API_MEDIA_TYPE));
    assert_eq!(reply.body.unwrap(), json!({ "data": [], "meta": { "total": 0 } }));
}

// --- create ---

#[tokio::test]
async fn create_article_returns_201_with_resource() {
    let reply = send(&app(), "POST", "/articles", Some(new_article("Rails is Omakase"))).await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.content_type.as_deref(), Some(JSON_API_MEDIA_TYPE));
    let data = &reply.body.unwrap()["data"];
    assert_eq!(data["type"], "articles");
    assert!(!data["id"].as_str().unwrap().is_empty());
    assert_eq!(data["attributes"]["title"], "Rails is Omakase");
    assert_eq!(data["relationships"]["author"]["data"], Value::Null);
}

#[tokio::test]
async fn create_article_with_client_id_returns_204() {
    let app = app();
    let document = json!({ "data": { "type": "articles", "id": "fixed", "attributes": { "title": "Mine" } } });

    let reply = send(&app, "POST", "/articles", Some(document.clone())).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    assert!(reply.body.is_none());

    let reply = send(&app, "GET", "/articles/fixed", None).await;
    assert_eq!(reply.body.unwrap()["data"]["attributes"]["title"], "Mine");

    let reply = send(&app, "POST", "/articles", Some(document)).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn create_wrong_type_returns_409_error_document() {
    let document = json!({ "data": { "type": "people" } });
    let reply = send(&app(), "POST", "/articles", Some(document)).await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.content_type.as_deref(), Some(JSON_API_MEDIA_TYPE));
    assert_eq!(reply.body.unwrap()["errors"][0]["status"], "409");
}

#[tokio::test]
async fn create_malformed_document_returns_error_document() {
    let reply = send(&app(), "POST", "/articles", Some(json!({ "data": 1 }))).await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(reply.body.unwrap()["errors"][0]["detail"].is_string());
}

// --- individual resources ---

#[tokio::test]
async fn get_article_not_found() {
    let reply = send(&app(), "GET", "/articles/missing", None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    let body = reply.body.unwrap();
    assert_eq!(body["errors"][0]["status"], "404");
    assert_eq!(body["errors"][0]["title"], "Not Found");
}

#[tokio::test]
async fn update_article_merges_attributes() {
    let app = app();
    let id = create(&app, "Draft").await;
    send(
        &app,
        "PATCH",
        &format!("/articles/{id}"),
        Some(json!({ "data": { "type": "articles", "id": id, "attributes": { "body": "Text" } } })),
    )
    .await;

    let reply = send(&app, "GET", &format!("/articles/{id}"), None).await;
    let attributes = &reply.body.unwrap()["data"]["attributes"];
    assert_eq!(attributes["title"], "Draft");
    assert_eq!(attributes["body"], "Text");
}

#[tokio::test]
async fn update_article_id_mismatch_returns_409() {
    let app = app();
    let id = create(&app, "Draft").await;
    let reply = send(
        &app,
        "PATCH",
        &format!("/articles/{id}"),
        Some(json!({ "data": { "type": "articles", "id": "other" } })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_article_returns_meta() {
    let app = app();
    let id = create(&app, "Short lived").await;

    let reply = send(&app, "DELETE", &format!("/articles/{id}"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.unwrap(), json!({ "meta": { "deleted": id } }));

    let reply = send(&app, "DELETE", &format!("/articles/{id}"), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

// --- relationships ---

#[tokio::test]
async fn author_relationship_roundtrip() {
    let app = app();
    let id = create(&app, "Owned").await;
    let url = format!("/articles/{id}/relationships/author");

    let reply = send(&app, "GET", &url, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.unwrap()["data"], Value::Null);

    let author = json!({ "type": "people", "id": "9" });
    let reply = send(&app, "PATCH", &url, Some(json!({ "data": author }))).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let reply = send(&app, "GET", &url, None).await;
    let body = reply.body.unwrap();
    assert_eq!(body["data"], author);
    assert_eq!(body["links"]["self"], url);
}

#[tokio::test]
async fn tags_relationship_add_replace_remove() {
    let app = app();
    let id = create(&app, "Tagged").await;
    let url = format!("/articles/{id}/relationships/tags");
    let tag = |id: &str| json!({ "type": "tags", "id": id });

    let reply = send(&app, "POST", &url, Some(json!({ "data": [tag("1"), tag("2")] }))).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);
    // Adding an existing member is a no-op.
    send(&app, "POST", &url, Some(json!({ "data": [tag("2")] }))).await;

    let reply = send(&app, "GET", &url, None).await;
    assert_eq!(reply.body.unwrap()["data"], json!([tag("1"), tag("2")]));

    let reply = send(&app, "PATCH", &url, Some(json!({ "data": [tag("3"), tag("4")] }))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.unwrap()["data"], json!([tag("3"), tag("4")]));

    let reply = send(&app, "DELETE", &url, Some(json!({ "data": [tag("3"), tag("9")] }))).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.unwrap(), json!({ "meta": { "removed": 1 } }));

    let reply = send(&app, "GET", &url, None).await;
    assert_eq!(reply.body.unwrap()["data"], json!([tag("4")]));
}

#[tokio::test]
async fn relationship_of_missing_article_returns_404() {
    let reply = send(&app(), "GET", "/articles/missing/relationships/tags", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

// --- other media types ---

#[tokio::test]
async fn health_is_plain_text() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[http::header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}
