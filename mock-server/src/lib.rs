use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

const ARTICLES: &str = "articles";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

/// Stored state of one article.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Article {
    pub id: String,
    pub attributes: Map<String, Value>,
    pub author: Option<Identifier>,
    pub tags: Vec<Identifier>,
}

impl Article {
    fn to_resource(&self) -> Value {
        json!({
            "type": ARTICLES,
            "id": self.id,
            "attributes": self.attributes,
            "relationships": {
                "author": {
                    "links": self.relationship_links("author"),
                    "data": self.author,
                },
                "tags": {
                    "links": self.relationship_links("tags"),
                    "data": self.tags,
                },
            },
            "links": { "self": format!("/articles/{}", self.id) },
        })
    }

    fn relationship_links(&self, name: &str) -> Value {
        json!({
            "self": format!("/articles/{}/relationships/{name}", self.id),
            "related": format!("/articles/{}/{name}", self.id),
        })
    }

    fn apply(&mut self, relationships: ArticleRelationships) {
        if let Some(author) = relationships.author {
            self.author = author.data;
        }
        if let Some(tags) = relationships.tags {
            self.tags = tags.data;
        }
    }
}

// --- request documents ---

#[derive(Deserialize)]
pub struct Document<T> {
    pub data: T,
}

#[derive(Deserialize)]
pub struct NewArticle {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: ArticleRelationships,
}

#[derive(Deserialize)]
pub struct ArticlePatch {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: ArticleRelationships,
}

#[derive(Default, Deserialize)]
pub struct ArticleRelationships {
    pub author: Option<ToOne>,
    pub tags: Option<ToMany>,
}

#[derive(Deserialize)]
pub struct ToOne {
    pub data: Option<Identifier>,
}

#[derive(Deserialize)]
pub struct ToMany {
    pub data: Vec<Identifier>,
}

// --- responses ---

/// A JSON body served as `application/vnd.api+json`.
pub struct JsonApi<T>(pub StatusCode, pub T);

impl<T: Serialize> IntoResponse for JsonApi<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.1) {
            Ok(bytes) => (self.0, [(header::CONTENT_TYPE, JSON_API_MEDIA_TYPE)], bytes).into_response(),
            Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
        }
    }
}

/// Answered as a single-error JSON:API error document.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    title: &'static str,
    detail: String,
}

impl ApiError {
    fn not_found(id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            title: "Not Found",
            detail: format!("no article with id {id}"),
        }
    }

    fn conflict(detail: String) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            title: "Conflict",
            detail,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            title: "Invalid Document",
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(status = %self.status, detail = %self.detail, "request rejected");
        let document = json!({
            "errors": [{
                "status": self.status.as_str(),
                "title": self.title,
                "detail": self.detail,
            }]
        });
        JsonApi(self.status, document).into_response()
    }
}

pub type Db = Arc<RwLock<BTreeMap<String, Article>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(BTreeMap::new()));
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route(
            "/articles/{id}",
            get(get_article).patch(update_article).delete(delete_article),
        )
        .route(
            "/articles/{id}/relationships/author",
            get(get_author).patch(update_author),
        )
        .route(
            "/articles/{id}/relationships/tags",
            get(get_tags).post(add_tags).patch(replace_tags).delete(remove_tags),
        )
        .route("/health", get(health))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn health() -> &'static str {
    "ok"
}

async fn list_articles(State(db): State<Db>) -> JsonApi<Value> {
    let articles = db.read().await;
    let data: Vec<Value> = articles.values().map(Article::to_resource).collect();
    JsonApi(
        StatusCode::OK,
        json!({ "data": data, "meta": { "total": articles.len() } }),
    )
}

async fn create_article(
    State(db): State<Db>,
    input: Result<Json<Document<NewArticle>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(Document { data: input }) = input?;
    if input.kind != ARTICLES {
        return Err(ApiError::conflict(format!("cannot create resources of type {}", input.kind)));
    }

    let mut articles = db.write().await;
    let client_generated = input.id.is_some();
    let id = input.id.unwrap_or_else(|| Uuid::new_v4().to_string());
    if articles.contains_key(&id) {
        return Err(ApiError::conflict(format!("article {id} already exists")));
    }

    let mut article = Article {
        id: id.clone(),
        attributes: input.attributes,
        ..Article::default()
    };
    article.apply(input.relationships);
    let resource = article.to_resource();
    articles.insert(id.clone(), article);
    tracing::info!(%id, client_generated, "article created");

    // Client-chosen ids are answered without a body.
    if client_generated {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(JsonApi(StatusCode::CREATED, json!({ "data": resource })).into_response())
}

async fn get_article(State(db): State<Db>, Path(id): Path<String>) -> Result<JsonApi<Value>, ApiError> {
    let articles = db.read().await;
    let article = articles.get(&id).ok_or_else(|| ApiError::not_found(&id))?;
    Ok(JsonApi(StatusCode::OK, json!({ "data": article.to_resource() })))
}

async fn update_article(
    State(db): State<Db>,
    Path(id): Path<String>,
    input: Result<Json<Document<ArticlePatch>>, JsonRejection>,
) -> Result<JsonApi<Value>, ApiError> {
    let Json(Document { data: input }) = input?;
    if input.kind != ARTICLES || input.id != id {
        return Err(ApiError::conflict(format!(
            "document identifies {}/{} but the URL names articles/{id}",
            input.kind, input.id
        )));
    }

    let mut articles = db.write().await;
    let article = articles.get_mut(&id).ok_or_else(|| ApiError::not_found(&id))?;
    article.attributes.extend(input.attributes);
    article.apply(input.relationships);
    Ok(JsonApi(StatusCode::OK, json!({ "data": article.to_resource() })))
}

async fn delete_article(State(db): State<Db>, Path(id): Path<String>) -> Result<JsonApi<Value>, ApiError> {
    let mut articles = db.write().await;
    articles.remove(&id).ok_or_else(|| ApiError::not_found(&id))?;
    tracing::info!(%id, "article deleted");
    Ok(JsonApi(StatusCode::OK, json!({ "meta": { "deleted": id } })))
}

async fn get_author(State(db): State<Db>, Path(id): Path<String>) -> Result<JsonApi<Value>, ApiError> {
    let articles = db.read().await;
    let article = articles.get(&id).ok_or_else(|| ApiError::not_found(&id))?;
    Ok(JsonApi(
        StatusCode::OK,
        json!({ "data": article.author, "links": article.relationship_links("author") }),
    ))
}

async fn update_author(
    State(db): State<Db>,
    Path(id): Path<String>,
    input: Result<Json<ToOne>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(input) = input?;
    let mut articles = db.write().await;
    let article = articles.get_mut(&id).ok_or_else(|| ApiError::not_found(&id))?;
    article.author = input.data;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_tags(State(db): State<Db>, Path(id): Path<String>) -> Result<JsonApi<Value>, ApiError> {
    let articles = db.read().await;
    let article = articles.get(&id).ok_or_else(|| ApiError::not_found(&id))?;
    Ok(JsonApi(
        StatusCode::OK,
        json!({ "data": article.tags, "links": article.relationship_links("tags") }),
    ))
}

async fn add_tags(
    State(db): State<Db>,
    Path(id): Path<String>,
    input: Result<Json<ToMany>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(input) = input?;
    let mut articles = db.write().await;
    let article = articles.get_mut(&id).ok_or_else(|| ApiError::not_found(&id))?;
    for tag in input.data {
        if !article.tags.contains(&tag) {
            article.tags.push(tag);
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn replace_tags(
    State(db): State<Db>,
    Path(id): Path<String>,
    input: Result<Json<ToMany>, JsonRejection>,
) -> Result<JsonApi<Value>, ApiError> {
    let Json(input) = input?;
    let mut articles = db.write().await;
    let article = articles.get_mut(&id).ok_or_else(|| ApiError::not_found(&id))?;
    article.tags = input.data;
    Ok(JsonApi(StatusCode::OK, json!({ "data": article.tags })))
}

async fn remove_tags(
    State(db): State<Db>,
    Path(id): Path<String>,
    input: Result<Json<ToMany>, JsonRejection>,
) -> Result<JsonApi<Value>, ApiError> {
    let Json(input) = input?;
    let mut articles = db.write().await;
    let article = articles.get_mut(&id).ok_or_else(|| ApiError::not_found(&id))?;
    let before = article.tags.len();
    article.tags.retain(|tag| !input.data.contains(tag));
    Ok(JsonApi(
        StatusCode::OK,
        json!({ "meta": { "removed": before - article.tags.len() } }),
    ))
}
