use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub id: String,
    pub name: String,
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of POST, PUT and PATCH. POST and PUT treat absent fields as empty,
/// PATCH leaves them unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ObjectInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

/// Insertion-ordered store.
pub type Db = Arc<RwLock<Vec<StoredObject>>>;

type HandlerError = (StatusCode, Json<Value>);

pub fn app() -> Router {
    routes().with_state(Db::default())
}

/// Like [`app`], but every non-OPTIONS request must carry
/// `Authorization: Bearer <api_key>`.
pub fn app_with_api_key(api_key: impl Into<String>) -> Router {
    let api_key: Arc<str> = Arc::from(api_key.into());
    routes()
        .layer(middleware::from_fn_with_state(api_key, require_bearer))
        .with_state(Db::default())
}

fn routes() -> Router<Db> {
    Router::new()
        .route("/", get(root))
        .route(
            "/objects",
            get(list_objects).post(create_object).options(options),
        )
        .route(
            "/objects/{id}",
            get(get_object)
                .put(update_object)
                .patch(patch_object)
                .delete(delete_object)
                .options(options),
        )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "objects service listening");
    }
    axum::serve(listener, app).await
}

async fn require_bearer(
    State(api_key): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || has_bearer(request.headers(), &api_key) {
        return next.run(request).await;
    }
    tracing::warn!(method = %request.method(), uri = %request.uri(), "rejected unauthenticated request");
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Missing or invalid API key."})),
    )
        .into_response()
}

fn has_bearer(headers: &HeaderMap, api_key: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == api_key)
}

fn not_found(id: &str) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("Object with id={id} was not found.")})),
    )
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Welcome to the API"}))
}

async fn list_objects(State(db): State<Db>) -> Json<Vec<StoredObject>> {
    let objects = db.read().await;
    Json(objects.clone())
}

async fn create_object(
    State(db): State<Db>,
    Json(input): Json<ObjectInput>,
) -> Json<StoredObject> {
    let object = StoredObject {
        id: Uuid::new_v4().simple().to_string(),
        name: input.name.unwrap_or_default(),
        data: input.data,
        created_at: Some(Utc::now()),
        updated_at: None,
    };
    tracing::info!(id = %object.id, "created object");
    db.write().await.push(object.clone());
    Json(object)
}

async fn get_object(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<StoredObject>, HandlerError> {
    let objects = db.read().await;
    objects
        .iter()
        .find(|o| o.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

async fn update_object(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<ObjectInput>,
) -> Result<Json<StoredObject>, HandlerError> {
    let mut objects = db.write().await;
    let object = objects
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or_else(|| not_found(&id))?;
    object.name = input.name.unwrap_or_default();
    object.data = input.data;
    object.updated_at = Some(Utc::now());
    Ok(Json(object.clone()))
}

async fn patch_object(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<ObjectInput>,
) -> Result<Json<StoredObject>, HandlerError> {
    let mut objects = db.write().await;
    let object = objects
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or_else(|| not_found(&id))?;
    if let Some(name) = input.name {
        object.name = name;
    }
    if let Some(data) = input.data {
        object.data = Some(data);
    }
    object.updated_at = Some(Utc::now());
    Ok(Json(object.clone()))
}

async fn delete_object(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Value>, HandlerError> {
    let mut objects = db.write().await;
    let index = objects
        .iter()
        .position(|o| o.id == id)
        .ok_or_else(|| not_found(&id))?;
    objects.remove(index);
    tracing::info!(%id, "deleted object");
    Ok(Json(
        json!({"message": format!("Object with id = {id} has been deleted.")}),
    ))
}

async fn options() -> impl IntoResponse {
    let allow = HeaderValue::from_static(ALLOWED_METHODS);
    (
        StatusCode::OK,
        [
            (header::ALLOW, allow.clone()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
            (header::ACCESS_CONTROL_ALLOW_METHODS, allow),
            (
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static("Content-Type, Authorization"),
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_object_serializes_camel_case_timestamps() {
        let object = StoredObject {
            id: "abc".to_string(),
            name: "Test".to_string(),
            data: None,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let json = serde_json::to_value(&object).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["data"], Value::Null);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn object_input_all_fields_optional() {
        let input: ObjectInput = serde_json::from_str(r#"{}"#).unwrap();
        assert!(input.name.is_none());
        assert!(input.data.is_none());
    }

    #[test]
    fn object_input_keeps_nested_data() {
        let input: ObjectInput =
            serde_json::from_str(r#"{"name":"x","data":{"year":2019,"price":1849.99}}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("x"));
        assert_eq!(input.data.unwrap()["price"], 1849.99);
    }

    #[test]
    fn object_input_rejects_wrong_types() {
        let result: Result<ObjectInput, _> = serde_json::from_str(r#"{"name":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn bearer_check_requires_exact_token() {
        let mut headers = HeaderMap::new();
        assert!(!has_bearer(&headers, "k"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert!(!has_bearer(&headers, "k"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer k"));
        assert!(has_bearer(&headers, "k"));
    }
}
