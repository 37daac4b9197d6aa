//! User record HTTP handlers
//!
//! Single create/update accept either `multipart/form-data` (field parts
//! arrive as strings, the `profilePhoto` file part becomes the upload) or a
//! plain JSON object (no upload possible). Bulk routes are JSON only. The
//! handlers assemble a raw field map plus an optional upload and hand both
//! to the service; all decision logic lives there.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use serde_json::{json, Value};

use crate::assets::AssetUpload;
use crate::error::{Result, ServiceError};
use crate::service::FieldMap;
use crate::AppState;

/// Field part name carrying the profile photo file
const PHOTO_FIELD: &str = "profilePhoto";

/// Request body size cap (covers the photo bytes)
pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let user = state.users.get(&id).await?;
    Ok(Json(json!(user)))
}

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>> {
    let users = state.users.list().await?;
    Ok(Json(json!(users)))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<Value>)> {
    let (fields, upload) = read_record_input(request).await?;
    let user = state.users.create(fields, upload).await?;
    Ok((StatusCode::CREATED, Json(json!(user))))
}

/// POST /users/bulk
pub async fn create_users_bulk(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>)> {
    let count = state.users.create_bulk(body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "count": count }))))
}

/// PUT /users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Json<Value>> {
    let (fields, upload) = read_record_input(request).await?;
    let user = state.users.update(&id, fields, upload).await?;
    Ok(Json(json!(user)))
}

/// PUT /users/bulk
pub async fn update_users_bulk(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let users = state.users.update_bulk(body).await?;
    Ok(Json(json!(users)))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let (message, user) = state.users.delete(&id).await?;
    Ok(Json(json!({ "message": message, "user": user })))
}

/// Assemble the raw field map and optional upload from a request body
async fn read_record_input(request: Request) -> Result<(FieldMap, Option<AssetUpload>)> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        read_multipart_input(request).await
    } else {
        read_json_input(request).await
    }
}

/// Multipart body: text parts become string fields, the photo part the upload
async fn read_multipart_input(request: Request) -> Result<(FieldMap, Option<AssetUpload>)> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ServiceError::InvalidBody(e.to_string()))?;

    let mut fields = FieldMap::new();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidBody(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        if name == PHOTO_FIELD && file_name.is_some() {
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServiceError::InvalidBody(e.to_string()))?;
            upload = Some(AssetUpload {
                filename: file_name.unwrap_or_default(),
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ServiceError::InvalidBody(e.to_string()))?;
            fields.insert(name, Value::String(text));
        }
    }

    Ok((fields, upload))
}

/// JSON body: one object, no upload; an empty body means no fields
async fn read_json_input(request: Request) -> Result<(FieldMap, Option<AssetUpload>)> {
    let bytes = axum::body::to_bytes(request.into_body(), BODY_LIMIT)
        .await
        .map_err(|e| ServiceError::InvalidBody(e.to_string()))?;

    if bytes.is_empty() {
        return Ok((FieldMap::new(), None));
    }

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::InvalidBody(format!("invalid JSON: {}", e)))?;
    let fields = value
        .as_object()
        .cloned()
        .ok_or_else(|| ServiceError::InvalidBody("expected a JSON object".to_string()))?;

    Ok((fields, None))
}
