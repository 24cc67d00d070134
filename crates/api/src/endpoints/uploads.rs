//! Upload endpoints.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    routing::{delete, get, post},
    Router,
};
use agora_common::{AppError, AppResult};
use agora_db::entities::upload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Multipart uploads may exceed axum's default body limit.
const UPLOAD_BODY_LIMIT: usize = 32 * 1024 * 1024;

/// Create upload router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_file))
        .route("/", get(list_uploads))
        .route("/{id}", delete(delete_upload))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

/// Upload response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: String,
    pub file_name: String,
    pub url: String,
    pub content_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<upload::Model> for UploadResponse {
    fn from(u: upload::Model) -> Self {
        Self {
            id: u.id,
            file_name: u.file_name,
            url: u.url,
            content_type: u.content_type,
            size: u.size,
            created_at: u.created_at.to_utc(),
        }
    }
}

/// Upload a file as multipart form data.
async fn upload_file(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(ToString::to_string)
            .ok_or_else(|| AppError::Validation("File name is required".to_string()))?;
        let content_type = field
            .content_type()
            .map_or_else(|| "application/octet-stream".to_string(), ToString::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        let created = state
            .upload_service
            .store(&user.id, &file_name, &content_type, &data)
            .await?;

        return Ok(ApiResponse::ok(created.into()));
    }

    Err(AppError::Validation(
        "Multipart field \"file\" is required".to_string(),
    ))
}

/// List uploads query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUploadsQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// List the authenticated user's uploads.
async fn list_uploads(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListUploadsQuery>,
) -> AppResult<ApiResponse<Vec<UploadResponse>>> {
    let uploads = state
        .upload_service
        .list_mine(&user.id, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        uploads.into_iter().map(Into::into).collect(),
    ))
}

/// Delete an upload (owner or admin).
async fn delete_upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.upload_service.delete(&id, &user).await?;
    Ok(ApiResponse::ok(()))
}
