//! Comment endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use agora_common::AppResult;
use agora_core::{CommentListPage, CommentView, CreateCommentInput, ReactionSummary};
use agora_db::entities::{
    comment::ContentKind,
    reaction::{ReactionKind, TargetType},
};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create comment router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_comment))
        .route("/{content_type}/{content_id}", get(list_comments))
        .route("/replies/{id}", get(list_replies))
        .route("/{id}", put(update_comment))
        .route("/{id}", delete(delete_comment))
        .route("/{id}/flag", post(flag_comment))
        .route("/{id}/like", post(like_comment))
        .route("/{id}/dislike", post(dislike_comment))
}

/// Create comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub content_type: ContentKind,
    pub content_id: String,
    pub parent_comment: Option<String>,
}

/// Create a comment or a reply.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state
        .comment_service
        .create(
            &user,
            CreateCommentInput {
                content: req.content,
                content_type: req.content_type,
                content_id: req.content_id,
                parent_id: req.parent_comment,
            },
        )
        .await?;

    Ok(ApiResponse::ok(comment))
}

/// List comments query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    20
}

/// List top-level comments on a content item (newest first).
async fn list_comments(
    State(state): State<AppState>,
    Path((content_type, content_id)): Path<(ContentKind, String)>,
    Query(query): Query<ListCommentsQuery>,
) -> AppResult<ApiResponse<CommentListPage>> {
    let page = state
        .comment_service
        .list(content_type, &content_id, query.page, query.limit)
        .await?;

    Ok(ApiResponse::ok(page))
}

/// List replies of a comment (oldest first).
async fn list_replies(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<CommentView>>> {
    let replies = state.comment_service.list_replies(&id).await?;
    Ok(ApiResponse::ok(replies))
}

/// Update comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Update a comment (author only).
async fn update_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCommentRequest>,
) -> AppResult<ApiResponse<CommentView>> {
    let comment = state.comment_service.update(&id, &req.content, &user).await?;
    Ok(ApiResponse::ok(comment))
}

/// Soft-delete a comment (author or admin).
async fn delete_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.comment_service.delete(&id, &user).await?;
    Ok(ApiResponse::ok(()))
}

/// Flag comment request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagCommentRequest {
    pub reason: String,
}

/// Flag a comment for moderation.
async fn flag_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FlagCommentRequest>,
) -> AppResult<ApiResponse<()>> {
    state.comment_service.flag(&id, &user.id, &req.reason).await?;
    Ok(ApiResponse::ok(()))
}

/// Toggle a like on a comment.
async fn like_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .toggle(&user.id, TargetType::Comment, &id, ReactionKind::Like)
        .await?;
    Ok(ApiResponse::ok(summary))
}

/// Toggle a dislike on a comment.
async fn dislike_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .toggle(&user.id, TargetType::Comment, &id, ReactionKind::Dislike)
        .await?;
    Ok(ApiResponse::ok(summary))
}
