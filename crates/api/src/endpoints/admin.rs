//! Admin endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use agora_common::AppResult;
use agora_core::{ensure_admin, SweepOutcome};
use agora_db::entities::{
    comment::CommentStatus,
    comment_flag,
    enrollment::EnrollmentStatus,
    event_attendee::PaymentStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    endpoints::enrollments::EnrollmentResponse,
    extractors::AuthUser,
    middleware::AppState,
    response::ApiResponse,
};

/// Create admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/update-active-status", post(sweep_event_status))
        .route("/events/{event_id}/attendees/{user_id}/payment", put(set_payment_status))
        .route("/enrollments", get(list_enrollments))
        .route("/enrollments/{id}/status", put(set_enrollment_status))
        .route("/comments/flagged", get(list_flagged_comments))
        .route("/comments/{id}/status", put(set_comment_status))
}

/// Run the batch event status sweep.
async fn sweep_event_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SweepOutcome>> {
    ensure_admin(&user)?;

    info!(user_id = %user.id, "Admin triggered event status sweep");

    let outcome = state.event_service.update_active_status().await?;
    Ok(ApiResponse::ok(outcome))
}

/// Set payment status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPaymentStatusRequest {
    pub status: PaymentStatus,
}

/// Record the outcome of a ticket payment.
async fn set_payment_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((event_id, user_id)): Path<(String, String)>,
    Json(req): Json<SetPaymentStatusRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .event_service
        .set_payment_status(&event_id, &user_id, req.status, &user)
        .await?;
    Ok(ApiResponse::ok(()))
}

/// List enrollments query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEnrollmentsQuery {
    pub status: Option<EnrollmentStatus>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// List enrollment submissions.
async fn list_enrollments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListEnrollmentsQuery>,
) -> AppResult<ApiResponse<Vec<EnrollmentResponse>>> {
    ensure_admin(&user)?;

    let enrollments = state
        .enrollment_service
        .list(query.status, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        enrollments.into_iter().map(Into::into).collect(),
    ))
}

/// Set enrollment status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEnrollmentStatusRequest {
    pub status: EnrollmentStatus,
}

/// Review an enrollment submission.
async fn set_enrollment_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetEnrollmentStatusRequest>,
) -> AppResult<ApiResponse<EnrollmentResponse>> {
    ensure_admin(&user)?;

    let enrollment = state.enrollment_service.set_status(&id, req.status).await?;
    Ok(ApiResponse::ok(enrollment.into()))
}

/// Flag record in moderation views.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagResponse {
    pub user_id: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl From<comment_flag::Model> for FlagResponse {
    fn from(f: comment_flag::Model) -> Self {
        Self {
            user_id: f.user_id,
            reason: f.reason,
            created_at: f.created_at.to_utc(),
        }
    }
}

/// A flagged comment plus its flags.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedCommentResponse {
    pub comment_id: String,
    pub content: String,
    pub user_id: String,
    pub status: CommentStatus,
    pub flags: Vec<FlagResponse>,
}

/// List flagged comments query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFlaggedQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
}

/// List recently flagged comments for moderation.
async fn list_flagged_comments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListFlaggedQuery>,
) -> AppResult<ApiResponse<Vec<FlaggedCommentResponse>>> {
    ensure_admin(&user)?;

    let queue = state.comment_service.flagged_queue(query.limit).await?;

    Ok(ApiResponse::ok(
        queue
            .into_iter()
            .map(|fc| FlaggedCommentResponse {
                comment_id: fc.comment.id,
                content: fc.comment.content,
                user_id: fc.comment.user_id,
                status: fc.comment.status,
                flags: fc.flags.into_iter().map(Into::into).collect(),
            })
            .collect(),
    ))
}

/// Set comment status request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCommentStatusRequest {
    pub status: CommentStatus,
}

/// Hide or restore a comment.
async fn set_comment_status(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetCommentStatusRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .comment_service
        .set_status(&id, req.status, &user)
        .await?;
    Ok(ApiResponse::ok(()))
}
