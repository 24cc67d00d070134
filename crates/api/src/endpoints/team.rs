//! Team endpoints.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use agora_common::AppResult;
use agora_core::{ensure_admin, CreateTeamMemberInput, UpdateTeamMemberInput};
use agora_db::entities::team_member;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create team router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_members))
        .route("/", post(create_member))
        .route("/{id}", put(update_member))
        .route("/{id}", delete(delete_member))
}

/// Team member response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<team_member::Model> for TeamMemberResponse {
    fn from(m: team_member::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            role: m.role,
            bio: m.bio,
            photo_url: m.photo_url,
            display_order: m.display_order,
            is_active: m.is_active,
            created_at: m.created_at.to_utc(),
        }
    }
}

/// List team members. Admins see hidden entries too.
async fn list_members(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TeamMemberResponse>>> {
    let is_admin = viewer.is_some_and(|u| u.is_admin);

    let members = if is_admin {
        state.team_service.list_all().await?
    } else {
        state.team_service.list_active().await?
    };

    Ok(ApiResponse::ok(
        members.into_iter().map(Into::into).collect(),
    ))
}

/// Create a team member entry (admin only).
async fn create_member(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTeamMemberInput>,
) -> AppResult<ApiResponse<TeamMemberResponse>> {
    ensure_admin(&user)?;

    info!(user_id = %user.id, name = %req.name, "Creating team member");

    let member = state.team_service.create(req).await?;
    Ok(ApiResponse::ok(member.into()))
}

/// Update a team member entry (admin only).
async fn update_member(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTeamMemberInput>,
) -> AppResult<ApiResponse<TeamMemberResponse>> {
    ensure_admin(&user)?;

    let member = state.team_service.update(&id, req).await?;
    Ok(ApiResponse::ok(member.into()))
}

/// Delete a team member entry (admin only).
async fn delete_member(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    ensure_admin(&user)?;

    state.team_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}
