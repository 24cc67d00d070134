//! Authentication endpoints.

use axum::{extract::State, routing::{get, post}, Json, Router};
use agora_common::AppResult;
use agora_core::{RegisterInput, UpdateProfileInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/me", post(update_me))
}

/// Public user view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<agora_db::entities::user::Model> for UserResponse {
    fn from(user: agora_db::entities::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            is_admin: user.is_admin,
            created_at: user.created_at.to_utc(),
        }
    }
}

/// Registration/login response: the user plus a bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let user = state.user_service.register(req).await?;
    let token = user.token.clone().unwrap_or_default();

    info!(user_id = %user.id, "New account registered");

    Ok(ApiResponse::ok(SessionResponse {
        user: user.into(),
        token,
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Log in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<SessionResponse>> {
    let (user, token) = state.user_service.login(&req.email, &req.password).await?;

    Ok(ApiResponse::ok(SessionResponse {
        user: user.into(),
        token,
    }))
}

/// Get the authenticated user.
async fn me(AuthUser(user): AuthUser) -> AppResult<ApiResponse<UserResponse>> {
    Ok(ApiResponse::ok(user.into()))
}

/// Update the authenticated user's profile.
async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state.user_service.update_profile(&user.id, req).await?;
    Ok(ApiResponse::ok(updated.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_omits_credentials() {
        let user = agora_db::entities::user::Model {
            id: "u1".to_string(),
            username: "alice".to_string(),
            username_lower: "alice".to_string(),
            email: "alice@example.com".to_string(),
            name: None,
            password_hash: "supersecret-hash".to_string(),
            token: Some("supersecret-token".to_string()),
            avatar_url: None,
            bio: None,
            is_admin: false,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("supersecret"));
        assert!(json.contains("alice"));
    }
}
