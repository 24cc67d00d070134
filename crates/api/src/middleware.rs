//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use agora_core::{
    CommentService, DirectoryService, EnrollmentService, EventService, NewsService,
    ReactionService, TeamService, UploadService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub event_service: EventService,
    pub news_service: NewsService,
    pub directory_service: DirectoryService,
    pub comment_service: CommentService,
    pub reaction_service: ReactionService,
    pub team_service: TeamService,
    pub enrollment_service: EnrollmentService,
    pub upload_service: UploadService,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Authenticate user by token
        if let Ok(user) = state.user_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}
