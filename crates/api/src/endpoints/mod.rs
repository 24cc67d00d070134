//! API endpoints.

mod admin;
mod auth;
mod comments;
mod directory;
mod enrollments;
mod events;
mod news;
mod team;
mod uploads;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/events", events::router())
        .nest("/news", news::router())
        .nest("/directory", directory::router())
        .nest("/comments", comments::router())
        .nest("/team", team::router())
        .nest("/enrollments", enrollments::router())
        .nest("/uploads", uploads::router())
        .nest("/admin", admin::router())
}
