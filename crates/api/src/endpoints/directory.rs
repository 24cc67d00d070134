//! Directory endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use agora_common::AppResult;
use agora_core::{CreateListingInput, ReactionSummary, UpdateListingInput};
use agora_db::entities::{
    directory_listing,
    reaction::{ReactionKind, TargetType},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create directory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings))
        .route("/", post(create_listing))
        .route("/{id}", get(get_listing))
        .route("/{id}", put(update_listing))
        .route("/{id}", delete(delete_listing))
        .route("/{id}/like", post(like_listing))
        .route("/{id}/dislike", post(dislike_listing))
}

/// Listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub comment_count: i32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<ReactionSummary>,
}

impl From<directory_listing::Model> for ListingResponse {
    fn from(listing: directory_listing::Model) -> Self {
        Self {
            id: listing.id,
            user_id: listing.user_id,
            name: listing.name,
            description: listing.description,
            category: listing.category,
            website: listing.website,
            phone: listing.phone,
            address: listing.address,
            comment_count: listing.comment_count,
            view_count: listing.view_count,
            created_at: listing.created_at.to_utc(),
            reactions: None,
        }
    }
}

/// List listings query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListListingsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Filter by category slug.
    pub category: Option<String>,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    20
}

/// List listings response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingListResponse {
    pub listings: Vec<ListingResponse>,
    pub total: u64,
    pub pages: u64,
}

/// List directory listings.
async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListListingsQuery>,
) -> AppResult<ApiResponse<ListingListResponse>> {
    let page = state
        .directory_service
        .list(query.category.as_deref(), query.page, query.limit)
        .await?;

    Ok(ApiResponse::ok(ListingListResponse {
        listings: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
        pages: page.pages,
    }))
}

/// Get a single listing with its reaction summary.
async fn get_listing(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state.directory_service.get(&id).await?;

    // View tracking is best-effort
    if let Err(e) = state.directory_service.track_view(&id).await {
        tracing::warn!(error = %e, listing_id = %id, "Failed to track listing view");
    }

    let reactions = state
        .reaction_service
        .summary(
            viewer.as_ref().map(|u| u.id.as_str()),
            TargetType::Directory,
            &id,
        )
        .await?;

    let mut response = ListingResponse::from(listing);
    response.reactions = Some(reactions);

    Ok(ApiResponse::ok(response))
}

/// Create a listing.
async fn create_listing(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateListingInput>,
) -> AppResult<ApiResponse<ListingResponse>> {
    info!(user_id = %user.id, name = %req.name, "Creating directory listing");

    let listing = state.directory_service.create(&user, req).await?;
    Ok(ApiResponse::ok(listing.into()))
}

/// Update a listing (owner or admin).
async fn update_listing(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateListingInput>,
) -> AppResult<ApiResponse<ListingResponse>> {
    let listing = state.directory_service.update(&id, &user, req).await?;
    Ok(ApiResponse::ok(listing.into()))
}

/// Delete a listing (owner or admin).
async fn delete_listing(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.directory_service.delete(&id, &user).await?;
    Ok(ApiResponse::ok(()))
}

/// Toggle a like on a listing.
async fn like_listing(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .toggle(&user.id, TargetType::Directory, &id, ReactionKind::Like)
        .await?;
    Ok(ApiResponse::ok(summary))
}

/// Toggle a dislike on a listing.
async fn dislike_listing(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .toggle(&user.id, TargetType::Directory, &id, ReactionKind::Dislike)
        .await?;
    Ok(ApiResponse::ok(summary))
}
