//! Event endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use agora_common::AppResult;
use agora_core::{CreateEventInput, ReactionSummary, RsvpInput, UpdateEventInput};
use agora_db::entities::{
    event, event_attendee,
    reaction::{ReactionKind, TargetType},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Create event router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/", post(create_event))
        .route("/{id}", get(get_event))
        .route("/{id}", put(update_event))
        .route("/{id}", delete(delete_event))
        .route("/{id}/like", post(like_event))
        .route("/{id}/dislike", post(dislike_event))
        .route("/{id}/rsvp", post(rsvp))
        .route("/{id}/rsvp", delete(cancel_rsvp))
        .route("/{id}/attendees", get(list_attendees))
}

/// Event response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub date: NaiveDate,
    pub is_active: bool,
    pub ticket_price_cents: Option<i32>,
    pub capacity: Option<i32>,
    pub comment_count: i32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<ReactionSummary>,
}

impl From<event::Model> for EventResponse {
    fn from(event: event::Model) -> Self {
        Self {
            id: event.id,
            user_id: event.user_id,
            title: event.title,
            description: event.description,
            location: event.location,
            date: event.date,
            is_active: event.is_active,
            ticket_price_cents: event.ticket_price_cents,
            capacity: event.capacity,
            comment_count: event.comment_count,
            view_count: event.view_count,
            created_at: event.created_at.to_utc(),
            reactions: None,
        }
    }
}

/// Attendee response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub user_id: String,
    pub rsvp_status: event_attendee::RsvpStatus,
    pub payment_status: event_attendee::PaymentStatus,
    pub ticket_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<event_attendee::Model> for AttendeeResponse {
    fn from(a: event_attendee::Model) -> Self {
        Self {
            user_id: a.user_id,
            rsvp_status: a.rsvp_status,
            payment_status: a.payment_status,
            ticket_type: a.ticket_type,
            created_at: a.created_at.to_utc(),
        }
    }
}

/// List events query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// If true, only list active events.
    #[serde(default)]
    pub active_only: bool,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    20
}

/// List events response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    pub events: Vec<EventResponse>,
    pub total: u64,
    pub pages: u64,
}

/// List events.
async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> AppResult<ApiResponse<EventListResponse>> {
    let page = state
        .event_service
        .list(query.active_only, query.page, query.limit)
        .await?;

    Ok(ApiResponse::ok(EventListResponse {
        events: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
        pages: page.pages,
    }))
}

/// Get a single event with its reaction summary.
async fn get_event(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.get(&id).await?;

    // View tracking is best-effort
    if let Err(e) = state.event_service.track_view(&id).await {
        tracing::warn!(error = %e, event_id = %id, "Failed to track event view");
    }

    let reactions = state
        .reaction_service
        .summary(viewer.as_ref().map(|u| u.id.as_str()), TargetType::Event, &id)
        .await?;

    let mut response = EventResponse::from(event);
    response.reactions = Some(reactions);

    Ok(ApiResponse::ok(response))
}

/// Create an event.
async fn create_event(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEventInput>,
) -> AppResult<ApiResponse<EventResponse>> {
    info!(user_id = %user.id, title = %req.title, "Creating event");

    let event = state.event_service.create(&user, req).await?;
    Ok(ApiResponse::ok(event.into()))
}

/// Update an event (owner or admin).
async fn update_event(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventInput>,
) -> AppResult<ApiResponse<EventResponse>> {
    let event = state.event_service.update(&id, &user, req).await?;
    Ok(ApiResponse::ok(event.into()))
}

/// Delete an event (owner or admin).
async fn delete_event(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.event_service.delete(&id, &user).await?;
    Ok(ApiResponse::ok(()))
}

/// Toggle a like on an event.
async fn like_event(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .toggle(&user.id, TargetType::Event, &id, ReactionKind::Like)
        .await?;
    Ok(ApiResponse::ok(summary))
}

/// Toggle a dislike on an event.
async fn dislike_event(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .toggle(&user.id, TargetType::Event, &id, ReactionKind::Dislike)
        .await?;
    Ok(ApiResponse::ok(summary))
}

/// RSVP to an event.
async fn rsvp(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RsvpInput>,
) -> AppResult<ApiResponse<AttendeeResponse>> {
    let attendee = state.event_service.rsvp(&id, &user.id, req).await?;
    Ok(ApiResponse::ok(attendee.into()))
}

/// Cancel an RSVP.
async fn cancel_rsvp(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.event_service.cancel_rsvp(&id, &user.id).await?;
    Ok(ApiResponse::ok(()))
}

/// List attendees of an event.
async fn list_attendees(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<AttendeeResponse>>> {
    let attendees = state.event_service.attendees(&id).await?;
    Ok(ApiResponse::ok(
        attendees.into_iter().map(Into::into).collect(),
    ))
}
