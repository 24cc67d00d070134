//! News endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use agora_common::AppResult;
use agora_core::{CreateArticleInput, ReactionSummary, UpdateArticleInput};
use agora_db::entities::{
    news_article,
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

/// Create news router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_articles))
        .route("/", post(create_article))
        .route("/{id}", get(get_article))
        .route("/{id}", put(update_article))
        .route("/{id}", delete(delete_article))
        .route("/{id}/like", post(like_article))
        .route("/{id}/dislike", post(dislike_article))
}

/// Article response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub comment_count: i32,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<ReactionSummary>,
}

impl From<news_article::Model> for ArticleResponse {
    fn from(article: news_article::Model) -> Self {
        Self {
            id: article.id,
            user_id: article.user_id,
            title: article.title,
            body: article.body,
            summary: article.summary,
            image_url: article.image_url,
            is_published: article.is_published,
            comment_count: article.comment_count,
            view_count: article.view_count,
            created_at: article.created_at.to_utc(),
            reactions: None,
        }
    }
}

/// List articles query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArticlesQuery {
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

/// List articles response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleResponse>,
    pub total: u64,
    pub pages: u64,
}

/// List published articles.
async fn list_articles(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> AppResult<ApiResponse<ArticleListResponse>> {
    let is_admin = viewer.is_some_and(|u| u.is_admin);

    let page = if is_admin {
        state.news_service.list_all(query.page, query.limit).await?
    } else {
        state
            .news_service
            .list_published(query.page, query.limit)
            .await?
    };

    Ok(ApiResponse::ok(ArticleListResponse {
        articles: page.items.into_iter().map(Into::into).collect(),
        total: page.total,
        pages: page.pages,
    }))
}

/// Get a single article with its reaction summary.
async fn get_article(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ArticleResponse>> {
    let article = state.news_service.get(&id, viewer.as_ref()).await?;

    // View tracking is best-effort
    if let Err(e) = state.news_service.track_view(&id).await {
        tracing::warn!(error = %e, article_id = %id, "Failed to track article view");
    }

    let reactions = state
        .reaction_service
        .summary(viewer.as_ref().map(|u| u.id.as_str()), TargetType::News, &id)
        .await?;

    let mut response = ArticleResponse::from(article);
    response.reactions = Some(reactions);

    Ok(ApiResponse::ok(response))
}

/// Create an article.
async fn create_article(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateArticleInput>,
) -> AppResult<ApiResponse<ArticleResponse>> {
    info!(user_id = %user.id, title = %req.title, "Creating news article");

    let article = state.news_service.create(&user, req).await?;
    Ok(ApiResponse::ok(article.into()))
}

/// Update an article (author or admin).
async fn update_article(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateArticleInput>,
) -> AppResult<ApiResponse<ArticleResponse>> {
    let article = state.news_service.update(&id, &user, req).await?;
    Ok(ApiResponse::ok(article.into()))
}

/// Delete an article (author or admin).
async fn delete_article(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.news_service.delete(&id, &user).await?;
    Ok(ApiResponse::ok(()))
}

/// Toggle a like on an article.
async fn like_article(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .toggle(&user.id, TargetType::News, &id, ReactionKind::Like)
        .await?;
    Ok(ApiResponse::ok(summary))
}

/// Toggle a dislike on an article.
async fn dislike_article(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReactionSummary>> {
    let summary = state
        .reaction_service
        .toggle(&user.id, TargetType::News, &id, ReactionKind::Dislike)
        .await?;
    Ok(ApiResponse::ok(summary))
}
