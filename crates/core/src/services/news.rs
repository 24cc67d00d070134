//! News service.

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::{news_article, reaction::TargetType, user},
    repositories::{ArticlePage, NewsRepository, ReactionRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a news article.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleInput {
    /// Article headline.
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    /// Article body.
    #[validate(length(min = 1, max = 100_000))]
    pub body: String,

    /// Short summary for list views.
    #[validate(length(max = 512))]
    pub summary: Option<String>,

    /// Header image URL.
    #[validate(length(max = 512))]
    pub image_url: Option<String>,

    /// Publish immediately instead of saving a draft.
    #[serde(default)]
    pub is_published: bool,
}

/// Input for updating a news article.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleInput {
    /// New headline.
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    /// New body.
    #[validate(length(min = 1, max = 100_000))]
    pub body: Option<String>,

    /// New summary.
    pub summary: Option<Option<String>>,

    /// New header image URL.
    pub image_url: Option<Option<String>>,

    /// Publish or unpublish.
    pub is_published: Option<bool>,
}

/// News service for business logic.
#[derive(Clone)]
pub struct NewsService {
    news_repo: NewsRepository,
    reaction_repo: ReactionRepository,
    id_gen: IdGenerator,
}

impl NewsService {
    /// Create a new news service.
    #[must_use]
    pub const fn new(news_repo: NewsRepository, reaction_repo: ReactionRepository) -> Self {
        Self {
            news_repo,
            reaction_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new article authored by `author`.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreateArticleInput,
    ) -> AppResult<news_article::Model> {
        input.validate()?;

        let model = news_article::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author.id.clone()),
            title: Set(input.title),
            body: Set(input.body),
            summary: Set(input.summary),
            image_url: Set(input.image_url),
            is_published: Set(input.is_published),
            comment_count: Set(0),
            view_count: Set(0),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.news_repo.create(model).await
    }

    /// Get an article. Drafts are visible to the author and admins only.
    pub async fn get(
        &self,
        id: &str,
        viewer: Option<&user::Model>,
    ) -> AppResult<news_article::Model> {
        let article = self.news_repo.get_by_id(id).await?;

        if !article.is_published {
            let can_view = viewer.is_some_and(|u| u.is_admin || u.id == article.user_id);
            if !can_view {
                return Err(AppError::NotFound(format!("News article not found: {id}")));
            }
        }

        Ok(article)
    }

    /// Record a view on an article.
    pub async fn track_view(&self, id: &str) -> AppResult<()> {
        self.news_repo.increment_view_count(id).await
    }

    /// List published articles (newest first).
    pub async fn list_published(&self, page: u64, page_size: u64) -> AppResult<ArticlePage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        self.news_repo.list(true, page, page_size).await
    }

    /// List all articles including drafts (admin view).
    pub async fn list_all(&self, page: u64, page_size: u64) -> AppResult<ArticlePage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        self.news_repo.list(false, page, page_size).await
    }

    /// Update an article. Author or admin only.
    pub async fn update(
        &self,
        id: &str,
        acting_user: &user::Model,
        input: UpdateArticleInput,
    ) -> AppResult<news_article::Model> {
        input.validate()?;

        let article = self.news_repo.get_by_id(id).await?;
        super::access::ensure_can_mutate(&article.user_id, acting_user)?;

        let mut active: news_article::ActiveModel = article.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(body) = input.body {
            active.body = Set(body);
        }
        if let Some(summary) = input.summary {
            active.summary = Set(summary);
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(is_published) = input.is_published {
            active.is_published = Set(is_published);
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.news_repo.update(active).await
    }

    /// Delete an article. Author or admin only.
    pub async fn delete(&self, id: &str, acting_user: &user::Model) -> AppResult<()> {
        let article = self.news_repo.get_by_id(id).await?;
        super::access::ensure_can_mutate(&article.user_id, acting_user)?;

        self.news_repo.delete(id).await?;
        self.reaction_repo
            .delete_for_target(TargetType::News, id)
            .await?;

        tracing::info!(article_id = %id, "Deleted news article");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            username_lower: format!("user-{id}"),
            email: format!("{id}@example.com"),
            name: None,
            password_hash: "hash".to_string(),
            token: None,
            avatar_url: None,
            bio: None,
            is_admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_article(id: &str, author: &str, published: bool) -> news_article::Model {
        news_article::Model {
            id: id.to_string(),
            user_id: author.to_string(),
            title: "Headline".to_string(),
            body: "Body".to_string(),
            summary: None,
            image_url: None,
            is_published: published,
            comment_count: 0,
            view_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<DatabaseConnection>) -> NewsService {
        NewsService::new(
            NewsRepository::new(Arc::clone(&db)),
            ReactionRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_draft_hidden_from_public() {
        let article = test_article("n1", "author", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[article]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.get("n1", None).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_draft_visible_to_author() {
        let article = test_article("n1", "author", false);
        let author = test_user("author", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[article]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.get("n1", Some(&author)).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_by_non_author_forbidden() {
        let article = test_article("n1", "author", true);
        let other = test_user("u2", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[article]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .update("n1", &other, UpdateArticleInput::default())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
