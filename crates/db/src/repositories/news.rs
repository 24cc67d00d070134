//! News article repository.

use std::sync::Arc;

use crate::entities::{news_article, NewsArticle};
use agora_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Page of articles plus pagination totals.
#[derive(Debug, Clone)]
pub struct ArticlePage {
    /// Articles on this page.
    pub items: Vec<news_article::Model>,
    /// Total matching articles.
    pub total: u64,
    /// Total page count.
    pub pages: u64,
}

/// News article repository for database operations.
#[derive(Clone)]
pub struct NewsRepository {
    db: Arc<DatabaseConnection>,
}

impl NewsRepository {
    /// Create a new news repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an article by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<news_article::Model>> {
        NewsArticle::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an article by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<news_article::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("News article not found: {id}")))
    }

    /// Create a new article.
    pub async fn create(&self, model: news_article::ActiveModel) -> AppResult<news_article::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an article.
    pub async fn update(&self, model: news_article::ActiveModel) -> AppResult<news_article::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an article.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        NewsArticle::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List articles (newest first), optionally published-only.
    pub async fn list(
        &self,
        published_only: bool,
        page: u64,
        page_size: u64,
    ) -> AppResult<ArticlePage> {
        let mut query = NewsArticle::find().order_by_desc(news_article::Column::Id);

        if published_only {
            query = query.filter(news_article::Column::IsPublished.eq(true));
        }

        let paginator = query.paginate(self.db.as_ref(), page_size);
        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ArticlePage {
            items,
            total: totals.number_of_items,
            pages: totals.number_of_pages,
        })
    }

    /// Increment comment count atomically (single UPDATE query, no fetch).
    pub async fn increment_comment_count(&self, article_id: &str) -> AppResult<()> {
        NewsArticle::update_many()
            .col_expr(
                news_article::Column::CommentCount,
                Expr::col(news_article::Column::CommentCount).add(1),
            )
            .filter(news_article::Column::Id.eq(article_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement comment count atomically (single UPDATE query, no fetch).
    pub async fn decrement_comment_count(&self, article_id: &str) -> AppResult<()> {
        NewsArticle::update_many()
            .col_expr(
                news_article::Column::CommentCount,
                Expr::cust("GREATEST(comment_count - 1, 0)"),
            )
            .filter(news_article::Column::Id.eq(article_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment view count atomically.
    pub async fn increment_view_count(&self, article_id: &str) -> AppResult<()> {
        NewsArticle::update_many()
            .col_expr(
                news_article::Column::ViewCount,
                Expr::col(news_article::Column::ViewCount).add(1),
            )
            .filter(news_article::Column::Id.eq(article_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_article(id: &str, published: bool) -> news_article::Model {
        news_article::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
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

    #[tokio::test]
    async fn test_find_by_id_found() {
        let article = create_test_article("n1", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[article]])
                .into_connection(),
        );

        let repo = NewsRepository::new(db);
        let result = repo.find_by_id("n1").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<news_article::Model>::new()])
                .into_connection(),
        );

        let repo = NewsRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
