//! Content registry.
//!
//! Comments and reactions target one of the three content collections
//! through a (`ContentKind`, id) pair. This registry resolves the tag to
//! the right store accessor once, so polymorphic callers never switch on
//! the kind themselves.

use std::sync::Arc;

use crate::entities::{
    comment::ContentKind, directory_listing, event, news_article, DirectoryListing, Event,
    NewsArticle,
};
use agora_common::{AppError, AppResult};
use sea_orm::{sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Dispatches content-item operations by [`ContentKind`].
#[derive(Clone)]
pub struct ContentRegistry {
    db: Arc<DatabaseConnection>,
}

impl ContentRegistry {
    /// Create a new content registry.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check whether a content item exists.
    pub async fn exists(&self, kind: ContentKind, id: &str) -> AppResult<bool> {
        let found = match kind {
            ContentKind::Event => Event::find_by_id(id)
                .one(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .is_some(),
            ContentKind::News => NewsArticle::find_by_id(id)
                .one(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .is_some(),
            ContentKind::Directory => DirectoryListing::find_by_id(id)
                .one(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .is_some(),
        };
        Ok(found)
    }

    /// Check existence, returning `NotFound` when the item is missing.
    pub async fn ensure_exists(&self, kind: ContentKind, id: &str) -> AppResult<()> {
        if self.exists(kind, id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Content item not found: {kind:?} {id}"
            )))
        }
    }

    /// Increment the comment count on a content item atomically.
    pub async fn increment_comment_count(&self, kind: ContentKind, id: &str) -> AppResult<()> {
        match kind {
            ContentKind::Event => {
                Event::update_many()
                    .col_expr(
                        event::Column::CommentCount,
                        Expr::col(event::Column::CommentCount).add(1),
                    )
                    .filter(event::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentKind::News => {
                NewsArticle::update_many()
                    .col_expr(
                        news_article::Column::CommentCount,
                        Expr::col(news_article::Column::CommentCount).add(1),
                    )
                    .filter(news_article::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentKind::Directory => {
                DirectoryListing::update_many()
                    .col_expr(
                        directory_listing::Column::CommentCount,
                        Expr::col(directory_listing::Column::CommentCount).add(1),
                    )
                    .filter(directory_listing::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
        }
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the comment count on a content item atomically.
    pub async fn decrement_comment_count(&self, kind: ContentKind, id: &str) -> AppResult<()> {
        match kind {
            ContentKind::Event => {
                Event::update_many()
                    .col_expr(
                        event::Column::CommentCount,
                        Expr::cust("GREATEST(comment_count - 1, 0)"),
                    )
                    .filter(event::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentKind::News => {
                NewsArticle::update_many()
                    .col_expr(
                        news_article::Column::CommentCount,
                        Expr::cust("GREATEST(comment_count - 1, 0)"),
                    )
                    .filter(news_article::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
            ContentKind::Directory => {
                DirectoryListing::update_many()
                    .col_expr(
                        directory_listing::Column::CommentCount,
                        Expr::cust("GREATEST(comment_count - 1, 0)"),
                    )
                    .filter(directory_listing::Column::Id.eq(id))
                    .exec(self.db.as_ref())
                    .await
            }
        }
        .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_event(id: &str) -> event::Model {
        event::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: "Test event".to_string(),
            description: "A test event".to_string(),
            location: None,
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            is_active: true,
            ticket_price_cents: None,
            capacity: None,
            comment_count: 0,
            view_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_exists_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_event("e1")]])
                .into_connection(),
        );

        let registry = ContentRegistry::new(db);
        assert!(registry.exists(ContentKind::Event, "e1").await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_exists_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<news_article::Model>::new()])
                .into_connection(),
        );

        let registry = ContentRegistry::new(db);
        let result = registry.ensure_exists(ContentKind::News, "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_increment_comment_count_dispatches() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let registry = ContentRegistry::new(db);
        registry
            .increment_comment_count(ContentKind::Directory, "d1")
            .await
            .unwrap();
    }
}
