//! Comment repository.

use std::sync::Arc;

use crate::entities::{
    comment::{self, CommentStatus, ContentKind},
    comment_flag, Comment, CommentFlag,
};
use agora_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Page of comments plus pagination totals.
#[derive(Debug, Clone)]
pub struct CommentPage {
    /// Comments on this page.
    pub items: Vec<comment::Model>,
    /// Total matching comments.
    pub total: u64,
    /// Total page count.
    pub pages: u64,
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active top-level comments on a content item (newest first, paginated).
    pub async fn list_top_level(
        &self,
        content_type: ContentKind,
        content_id: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<CommentPage> {
        let paginator = Comment::find()
            .filter(comment::Column::ContentType.eq(content_type))
            .filter(comment::Column::ContentId.eq(content_id))
            .filter(comment::Column::ParentId.is_null())
            .filter(comment::Column::Status.eq(CommentStatus::Active))
            .order_by_desc(comment::Column::Id)
            .paginate(self.db.as_ref(), page_size);

        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(CommentPage {
            items,
            total: totals.number_of_items,
            pages: totals.number_of_pages,
        })
    }

    /// List active replies of a comment (oldest first).
    pub async fn list_replies(&self, parent_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::ParentId.eq(parent_id))
            .filter(comment::Column::Status.eq(CommentStatus::Active))
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment reply count atomically (single UPDATE query, no fetch).
    pub async fn increment_reply_count(&self, comment_id: &str) -> AppResult<()> {
        Comment::update_many()
            .col_expr(
                comment::Column::ReplyCount,
                Expr::col(comment::Column::ReplyCount).add(1),
            )
            .filter(comment::Column::Id.eq(comment_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ==================== Flags ====================

    /// Check if a user has already flagged a comment.
    pub async fn has_flagged(&self, comment_id: &str, user_id: &str) -> AppResult<bool> {
        let found = CommentFlag::find()
            .filter(comment_flag::Column::CommentId.eq(comment_id))
            .filter(comment_flag::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.is_some())
    }

    /// Create a flag record.
    pub async fn create_flag(
        &self,
        model: comment_flag::ActiveModel,
    ) -> AppResult<comment_flag::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List flags on a comment (oldest first).
    pub async fn list_flags(&self, comment_id: &str) -> AppResult<Vec<comment_flag::Model>> {
        CommentFlag::find()
            .filter(comment_flag::Column::CommentId.eq(comment_id))
            .order_by_asc(comment_flag::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List recently flagged comments for the moderation queue.
    ///
    /// Returns distinct comment IDs of non-deleted comments carrying at
    /// least one flag, newest flags first.
    pub async fn list_flagged_comment_ids(&self, limit: u64) -> AppResult<Vec<String>> {
        let flags = CommentFlag::find()
            .order_by_desc(comment_flag::Column::Id)
            .limit(limit * 4)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut seen = std::collections::HashSet::new();
        let mut ids = Vec::new();
        for flag in flags {
            if seen.insert(flag.comment_id.clone()) {
                ids.push(flag.comment_id);
                if ids.len() as u64 >= limit {
                    break;
                }
            }
        }
        Ok(ids)
    }

    /// Find comments by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<comment::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Comment::find()
            .filter(comment::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_comment(id: &str, parent_id: Option<&str>) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            content: "Nice event!".to_string(),
            user_id: "u1".to_string(),
            content_type: ContentKind::Event,
            content_id: "e1".to_string(),
            parent_id: parent_id.map(ToString::to_string),
            status: CommentStatus::Active,
            reply_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let comment = create_test_comment("c1", None);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_id("c1").await.unwrap();

        assert!(result.is_some());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_replies() {
        let r1 = create_test_comment("c2", Some("c1"));
        let r2 = create_test_comment("c3", Some("c1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.list_replies("c1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|c| c.parent_id.as_deref() == Some("c1")));
    }

    #[tokio::test]
    async fn test_has_flagged_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<comment_flag::Model>::new()])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        assert!(!repo.has_flagged("c1", "u1").await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_reply_count() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        repo.increment_reply_count("c1").await.unwrap();
    }
}
