//! Comment service.
//!
//! Top-level comments form a feed (newest first); replies under a comment
//! read as a conversation (oldest first). Deletion is always soft so that
//! moderation history and counters stay auditable.

use std::collections::HashMap;

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::{
        comment::{self, CommentStatus, ContentKind},
        comment_flag, user,
    },
    repositories::{CommentRepository, ContentRegistry, UserRepository},
};
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Serialize;

/// Maximum length of a top-level comment, in characters.
pub const MAX_COMMENT_LEN: usize = 5000;

/// Maximum length of a reply, in characters.
pub const MAX_REPLY_LEN: usize = 100;

/// Maximum length of a flag reason, in characters.
pub const MAX_FLAG_REASON_LEN: usize = 500;

/// Validate comment content against the length rules.
///
/// Replies are capped far tighter than top-level comments.
pub fn validate_content(content: &str, is_reply: bool) -> AppResult<()> {
    if content.is_empty() {
        return Err(AppError::Validation(
            "Comment content must not be empty".to_string(),
        ));
    }

    let len = content.chars().count();
    if len > MAX_COMMENT_LEN {
        return Err(AppError::Validation(format!(
            "Comment content must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    if is_reply && len > MAX_REPLY_LEN {
        return Err(AppError::Validation(format!(
            "Replies must be at most {MAX_REPLY_LEN} characters"
        )));
    }

    Ok(())
}

/// Input for creating a comment.
#[derive(Debug, Clone)]
pub struct CreateCommentInput {
    /// Comment text.
    pub content: String,
    /// Which collection the target content item lives in.
    pub content_type: ContentKind,
    /// Target content item ID.
    pub content_id: String,
    /// Parent comment ID when this is a reply.
    pub parent_id: Option<String>,
}

/// Public author identity attached to comment views.
///
/// Deliberately a narrow projection: credentials never leave the service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    /// Author user ID.
    pub id: String,
    /// Author username.
    pub username: String,
    /// Author display name.
    pub name: Option<String>,
    /// Author avatar URL.
    pub avatar_url: Option<String>,
}

impl From<&user::Model> for CommentAuthor {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// A comment with its author resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Comment ID.
    pub id: String,
    /// Comment text.
    pub content: String,
    /// Resolved author, if the account still exists.
    pub author: Option<CommentAuthor>,
    /// Target collection.
    pub content_type: ContentKind,
    /// Target content item ID.
    pub content_id: String,
    /// Parent comment ID for replies.
    pub parent_id: Option<String>,
    /// Reply count.
    pub reply_count: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl CommentView {
    fn from_model(model: comment::Model, author: Option<CommentAuthor>) -> Self {
        Self {
            id: model.id,
            content: model.content,
            author,
            content_type: model.content_type,
            content_id: model.content_id,
            parent_id: model.parent_id,
            reply_count: model.reply_count,
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.map(|t| t.to_utc()),
        }
    }
}

/// A page of top-level comments plus pagination totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentListPage {
    /// Comments on this page.
    pub comments: Vec<CommentView>,
    /// Total active top-level comments on the content item.
    pub total: u64,
    /// Total page count.
    pub pages: u64,
}

/// A flagged comment with its flag records, for the moderation queue.
#[derive(Debug, Clone)]
pub struct FlaggedComment {
    /// The flagged comment.
    pub comment: comment::Model,
    /// Flags raised against it.
    pub flags: Vec<comment_flag::Model>,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    user_repo: UserRepository,
    registry: ContentRegistry,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        user_repo: UserRepository,
        registry: ContentRegistry,
    ) -> Self {
        Self {
            comment_repo,
            user_repo,
            registry,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a comment or a reply.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreateCommentInput,
    ) -> AppResult<CommentView> {
        let content = input.content.trim();
        validate_content(content, input.parent_id.is_some())?;

        self.registry
            .ensure_exists(input.content_type, &input.content_id)
            .await?;

        if let Some(parent_id) = &input.parent_id {
            let parent = self.comment_repo.get_by_id(parent_id).await?;
            if parent.status == CommentStatus::Deleted {
                return Err(AppError::CommentNotFound(parent_id.clone()));
            }
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(content.to_string()),
            user_id: Set(author.id.clone()),
            content_type: Set(input.content_type),
            content_id: Set(input.content_id.clone()),
            parent_id: Set(input.parent_id.clone()),
            status: Set(CommentStatus::Active),
            reply_count: Set(0),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.comment_repo.create(model).await?;

        // Counter updates are separate atomic statements; under concurrent
        // failures they can drift from the true count.
        self.registry
            .increment_comment_count(input.content_type, &input.content_id)
            .await?;

        if let Some(parent_id) = &input.parent_id {
            self.comment_repo.increment_reply_count(parent_id).await?;
        }

        tracing::debug!(
            comment_id = %created.id,
            content_type = ?created.content_type,
            content_id = %created.content_id,
            is_reply = created.parent_id.is_some(),
            "Created comment"
        );

        Ok(CommentView::from_model(created, Some(author.into())))
    }

    /// List active top-level comments on a content item (newest first).
    pub async fn list(
        &self,
        content_type: ContentKind,
        content_id: &str,
        page: u64,
        page_size: u64,
    ) -> AppResult<CommentListPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);

        let result = self
            .comment_repo
            .list_top_level(content_type, content_id, page, page_size)
            .await?;

        let comments = self.resolve_authors(result.items).await?;

        Ok(CommentListPage {
            comments,
            total: result.total,
            pages: result.pages,
        })
    }

    /// List active replies of a comment (oldest first).
    pub async fn list_replies(&self, comment_id: &str) -> AppResult<Vec<CommentView>> {
        // Make a missing thread root a 404 rather than an empty list
        self.comment_repo.get_by_id(comment_id).await?;

        let replies = self.comment_repo.list_replies(comment_id).await?;
        self.resolve_authors(replies).await
    }

    /// Update a comment's content. Only the author may edit.
    pub async fn update(
        &self,
        comment_id: &str,
        new_content: &str,
        acting_user: &user::Model,
    ) -> AppResult<CommentView> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.status == CommentStatus::Deleted {
            return Err(AppError::CommentNotFound(comment_id.to_string()));
        }

        if comment.user_id != acting_user.id {
            return Err(AppError::Forbidden(
                "Only the author may edit a comment".to_string(),
            ));
        }

        let content = new_content.trim();
        validate_content(content, comment.parent_id.is_some())?;

        let mut active: comment::ActiveModel = comment.into();
        active.content = Set(content.to_string());
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        let updated = self.comment_repo.update(active).await?;

        Ok(CommentView::from_model(updated, Some(acting_user.into())))
    }

    /// Soft-delete a comment. The author or an admin may delete.
    pub async fn delete(&self, comment_id: &str, acting_user: &user::Model) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.status == CommentStatus::Deleted {
            return Err(AppError::CommentNotFound(comment_id.to_string()));
        }

        super::access::ensure_can_mutate(&comment.user_id, acting_user)?;

        let content_type = comment.content_type;
        let content_id = comment.content_id.clone();

        let mut active: comment::ActiveModel = comment.into();
        active.status = Set(CommentStatus::Deleted);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        self.comment_repo.update(active).await?;

        // Deleting a reply leaves the parent's reply_count as-is; only the
        // content item's comment_count tracks deletions.
        self.registry
            .decrement_comment_count(content_type, &content_id)
            .await?;

        tracing::debug!(comment_id = %comment_id, "Soft-deleted comment");

        Ok(())
    }

    /// Flag a comment for moderation. Idempotent per user.
    pub async fn flag(
        &self,
        comment_id: &str,
        flagging_user_id: &str,
        reason: &str,
    ) -> AppResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "Flag reason must not be empty".to_string(),
            ));
        }
        if reason.chars().count() > MAX_FLAG_REASON_LEN {
            return Err(AppError::Validation(format!(
                "Flag reason must be at most {MAX_FLAG_REASON_LEN} characters"
            )));
        }

        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.status == CommentStatus::Deleted {
            return Err(AppError::CommentNotFound(comment_id.to_string()));
        }

        if self
            .comment_repo
            .has_flagged(comment_id, flagging_user_id)
            .await?
        {
            return Ok(());
        }

        let model = comment_flag::ActiveModel {
            id: Set(self.id_gen.generate()),
            comment_id: Set(comment_id.to_string()),
            user_id: Set(flagging_user_id.to_string()),
            reason: Set(reason.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        self.comment_repo.create_flag(model).await?;

        tracing::info!(comment_id = %comment_id, "Comment flagged");

        Ok(())
    }

    /// Set a comment's moderation status (admin only).
    ///
    /// Only `active` and `hidden` are valid here; deletion goes through
    /// [`Self::delete`] so the content item's comment count stays right.
    pub async fn set_status(
        &self,
        comment_id: &str,
        status: CommentStatus,
        acting_user: &user::Model,
    ) -> AppResult<()> {
        super::access::ensure_admin(acting_user)?;

        if status == CommentStatus::Deleted {
            return Err(AppError::BadRequest(
                "Use the delete operation to remove a comment".to_string(),
            ));
        }

        let comment = self.comment_repo.get_by_id(comment_id).await?;
        if comment.status == CommentStatus::Deleted {
            return Err(AppError::CommentNotFound(comment_id.to_string()));
        }

        let mut active: comment::ActiveModel = comment.into();
        active.status = Set(status);
        active.updated_at = Set(Some(chrono::Utc::now().into()));
        self.comment_repo.update(active).await?;

        Ok(())
    }

    /// Fetch recently flagged comments with their flags (moderation queue).
    pub async fn flagged_queue(&self, limit: u64) -> AppResult<Vec<FlaggedComment>> {
        let ids = self.comment_repo.list_flagged_comment_ids(limit).await?;
        let comments = self.comment_repo.find_by_ids(&ids).await?;

        let mut queue = Vec::with_capacity(comments.len());
        for comment in comments {
            if comment.status == CommentStatus::Deleted {
                continue;
            }
            let flags = self.comment_repo.list_flags(&comment.id).await?;
            queue.push(FlaggedComment { comment, flags });
        }
        Ok(queue)
    }

    /// Resolve author identities for a batch of comments.
    async fn resolve_authors(&self, comments: Vec<comment::Model>) -> AppResult<Vec<CommentView>> {
        let mut user_ids: Vec<String> = comments.iter().map(|c| c.user_id.clone()).collect();
        user_ids.sort();
        user_ids.dedup();

        let users = self.user_repo.find_by_ids(&user_ids).await?;
        let by_id: HashMap<String, &user::Model> =
            users.iter().map(|u| (u.id.clone(), u)).collect();

        Ok(comments
            .into_iter()
            .map(|c| {
                let author = by_id.get(&c.user_id).map(|u| CommentAuthor::from(*u));
                CommentView::from_model(c, author)
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_db::entities::event;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    // Unit tests for content validation

    #[test]
    fn test_empty_content_rejected() {
        assert!(matches!(
            validate_content("", false),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_top_level_accepts_up_to_max() {
        let content = "a".repeat(MAX_COMMENT_LEN);
        assert!(validate_content(&content, false).is_ok());

        let too_long = "a".repeat(MAX_COMMENT_LEN + 1);
        assert!(matches!(
            validate_content(&too_long, false),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_reply_capped_at_reply_max() {
        let content = "a".repeat(MAX_REPLY_LEN);
        assert!(validate_content(&content, true).is_ok());

        let too_long = "a".repeat(MAX_REPLY_LEN + 1);
        assert!(matches!(
            validate_content(&too_long, true),
            Err(AppError::Validation(_))
        ));

        // The same length is fine as a top-level comment
        assert!(validate_content(&too_long, false).is_ok());
    }

    // Service tests

    fn test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: format!("user-{id}"),
            username_lower: format!("user-{id}"),
            email: format!("{id}@example.com"),
            name: Some("Test User".to_string()),
            password_hash: "hash".to_string(),
            token: None,
            avatar_url: None,
            bio: None,
            is_admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_event(id: &str) -> event::Model {
        event::Model {
            id: id.to_string(),
            user_id: "owner".to_string(),
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

    fn test_comment(id: &str, parent_id: Option<&str>, status: CommentStatus) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            content: "Nice event!".to_string(),
            user_id: "u1".to_string(),
            content_type: ContentKind::Event,
            content_id: "e1".to_string(),
            parent_id: parent_id.map(ToString::to_string),
            status,
            reply_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<DatabaseConnection>) -> CommentService {
        CommentService::new(
            CommentRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            ContentRegistry::new(db),
        )
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    #[tokio::test]
    async fn test_create_top_level_increments_content_counter() {
        let created = test_comment("c1", None, CommentStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // content item lookup
                .append_query_results([[test_event("e1")]])
                // insert returning
                .append_query_results([[created]])
                // comment_count increment
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let service = service_with(db);
        let author = test_user("u1", false);
        let view = service
            .create(
                &author,
                CreateCommentInput {
                    content: "Nice event!".to_string(),
                    content_type: ContentKind::Event,
                    content_id: "e1".to_string(),
                    parent_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(view.id, "c1");
        assert_eq!(view.author.unwrap().username, "user-u1");
    }

    #[tokio::test]
    async fn test_create_reply_increments_both_counters() {
        let parent = test_comment("c1", None, CommentStatus::Active);
        let reply = test_comment("c2", Some("c1"), CommentStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_event("e1")]])
                .append_query_results([[parent]])
                .append_query_results([[reply]])
                // comment_count increment, reply_count increment
                .append_exec_results([exec_ok(), exec_ok()])
                .into_connection(),
        );

        let service = service_with(db);
        let author = test_user("u1", false);
        let view = service
            .create(
                &author,
                CreateCommentInput {
                    content: "Agreed".to_string(),
                    content_type: ContentKind::Event,
                    content_id: "e1".to_string(),
                    parent_id: Some("c1".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(view.parent_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_create_missing_content_item() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<event::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let author = test_user("u1", false);
        let result = service
            .create(
                &author,
                CreateCommentInput {
                    content: "Hello".to_string(),
                    content_type: ContentKind::Event,
                    content_id: "missing".to_string(),
                    parent_id: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_reply_to_deleted_parent() {
        let parent = test_comment("c1", None, CommentStatus::Deleted);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_event("e1")]])
                .append_query_results([[parent]])
                .into_connection(),
        );

        let service = service_with(db);
        let author = test_user("u1", false);
        let result = service
            .create(
                &author,
                CreateCommentInput {
                    content: "Agreed".to_string(),
                    content_type: ContentKind::Event,
                    content_id: "e1".to_string(),
                    parent_id: Some("c1".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_reply_too_long() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let author = test_user("u1", false);
        let result = service
            .create(
                &author,
                CreateCommentInput {
                    content: "a".repeat(MAX_REPLY_LEN + 1),
                    content_type: ContentKind::Event,
                    content_id: "e1".to_string(),
                    parent_id: Some("c1".to_string()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_by_non_author_forbidden() {
        let comment = test_comment("c1", None, CommentStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .into_connection(),
        );

        let service = service_with(db);
        let other = test_user("u2", false);
        let result = service.update("c1", "Edited", &other).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_forbidden() {
        let comment = test_comment("c1", None, CommentStatus::Active);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .into_connection(),
        );

        let service = service_with(db);
        let other = test_user("u2", false);
        let result = service.delete("c1", &other).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_by_admin_succeeds() {
        let comment = test_comment("c1", None, CommentStatus::Active);
        let mut deleted = comment.clone();
        deleted.status = CommentStatus::Deleted;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                // update returning
                .append_query_results([[deleted]])
                // comment_count decrement
                .append_exec_results([exec_ok()])
                .into_connection(),
        );

        let service = service_with(db);
        let admin = test_user("admin", true);
        assert!(service.delete("c1", &admin).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_already_deleted_is_not_found() {
        let comment = test_comment("c1", None, CommentStatus::Deleted);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .into_connection(),
        );

        let service = service_with(db);
        let admin = test_user("admin", true);
        let result = service.delete("c1", &admin).await;

        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_flag_is_idempotent_per_user() {
        let comment = test_comment("c1", None, CommentStatus::Active);
        let existing_flag = comment_flag::Model {
            id: "f1".to_string(),
            comment_id: "c1".to_string(),
            user_id: "u2".to_string(),
            reason: "spam".to_string(),
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .append_query_results([[existing_flag]])
                .into_connection(),
        );

        let service = service_with(db);
        // No insert mocked: flagging again must short-circuit
        assert!(service.flag("c1", "u2", "spam again").await.is_ok());
    }

    #[tokio::test]
    async fn test_flag_empty_reason_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let result = service.flag("c1", "u2", "   ").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_status_requires_admin() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let user = test_user("u1", false);
        let result = service
            .set_status("c1", CommentStatus::Hidden, &user)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
