//! Reaction service.
//!
//! One toggle implementation covers every reaction target: events, news
//! articles, directory listings, and comments. Targets are addressed by
//! [`TargetType`] + id and resolved through the content registry, so no
//! caller ever duplicates the like/dislike logic per collection.

use agora_common::{AppError, AppResult, IdGenerator};
use agora_db::{
    entities::{
        comment::{CommentStatus, ContentKind},
        reaction::{self, ReactionKind, TargetType},
    },
    repositories::{CommentRepository, ContentRegistry, ReactionRepository},
};
use sea_orm::Set;

/// What a toggle request does, given the user's current reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// No current reaction: add the requested one.
    Add,
    /// Current reaction matches the request: retract it.
    Remove,
    /// Current reaction is the opposite kind: switch it.
    Switch,
}

/// Decide what a toggle request does.
///
/// The toggle is its own inverse, and a user never holds both kinds at
/// once: requesting the kind already held removes it, requesting the
/// opposite kind replaces it.
#[must_use]
pub const fn resolve_toggle(
    existing: Option<ReactionKind>,
    requested: ReactionKind,
) -> ToggleAction {
    match (existing, requested) {
        (None, _) => ToggleAction::Add,
        (Some(ReactionKind::Like), ReactionKind::Like)
        | (Some(ReactionKind::Dislike), ReactionKind::Dislike) => ToggleAction::Remove,
        _ => ToggleAction::Switch,
    }
}

/// Result of a toggle: the new totals and the user's reaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSummary {
    /// Number of likes on the target.
    pub likes: u64,
    /// Number of dislikes on the target.
    pub dislikes: u64,
    /// The acting user's reaction after the toggle, if any.
    pub user_reaction: Option<ReactionKind>,
}

/// Reaction service for business logic.
#[derive(Clone)]
pub struct ReactionService {
    reaction_repo: ReactionRepository,
    comment_repo: CommentRepository,
    registry: ContentRegistry,
    id_gen: IdGenerator,
}

impl ReactionService {
    /// Create a new reaction service.
    #[must_use]
    pub const fn new(
        reaction_repo: ReactionRepository,
        comment_repo: CommentRepository,
        registry: ContentRegistry,
    ) -> Self {
        Self {
            reaction_repo,
            comment_repo,
            registry,
            id_gen: IdGenerator::new(),
        }
    }

    /// Toggle a user's reaction on a target.
    pub async fn toggle(
        &self,
        user_id: &str,
        target_type: TargetType,
        target_id: &str,
        kind: ReactionKind,
    ) -> AppResult<ReactionSummary> {
        self.ensure_target_exists(target_type, target_id).await?;

        let existing = self
            .reaction_repo
            .find_by_user_and_target(user_id, target_type, target_id)
            .await?;

        let action = resolve_toggle(existing.as_ref().map(|r| r.kind), kind);
        let user_reaction = match action {
            ToggleAction::Add => {
                let model = reaction::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    user_id: Set(user_id.to_string()),
                    target_type: Set(target_type),
                    target_id: Set(target_id.to_string()),
                    kind: Set(kind),
                    created_at: Set(chrono::Utc::now().into()),
                };
                self.reaction_repo.create(model).await?;
                Some(kind)
            }
            ToggleAction::Remove => {
                // Remove only resolves when a reaction row exists
                if let Some(existing) = existing {
                    self.reaction_repo.delete(existing).await?;
                }
                None
            }
            ToggleAction::Switch => {
                if let Some(existing) = existing {
                    let mut active: reaction::ActiveModel = existing.into();
                    active.kind = Set(kind);
                    self.reaction_repo.update(active).await?;
                }
                Some(kind)
            }
        };

        let counts = self
            .reaction_repo
            .counts_for_target(target_type, target_id)
            .await?;

        tracing::debug!(
            user_id = %user_id,
            target = ?target_type,
            target_id = %target_id,
            action = ?action,
            "Toggled reaction"
        );

        Ok(ReactionSummary {
            likes: counts.likes,
            dislikes: counts.dislikes,
            user_reaction,
        })
    }

    /// Get reaction counts on a target, plus the viewing user's state.
    pub async fn summary(
        &self,
        viewer_id: Option<&str>,
        target_type: TargetType,
        target_id: &str,
    ) -> AppResult<ReactionSummary> {
        let counts = self
            .reaction_repo
            .counts_for_target(target_type, target_id)
            .await?;

        let user_reaction = match viewer_id {
            Some(viewer_id) => self
                .reaction_repo
                .find_by_user_and_target(viewer_id, target_type, target_id)
                .await?
                .map(|r| r.kind),
            None => None,
        };

        Ok(ReactionSummary {
            likes: counts.likes,
            dislikes: counts.dislikes,
            user_reaction,
        })
    }

    /// Verify the toggle target exists and can accept reactions.
    async fn ensure_target_exists(
        &self,
        target_type: TargetType,
        target_id: &str,
    ) -> AppResult<()> {
        match target_type {
            TargetType::Comment => {
                let comment = self.comment_repo.get_by_id(target_id).await?;
                if comment.status == CommentStatus::Deleted {
                    return Err(AppError::CommentNotFound(target_id.to_string()));
                }
                Ok(())
            }
            TargetType::Event => self.registry.ensure_exists(ContentKind::Event, target_id).await,
            TargetType::News => self.registry.ensure_exists(ContentKind::News, target_id).await,
            TargetType::Directory => {
                self.registry
                    .ensure_exists(ContentKind::Directory, target_id)
                    .await
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_db::entities::{comment, event};
    use chrono::{NaiveDate, Utc};
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    // Unit tests for the toggle decision

    #[test]
    fn test_toggle_adds_when_absent() {
        assert_eq!(
            resolve_toggle(None, ReactionKind::Like),
            ToggleAction::Add
        );
        assert_eq!(
            resolve_toggle(None, ReactionKind::Dislike),
            ToggleAction::Add
        );
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        // Same kind again retracts the reaction
        assert_eq!(
            resolve_toggle(Some(ReactionKind::Like), ReactionKind::Like),
            ToggleAction::Remove
        );
        assert_eq!(
            resolve_toggle(Some(ReactionKind::Dislike), ReactionKind::Dislike),
            ToggleAction::Remove
        );
    }

    #[test]
    fn test_toggle_switches_opposite_kind() {
        assert_eq!(
            resolve_toggle(Some(ReactionKind::Like), ReactionKind::Dislike),
            ToggleAction::Switch
        );
        assert_eq!(
            resolve_toggle(Some(ReactionKind::Dislike), ReactionKind::Like),
            ToggleAction::Switch
        );
    }

    // Service tests

    fn create_test_event(id: &str) -> event::Model {
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

    fn create_test_reaction(
        id: &str,
        user_id: &str,
        target_id: &str,
        kind: ReactionKind,
    ) -> reaction::Model {
        reaction::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            target_type: TargetType::Event,
            target_id: target_id.to_string(),
            kind,
            created_at: Utc::now().into(),
        }
    }

    fn create_deleted_comment(id: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            content: "gone".to_string(),
            user_id: "u1".to_string(),
            content_type: ContentKind::Event,
            content_id: "e1".to_string(),
            parent_id: None,
            status: CommentStatus::Deleted,
            reply_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count_row(n: i64) -> std::collections::BTreeMap<&'static str, Value> {
        btreemap! { "num_items" => Into::<Value>::into(n) }
    }

    fn service_with(db: Arc<DatabaseConnection>) -> ReactionService {
        ReactionService::new(
            ReactionRepository::new(Arc::clone(&db)),
            CommentRepository::new(Arc::clone(&db)),
            ContentRegistry::new(db),
        )
    }

    #[tokio::test]
    async fn test_toggle_target_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<event::Model>::new()])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .toggle("u1", TargetType::Event, "missing", ReactionKind::Like)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_deleted_comment_rejected() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_deleted_comment("c1")]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service
            .toggle("u1", TargetType::Comment, "c1", ReactionKind::Like)
            .await;

        assert!(matches!(result, Err(AppError::CommentNotFound(_))));
    }

    #[tokio::test]
    async fn test_toggle_adds_new_reaction() {
        let created = create_test_reaction("r1", "u1", "e1", ReactionKind::Like);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // target lookup
                .append_query_results([[create_test_event("e1")]])
                // no existing reaction
                .append_query_results([Vec::<reaction::Model>::new()])
                // insert returning
                .append_query_results([[created]])
                // like count, dislike count
                .append_query_results([[count_row(1)], [count_row(0)]])
                .into_connection(),
        );

        let service = service_with(db);
        let summary = service
            .toggle("u1", TargetType::Event, "e1", ReactionKind::Like)
            .await
            .unwrap();

        assert_eq!(summary.likes, 1);
        assert_eq!(summary.dislikes, 0);
        assert_eq!(summary.user_reaction, Some(ReactionKind::Like));
    }

    #[tokio::test]
    async fn test_toggle_removes_existing_reaction() {
        let existing = create_test_reaction("r1", "u1", "e1", ReactionKind::Like);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_event("e1")]])
                .append_query_results([[existing]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[count_row(0)], [count_row(0)]])
                .into_connection(),
        );

        let service = service_with(db);
        let summary = service
            .toggle("u1", TargetType::Event, "e1", ReactionKind::Like)
            .await
            .unwrap();

        assert_eq!(summary.likes, 0);
        assert_eq!(summary.user_reaction, None);
    }

    #[tokio::test]
    async fn test_toggle_switches_kinds() {
        let existing = create_test_reaction("r1", "u1", "e1", ReactionKind::Like);
        let switched = create_test_reaction("r1", "u1", "e1", ReactionKind::Dislike);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_event("e1")]])
                .append_query_results([[existing]])
                // update returning
                .append_query_results([[switched]])
                .append_query_results([[count_row(0)], [count_row(1)]])
                .into_connection(),
        );

        let service = service_with(db);
        let summary = service
            .toggle("u1", TargetType::Event, "e1", ReactionKind::Dislike)
            .await
            .unwrap();

        assert_eq!(summary.likes, 0);
        assert_eq!(summary.dislikes, 1);
        assert_eq!(summary.user_reaction, Some(ReactionKind::Dislike));
    }
}
