//! Reaction repository.

use std::sync::Arc;

use crate::entities::{
    reaction::{self, ReactionKind, TargetType},
    Reaction,
};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter,
};

/// Like and dislike totals for a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionCounts {
    /// Number of likes.
    pub likes: u64,
    /// Number of dislikes.
    pub dislikes: u64,
}

/// Reaction repository for database operations.
#[derive(Clone)]
pub struct ReactionRepository {
    db: Arc<DatabaseConnection>,
}

impl ReactionRepository {
    /// Create a new reaction repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user's reaction on a target.
    pub async fn find_by_user_and_target(
        &self,
        user_id: &str,
        target_type: TargetType,
        target_id: &str,
    ) -> AppResult<Option<reaction::Model>> {
        Reaction::find()
            .filter(reaction::Column::UserId.eq(user_id))
            .filter(reaction::Column::TargetType.eq(target_type))
            .filter(reaction::Column::TargetId.eq(target_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new reaction.
    pub async fn create(&self, model: reaction::ActiveModel) -> AppResult<reaction::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a reaction (used when switching like <-> dislike).
    pub async fn update(&self, model: reaction::ActiveModel) -> AppResult<reaction::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a reaction.
    pub async fn delete(&self, model: reaction::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count reactions of one kind on a target.
    pub async fn count_by_kind(
        &self,
        target_type: TargetType,
        target_id: &str,
        kind: ReactionKind,
    ) -> AppResult<u64> {
        Reaction::find()
            .filter(reaction::Column::TargetType.eq(target_type))
            .filter(reaction::Column::TargetId.eq(target_id))
            .filter(reaction::Column::Kind.eq(kind))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count likes and dislikes on a target.
    pub async fn counts_for_target(
        &self,
        target_type: TargetType,
        target_id: &str,
    ) -> AppResult<ReactionCounts> {
        let likes = self
            .count_by_kind(target_type, target_id, ReactionKind::Like)
            .await?;
        let dislikes = self
            .count_by_kind(target_type, target_id, ReactionKind::Dislike)
            .await?;
        Ok(ReactionCounts { likes, dislikes })
    }

    /// Delete all reactions on a target (when the target is removed).
    pub async fn delete_for_target(
        &self,
        target_type: TargetType,
        target_id: &str,
    ) -> AppResult<u64> {
        let result = Reaction::delete_many()
            .filter(reaction::Column::TargetType.eq(target_type))
            .filter(reaction::Column::TargetId.eq(target_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

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

    #[tokio::test]
    async fn test_find_by_user_and_target_found() {
        let reaction = create_test_reaction("r1", "u1", "e1", ReactionKind::Like);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[reaction.clone()]])
                .into_connection(),
        );

        let repo = ReactionRepository::new(db);
        let result = repo
            .find_by_user_and_target("u1", TargetType::Event, "e1")
            .await
            .unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().kind, ReactionKind::Like);
    }

    #[tokio::test]
    async fn test_find_by_user_and_target_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<reaction::Model>::new()])
                .into_connection(),
        );

        let repo = ReactionRepository::new(db);
        let result = repo
            .find_by_user_and_target("u1", TargetType::News, "n1")
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
