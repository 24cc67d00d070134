//! Team member repository.

use std::sync::Arc;

use crate::entities::{team_member, TeamMember};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Team member repository for database operations.
#[derive(Clone)]
pub struct TeamMemberRepository {
    db: Arc<DatabaseConnection>,
}

impl TeamMemberRepository {
    /// Create a new team member repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a team member by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<team_member::Model>> {
        TeamMember::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a team member by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<team_member::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team member not found: {id}")))
    }

    /// List active team members ordered for display.
    pub async fn list_active(&self) -> AppResult<Vec<team_member::Model>> {
        TeamMember::find()
            .filter(team_member::Column::IsActive.eq(true))
            .order_by_asc(team_member::Column::DisplayOrder)
            .order_by_asc(team_member::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all team members (admin view).
    pub async fn list_all(&self) -> AppResult<Vec<team_member::Model>> {
        TeamMember::find()
            .order_by_asc(team_member::Column::DisplayOrder)
            .order_by_asc(team_member::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new team member.
    pub async fn create(&self, model: team_member::ActiveModel) -> AppResult<team_member::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a team member.
    pub async fn update(&self, model: team_member::ActiveModel) -> AppResult<team_member::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a team member.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        TeamMember::delete_by_id(id)
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

    fn create_test_member(id: &str, order: i32) -> team_member::Model {
        team_member::Model {
            id: id.to_string(),
            name: "Jordan".to_string(),
            role: "Coordinator".to_string(),
            bio: None,
            photo_url: None,
            display_order: order,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_active() {
        let m1 = create_test_member("t1", 0);
        let m2 = create_test_member("t2", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[m1, m2]])
                .into_connection(),
        );

        let repo = TeamMemberRepository::new(db);
        let result = repo.list_active().await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<team_member::Model>::new()])
                .into_connection(),
        );

        let repo = TeamMemberRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
