//! Team service.

use agora_common::{AppResult, IdGenerator};
use agora_db::{entities::team_member, repositories::TeamMemberRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a team member entry.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamMemberInput {
    /// Member name.
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    /// Role title.
    #[validate(length(min = 1, max = 128))]
    pub role: String,

    /// Short bio.
    #[validate(length(max = 4096))]
    pub bio: Option<String>,

    /// Photo URL.
    #[validate(length(max = 512))]
    pub photo_url: Option<String>,

    /// Display order on the team page.
    #[serde(default)]
    pub display_order: i32,
}

/// Input for updating a team member entry.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamMemberInput {
    /// New name.
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    /// New role title.
    #[validate(length(min = 1, max = 128))]
    pub role: Option<String>,

    /// New bio.
    pub bio: Option<Option<String>>,

    /// New photo URL.
    pub photo_url: Option<Option<String>>,

    /// New display order.
    pub display_order: Option<i32>,

    /// Show or hide on the public page.
    pub is_active: Option<bool>,
}

/// Team service for business logic.
#[derive(Clone)]
pub struct TeamService {
    team_repo: TeamMemberRepository,
    id_gen: IdGenerator,
}

impl TeamService {
    /// Create a new team service.
    #[must_use]
    pub const fn new(team_repo: TeamMemberRepository) -> Self {
        Self {
            team_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// List active team members for the public page.
    pub async fn list_active(&self) -> AppResult<Vec<team_member::Model>> {
        self.team_repo.list_active().await
    }

    /// List all team members (admin view).
    pub async fn list_all(&self) -> AppResult<Vec<team_member::Model>> {
        self.team_repo.list_all().await
    }

    /// Get a team member by ID.
    pub async fn get(&self, id: &str) -> AppResult<team_member::Model> {
        self.team_repo.get_by_id(id).await
    }

    /// Create a team member entry.
    pub async fn create(&self, input: CreateTeamMemberInput) -> AppResult<team_member::Model> {
        input.validate()?;

        let model = team_member::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            role: Set(input.role),
            bio: Set(input.bio),
            photo_url: Set(input.photo_url),
            display_order: Set(input.display_order),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.team_repo.create(model).await
    }

    /// Update a team member entry.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateTeamMemberInput,
    ) -> AppResult<team_member::Model> {
        input.validate()?;

        let member = self.team_repo.get_by_id(id).await?;
        let mut active: team_member::ActiveModel = member.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(role) = input.role {
            active.role = Set(role);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(bio);
        }
        if let Some(photo_url) = input.photo_url {
            active.photo_url = Set(photo_url);
        }
        if let Some(display_order) = input.display_order {
            active.display_order = Set(display_order);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.team_repo.update(active).await
    }

    /// Delete a team member entry.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.team_repo.get_by_id(id).await?;
        self.team_repo.delete(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_common::AppError;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_validates_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = TeamService::new(TeamMemberRepository::new(db));
        let result = service
            .create(CreateTeamMemberInput {
                name: String::new(),
                role: "Coordinator".to_string(),
                bio: None,
                photo_url: None,
                display_order: 0,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_active() {
        let member = team_member::Model {
            id: "t1".to_string(),
            name: "Jordan".to_string(),
            role: "Coordinator".to_string(),
            bio: None,
            photo_url: None,
            display_order: 0,
            is_active: true,
            created_at: Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[member]])
                .into_connection(),
        );

        let service = TeamService::new(TeamMemberRepository::new(db));
        let result = service.list_active().await.unwrap();

        assert_eq!(result.len(), 1);
    }
}
