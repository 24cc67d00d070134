//! Directory service.

use agora_common::{AppResult, IdGenerator};
use agora_db::{
    entities::{directory_listing, reaction::TargetType, user},
    repositories::{DirectoryRepository, ListingPage, ReactionRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a directory listing.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingInput {
    /// Business name.
    #[validate(length(min = 1, max = 256))]
    pub name: String,

    /// Business description.
    #[validate(length(min = 1, max = 20000))]
    pub description: String,

    /// Category slug.
    #[validate(length(min = 1, max = 128))]
    pub category: String,

    /// Website URL.
    #[validate(url)]
    pub website: Option<String>,

    /// Contact phone number.
    #[validate(length(max = 64))]
    pub phone: Option<String>,

    /// Street address.
    #[validate(length(max = 512))]
    pub address: Option<String>,
}

/// Input for updating a directory listing.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingInput {
    /// New business name.
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,

    /// New description.
    #[validate(length(min = 1, max = 20000))]
    pub description: Option<String>,

    /// New category slug.
    #[validate(length(min = 1, max = 128))]
    pub category: Option<String>,

    /// New website URL.
    pub website: Option<Option<String>>,

    /// New phone number.
    pub phone: Option<Option<String>>,

    /// New address.
    pub address: Option<Option<String>>,
}

/// Directory service for business logic.
#[derive(Clone)]
pub struct DirectoryService {
    directory_repo: DirectoryRepository,
    reaction_repo: ReactionRepository,
    id_gen: IdGenerator,
}

impl DirectoryService {
    /// Create a new directory service.
    #[must_use]
    pub const fn new(
        directory_repo: DirectoryRepository,
        reaction_repo: ReactionRepository,
    ) -> Self {
        Self {
            directory_repo,
            reaction_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new listing owned by `owner`.
    pub async fn create(
        &self,
        owner: &user::Model,
        input: CreateListingInput,
    ) -> AppResult<directory_listing::Model> {
        input.validate()?;

        let model = directory_listing::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner.id.clone()),
            name: Set(input.name),
            description: Set(input.description),
            category: Set(input.category),
            website: Set(input.website),
            phone: Set(input.phone),
            address: Set(input.address),
            comment_count: Set(0),
            view_count: Set(0),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.directory_repo.create(model).await
    }

    /// Get a listing by ID.
    pub async fn get(&self, id: &str) -> AppResult<directory_listing::Model> {
        self.directory_repo.get_by_id(id).await
    }

    /// Record a view on a listing.
    pub async fn track_view(&self, id: &str) -> AppResult<()> {
        self.directory_repo.increment_view_count(id).await
    }

    /// List listings, optionally filtered by category.
    pub async fn list(
        &self,
        category: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> AppResult<ListingPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        self.directory_repo.list(category, page, page_size).await
    }

    /// Update a listing. Owner or admin only.
    pub async fn update(
        &self,
        id: &str,
        acting_user: &user::Model,
        input: UpdateListingInput,
    ) -> AppResult<directory_listing::Model> {
        input.validate()?;

        let listing = self.directory_repo.get_by_id(id).await?;
        super::access::ensure_can_mutate(&listing.user_id, acting_user)?;

        let mut active: directory_listing::ActiveModel = listing.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(website) = input.website {
            active.website = Set(website);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.directory_repo.update(active).await
    }

    /// Delete a listing. Owner or admin only.
    pub async fn delete(&self, id: &str, acting_user: &user::Model) -> AppResult<()> {
        let listing = self.directory_repo.get_by_id(id).await?;
        super::access::ensure_can_mutate(&listing.user_id, acting_user)?;

        self.directory_repo.delete(id).await?;
        self.reaction_repo
            .delete_for_target(TargetType::Directory, id)
            .await?;

        tracing::info!(listing_id = %id, "Deleted directory listing");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_common::AppError;
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

    fn test_listing(id: &str, owner: &str) -> directory_listing::Model {
        directory_listing::Model {
            id: id.to_string(),
            user_id: owner.to_string(),
            name: "Corner Bakery".to_string(),
            description: "Fresh bread daily".to_string(),
            category: "food".to_string(),
            website: None,
            phone: None,
            address: None,
            comment_count: 0,
            view_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(db: Arc<DatabaseConnection>) -> DirectoryService {
        DirectoryService::new(
            DirectoryRepository::new(Arc::clone(&db)),
            ReactionRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_forbidden() {
        let listing = test_listing("d1", "owner");
        let other = test_user("u2", false);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[listing]])
                .into_connection(),
        );

        let service = service_with(db);
        let result = service.delete("d1", &other).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_website_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(db);
        let owner = test_user("u1", false);
        let result = service
            .create(
                &owner,
                CreateListingInput {
                    name: "Shop".to_string(),
                    description: "A shop".to_string(),
                    category: "retail".to_string(),
                    website: Some("not a url".to_string()),
                    phone: None,
                    address: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
