//! Directory listing repository.

use std::sync::Arc;

use crate::entities::{directory_listing, DirectoryListing};
use agora_common::{AppError, AppResult};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Page of listings plus pagination totals.
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// Listings on this page.
    pub items: Vec<directory_listing::Model>,
    /// Total matching listings.
    pub total: u64,
    /// Total page count.
    pub pages: u64,
}

/// Directory listing repository for database operations.
#[derive(Clone)]
pub struct DirectoryRepository {
    db: Arc<DatabaseConnection>,
}

impl DirectoryRepository {
    /// Create a new directory repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a listing by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<directory_listing::Model>> {
        DirectoryListing::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a listing by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<directory_listing::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Directory listing not found: {id}")))
    }

    /// Create a new listing.
    pub async fn create(
        &self,
        model: directory_listing::ActiveModel,
    ) -> AppResult<directory_listing::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a listing.
    pub async fn update(
        &self,
        model: directory_listing::ActiveModel,
    ) -> AppResult<directory_listing::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a listing.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        DirectoryListing::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List listings (alphabetical), optionally filtered by category.
    pub async fn list(
        &self,
        category: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> AppResult<ListingPage> {
        let mut query = DirectoryListing::find().order_by_asc(directory_listing::Column::Name);

        if let Some(category) = category {
            query = query.filter(directory_listing::Column::Category.eq(category));
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

        Ok(ListingPage {
            items,
            total: totals.number_of_items,
            pages: totals.number_of_pages,
        })
    }

    /// Increment comment count atomically (single UPDATE query, no fetch).
    pub async fn increment_comment_count(&self, listing_id: &str) -> AppResult<()> {
        DirectoryListing::update_many()
            .col_expr(
                directory_listing::Column::CommentCount,
                Expr::col(directory_listing::Column::CommentCount).add(1),
            )
            .filter(directory_listing::Column::Id.eq(listing_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement comment count atomically (single UPDATE query, no fetch).
    pub async fn decrement_comment_count(&self, listing_id: &str) -> AppResult<()> {
        DirectoryListing::update_many()
            .col_expr(
                directory_listing::Column::CommentCount,
                Expr::cust("GREATEST(comment_count - 1, 0)"),
            )
            .filter(directory_listing::Column::Id.eq(listing_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment view count atomically.
    pub async fn increment_view_count(&self, listing_id: &str) -> AppResult<()> {
        DirectoryListing::update_many()
            .col_expr(
                directory_listing::Column::ViewCount,
                Expr::col(directory_listing::Column::ViewCount).add(1),
            )
            .filter(directory_listing::Column::Id.eq(listing_id))
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

    fn create_test_listing(id: &str, category: &str) -> directory_listing::Model {
        directory_listing::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: "Corner Bakery".to_string(),
            description: "Fresh bread daily".to_string(),
            category: category.to_string(),
            website: None,
            phone: None,
            address: None,
            comment_count: 0,
            view_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let listing = create_test_listing("d1", "food");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[listing]])
                .into_connection(),
        );

        let repo = DirectoryRepository::new(db);
        let result = repo.find_by_id("d1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().category, "food");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<directory_listing::Model>::new()])
                .into_connection(),
        );

        let repo = DirectoryRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
