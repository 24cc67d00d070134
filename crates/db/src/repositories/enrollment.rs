//! Enrollment repository.

use std::sync::Arc;

use crate::entities::{
    enrollment::{self, EnrollmentStatus},
    Enrollment,
};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Enrollment repository for database operations.
#[derive(Clone)]
pub struct EnrollmentRepository {
    db: Arc<DatabaseConnection>,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an enrollment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<enrollment::Model>> {
        Enrollment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an enrollment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<enrollment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Enrollment not found: {id}")))
    }

    /// Create a new enrollment.
    pub async fn create(&self, model: enrollment::ActiveModel) -> AppResult<enrollment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an enrollment.
    pub async fn update(&self, model: enrollment::ActiveModel) -> AppResult<enrollment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List enrollments (newest first), optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<EnrollmentStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<enrollment::Model>> {
        let mut query = Enrollment::find().order_by_desc(enrollment::Column::Id);

        if let Some(status) = status {
            query = query.filter(enrollment::Column::Status.eq(status));
        }

        query
            .limit(limit)
            .offset(offset)
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
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_enrollment(id: &str, status: EnrollmentStatus) -> enrollment::Model {
        enrollment::Model {
            id: id.to_string(),
            course_name: "Pottery 101".to_string(),
            applicant_name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: None,
            message: None,
            status,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let e1 = create_test_enrollment("en1", EnrollmentStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1]])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        let result = repo
            .list(Some(EnrollmentStatus::Pending), 10, 0)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<enrollment::Model>::new()])
                .into_connection(),
        );

        let repo = EnrollmentRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
