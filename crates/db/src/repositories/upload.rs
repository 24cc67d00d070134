//! Upload repository.

use std::sync::Arc;

use crate::entities::{upload, Upload};
use agora_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// Upload repository for database operations.
#[derive(Clone)]
pub struct UploadRepository {
    db: Arc<DatabaseConnection>,
}

impl UploadRepository {
    /// Create a new upload repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an upload by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<upload::Model>> {
        Upload::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an upload by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<upload::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Upload not found: {id}")))
    }

    /// Create a new upload record.
    pub async fn create(&self, model: upload::ActiveModel) -> AppResult<upload::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an upload record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Upload::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List uploads by a user (newest first).
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<upload::Model>> {
        Upload::find()
            .filter(upload::Column::UserId.eq(user_id))
            .order_by_desc(upload::Column::Id)
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

    fn create_test_upload(id: &str, user_id: &str) -> upload::Model {
        upload::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            file_name: "photo.jpg".to_string(),
            key: format!("2026/08/06/{user_id}/{id}.jpg"),
            url: format!("/files/2026/08/06/{user_id}/{id}.jpg"),
            content_type: "image/jpeg".to_string(),
            size: 1024,
            md5: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let u1 = create_test_upload("f1", "u1");
        let u2 = create_test_upload("f2", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[u1, u2]])
                .into_connection(),
        );

        let repo = UploadRepository::new(db);
        let result = repo.find_by_user("u1", 10, 0).await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
