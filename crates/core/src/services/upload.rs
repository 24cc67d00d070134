//! Upload service.

use std::sync::Arc;

use agora_common::{generate_storage_key, AppError, AppResult, IdGenerator, StorageBackend};
use agora_db::{
    entities::{upload, user},
    repositories::UploadRepository,
};
use sea_orm::Set;

/// Upload service for business logic.
#[derive(Clone)]
pub struct UploadService {
    upload_repo: UploadRepository,
    storage: Arc<dyn StorageBackend>,
    max_size: u64,
    id_gen: IdGenerator,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(
        upload_repo: UploadRepository,
        storage: Arc<dyn StorageBackend>,
        max_size: u64,
    ) -> Self {
        Self {
            upload_repo,
            storage,
            max_size,
            id_gen: IdGenerator::new(),
        }
    }

    /// Store a file and record its metadata.
    pub async fn store(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> AppResult<upload::Model> {
        if data.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }
        if data.len() as u64 > self.max_size {
            return Err(AppError::Validation(format!(
                "File exceeds the maximum size of {} bytes",
                self.max_size
            )));
        }

        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::Validation("File name is required".to_string()));
        }

        let key = generate_storage_key(user_id, file_name);
        let stored = self.storage.store(&key, data, content_type).await?;

        let model = upload::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            file_name: Set(file_name.to_string()),
            key: Set(stored.key),
            url: Set(stored.url),
            content_type: Set(stored.content_type),
            size: Set(stored.size as i64),
            md5: Set(stored.md5),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.upload_repo.create(model).await?;

        tracing::debug!(upload_id = %created.id, size = created.size, "Stored upload");

        Ok(created)
    }

    /// Get an upload record by ID.
    pub async fn get(&self, id: &str) -> AppResult<upload::Model> {
        self.upload_repo.get_by_id(id).await
    }

    /// List the acting user's uploads.
    pub async fn list_mine(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<upload::Model>> {
        self.upload_repo
            .find_by_user(user_id, limit.min(100), offset)
            .await
    }

    /// Delete an upload. Owner or admin only.
    pub async fn delete(&self, id: &str, acting_user: &user::Model) -> AppResult<()> {
        let upload = self.upload_repo.get_by_id(id).await?;
        super::access::ensure_can_mutate(&upload.user_id, acting_user)?;

        self.storage.delete(&upload.key).await?;
        self.upload_repo.delete(id).await?;

        tracing::debug!(upload_id = %id, "Deleted upload");
        Ok(())
    }
}
