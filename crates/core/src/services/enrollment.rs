//! Enrollment service.

use agora_common::{AppResult, IdGenerator};
use agora_db::{
    entities::enrollment::{self, EnrollmentStatus},
    repositories::EnrollmentRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use super::email::EmailService;

/// Input for submitting a course enrollment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitEnrollmentInput {
    /// Course being enrolled in.
    #[validate(length(min = 1, max = 256))]
    pub course_name: String,

    /// Applicant name.
    #[validate(length(min = 1, max = 256))]
    pub applicant_name: String,

    /// Applicant email.
    #[validate(email)]
    pub email: String,

    /// Applicant phone number.
    #[validate(length(max = 64))]
    pub phone: Option<String>,

    /// Free-form message to the organizers.
    #[validate(length(max = 4096))]
    pub message: Option<String>,
}

/// Enrollment service for business logic.
#[derive(Clone)]
pub struct EnrollmentService {
    enrollment_repo: EnrollmentRepository,
    email: Option<EmailService>,
    id_gen: IdGenerator,
}

impl EnrollmentService {
    /// Create a new enrollment service.
    #[must_use]
    pub const fn new(enrollment_repo: EnrollmentRepository, email: Option<EmailService>) -> Self {
        Self {
            enrollment_repo,
            email,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit an enrollment. The confirmation email is best-effort: the
    /// submission succeeds even when delivery fails.
    pub async fn submit(&self, input: SubmitEnrollmentInput) -> AppResult<enrollment::Model> {
        input.validate()?;

        let model = enrollment::ActiveModel {
            id: Set(self.id_gen.generate()),
            course_name: Set(input.course_name.clone()),
            applicant_name: Set(input.applicant_name.clone()),
            email: Set(input.email.clone()),
            phone: Set(input.phone),
            message: Set(input.message),
            status: Set(EnrollmentStatus::Pending),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.enrollment_repo.create(model).await?;

        if let Some(email) = &self.email {
            if let Err(e) = email
                .send_enrollment_confirmation(
                    &created.email,
                    &created.applicant_name,
                    &created.course_name,
                )
                .await
            {
                tracing::warn!(error = %e, enrollment_id = %created.id, "Failed to send enrollment confirmation");
            }
        }

        tracing::info!(enrollment_id = %created.id, course = %created.course_name, "Enrollment submitted");

        Ok(created)
    }

    /// Get an enrollment by ID.
    pub async fn get(&self, id: &str) -> AppResult<enrollment::Model> {
        self.enrollment_repo.get_by_id(id).await
    }

    /// List enrollments, optionally filtered by status (admin view).
    pub async fn list(
        &self,
        status: Option<EnrollmentStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<enrollment::Model>> {
        self.enrollment_repo
            .list(status, limit.min(100), offset)
            .await
    }

    /// Set the review status of an enrollment (admin view).
    pub async fn set_status(
        &self,
        id: &str,
        status: EnrollmentStatus,
    ) -> AppResult<enrollment::Model> {
        let enrollment = self.enrollment_repo.get_by_id(id).await?;

        let mut active: enrollment::ActiveModel = enrollment.into();
        active.status = Set(status);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.enrollment_repo.update(active).await
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

    fn test_enrollment(id: &str) -> enrollment::Model {
        enrollment::Model {
            id: id.to_string(),
            course_name: "Pottery 101".to_string(),
            applicant_name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: None,
            message: None,
            status: EnrollmentStatus::Pending,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_submit_invalid_email_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = EnrollmentService::new(EnrollmentRepository::new(db), None);
        let result = service
            .submit(SubmitEnrollmentInput {
                course_name: "Pottery 101".to_string(),
                applicant_name: "Sam".to_string(),
                email: "not-an-email".to_string(),
                phone: None,
                message: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_succeeds_without_email_service() {
        let created = test_enrollment("en1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .into_connection(),
        );

        let service = EnrollmentService::new(EnrollmentRepository::new(db), None);
        let result = service
            .submit(SubmitEnrollmentInput {
                course_name: "Pottery 101".to_string(),
                applicant_name: "Sam".to_string(),
                email: "sam@example.com".to_string(),
                phone: None,
                message: None,
            })
            .await
            .unwrap();

        assert_eq!(result.status, EnrollmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_set_status() {
        let pending = test_enrollment("en1");
        let mut approved = pending.clone();
        approved.status = EnrollmentStatus::Approved;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[pending]])
                .append_query_results([[approved]])
                .into_connection(),
        );

        let service = EnrollmentService::new(EnrollmentRepository::new(db), None);
        let result = service
            .set_status("en1", EnrollmentStatus::Approved)
            .await
            .unwrap();

        assert_eq!(result.status, EnrollmentStatus::Approved);
    }
}
