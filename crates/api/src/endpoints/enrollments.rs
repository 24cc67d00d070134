//! Enrollment endpoints.

use axum::{extract::State, routing::post, Json, Router};
use agora_common::AppResult;
use agora_core::SubmitEnrollmentInput;
use agora_db::entities::enrollment;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Create enrollment router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_enrollment))
}

/// Enrollment response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: String,
    pub course_name: String,
    pub applicant_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub status: enrollment::EnrollmentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<enrollment::Model> for EnrollmentResponse {
    fn from(e: enrollment::Model) -> Self {
        Self {
            id: e.id,
            course_name: e.course_name,
            applicant_name: e.applicant_name,
            email: e.email,
            phone: e.phone,
            message: e.message,
            status: e.status,
            created_at: e.created_at.to_utc(),
        }
    }
}

/// Submit a course enrollment. No authentication required.
async fn submit_enrollment(
    State(state): State<AppState>,
    Json(req): Json<SubmitEnrollmentInput>,
) -> AppResult<ApiResponse<EnrollmentResponse>> {
    info!(course = %req.course_name, "Enrollment submission received");

    let enrollment = state.enrollment_service.submit(req).await?;
    Ok(ApiResponse::ok(enrollment.into()))
}
