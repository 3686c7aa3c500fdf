// src/handlers/eligibility.rs

use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{EligibilityPage, RequirePage},
    models::students::{ClassSelection, EligibilityResponse, UploadAttendancePayload},
};

// GET /api/eligibility/students?program=MCA&semester=IV&section=A
pub async fn list_students(
    State(app_state): State<AppState>,
    _guard: RequirePage<EligibilityPage>,
    Query(selection): Query<ClassSelection>,
) -> Result<Json<EligibilityResponse>, AppError> {
    Ok(Json(app_state.review_service.directory(selection)?))
}

// POST /api/eligibility/upload
pub async fn upload_attendance(
    State(app_state): State<AppState>,
    guard: RequirePage<EligibilityPage>,
    Json(payload): Json<UploadAttendancePayload>,
) -> Result<Json<EligibilityResponse>, AppError> {
    payload.validate()?;

    let response = app_state
        .review_service
        .upload(guard.session().id, payload.selection, payload.students)
        .await?;

    Ok(Json(response))
}
