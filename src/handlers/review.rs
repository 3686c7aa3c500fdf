// src/handlers/review.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{RequirePage, ReviewPage},
    models::students::{
        ClassSelection, EligibilityResponse, Program, ReviewDecisionPayload, ReviewSubmitResponse,
        Section, Semester, Student,
    },
};

// Seleção opcional: sem ela vale a da sessão
#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    program: Option<Program>,
    semester: Option<Semester>,
    section: Option<Section>,
}

impl ReviewQuery {
    fn selection(&self) -> Option<ClassSelection> {
        Some(ClassSelection::new(self.program?, self.semester?, self.section?))
    }
}

// GET /api/review
pub async fn list_under_review(
    State(app_state): State<AppState>,
    guard: RequirePage<ReviewPage>,
    Query(query): Query<ReviewQuery>,
) -> Result<Json<EligibilityResponse>, AppError> {
    let response = app_state
        .review_service
        .under_review(guard.session().id, query.selection())
        .await?;

    Ok(Json(response))
}

// POST /api/review/{reg_no}/certificate
pub async fn upload_certificate(
    State(app_state): State<AppState>,
    guard: RequirePage<ReviewPage>,
    Path(reg_no): Path<String>,
) -> Result<Json<Student>, AppError> {
    let student = app_state
        .review_service
        .upload_certificate(guard.session().id, &reg_no)
        .await?;

    Ok(Json(student))
}

// POST /api/review/{reg_no}/decision
pub async fn decide(
    State(app_state): State<AppState>,
    guard: RequirePage<ReviewPage>,
    Path(reg_no): Path<String>,
    Json(payload): Json<ReviewDecisionPayload>,
) -> Result<Json<Student>, AppError> {
    let session = guard.session();
    let student = app_state
        .review_service
        .decide(session.id, session.user.role, &reg_no, payload.action, payload.remark)
        .await?;

    Ok(Json(student))
}

// POST /api/review/submit
pub async fn submit_review(
    State(app_state): State<AppState>,
    guard: RequirePage<ReviewPage>,
) -> Result<Json<ReviewSubmitResponse>, AppError> {
    Ok(Json(app_state.review_service.submit(guard.session().id).await?))
}
