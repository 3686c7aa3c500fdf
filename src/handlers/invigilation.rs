// src/handlers/invigilation.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{InvigilationPage, RequirePage},
    models::invigilation::{
        CreateAssignmentPayload, Faculty, InvigilationAssignment, InvigilationSchedule, SlotTimes,
    },
};

#[derive(Debug, Deserialize)]
pub struct FacultyQuery {
    department: Option<String>,
    specialization: Option<String>,
}

// GET /api/invigilation/faculty?department=...&specialization=...
pub async fn list_faculty(
    State(app_state): State<AppState>,
    _guard: RequirePage<InvigilationPage>,
    Query(query): Query<FacultyQuery>,
) -> Json<Vec<Faculty>> {
    Json(
        app_state
            .invigilation_service
            .list_faculty(query.department.as_deref(), query.specialization.as_deref()),
    )
}

// GET /api/invigilation/assignments
pub async fn get_schedule(
    State(app_state): State<AppState>,
    _guard: RequirePage<InvigilationPage>,
) -> Json<InvigilationSchedule> {
    Json(app_state.invigilation_service.schedule().await)
}

// POST /api/invigilation/assignments
pub async fn create_assignment(
    State(app_state): State<AppState>,
    _guard: RequirePage<InvigilationPage>,
    Json(payload): Json<CreateAssignmentPayload>,
) -> Result<(StatusCode, Json<InvigilationAssignment>), AppError> {
    payload.validate()?;

    let assignment = app_state.invigilation_service.add_assignment(payload).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

// DELETE /api/invigilation/assignments/{id}
pub async fn delete_assignment(
    State(app_state): State<AppState>,
    _guard: RequirePage<InvigilationPage>,
    Path(id): Path<u32>,
) -> StatusCode {
    app_state.invigilation_service.delete_assignment(id).await;
    StatusCode::NO_CONTENT
}

// GET /api/invigilation/slots
pub async fn get_slots(
    State(app_state): State<AppState>,
    _guard: RequirePage<InvigilationPage>,
) -> Json<SlotTimes> {
    Json(app_state.invigilation_service.schedule().await.slots)
}

// PUT /api/invigilation/slots
pub async fn update_slots(
    State(app_state): State<AppState>,
    _guard: RequirePage<InvigilationPage>,
    Json(slots): Json<SlotTimes>,
) -> Result<Json<SlotTimes>, AppError> {
    Ok(Json(app_state.invigilation_service.update_slots(slots).await?))
}

// POST /api/invigilation/submit
pub async fn submit_schedule(
    State(app_state): State<AppState>,
    guard: RequirePage<InvigilationPage>,
) -> Json<InvigilationSchedule> {
    tracing::debug!("Escala enviada por {}", guard.session().user.username);
    Json(app_state.invigilation_service.submit().await)
}
