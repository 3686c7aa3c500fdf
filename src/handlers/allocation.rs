// src/handlers/allocation.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{AllocationPage, RequirePage},
    models::allocation::{
        EditOccupantPayload, EligibleStudentsResponse, GenerateSeatsPayload, SeatingResponse, ROOMS,
    },
};

// GET /api/allocation/rooms
pub async fn list_rooms(_guard: RequirePage<AllocationPage>) -> Json<Vec<&'static str>> {
    Json(ROOMS.to_vec())
}

// GET /api/allocation
pub async fn get_allocation(
    State(app_state): State<AppState>,
    guard: RequirePage<AllocationPage>,
) -> Result<Json<SeatingResponse>, AppError> {
    let draft = app_state.seating_service.current(guard.session().id).await?;
    Ok(Json(SeatingResponse::from(&draft)))
}

// POST /api/allocation/generate
pub async fn generate_seats(
    State(app_state): State<AppState>,
    guard: RequirePage<AllocationPage>,
    Json(payload): Json<GenerateSeatsPayload>,
) -> Result<Json<SeatingResponse>, AppError> {
    payload.validate()?;

    let draft = app_state
        .seating_service
        .generate(guard.session().id, payload.room, payload.seating_option, payload.slots)
        .await?;

    Ok(Json(SeatingResponse::from(&draft)))
}

// PUT /api/allocation/seats/{seat_id}/occupants/{index}
pub async fn edit_occupant(
    State(app_state): State<AppState>,
    guard: RequirePage<AllocationPage>,
    Path((seat_id, occupant_index)): Path<(u32, usize)>,
    Json(payload): Json<EditOccupantPayload>,
) -> Result<Json<SeatingResponse>, AppError> {
    payload.validate()?;

    let draft = app_state
        .seating_service
        .edit_occupant(guard.session().id, seat_id, occupant_index, payload.roll_number.trim().to_string())
        .await?;

    Ok(Json(SeatingResponse::from(&draft)))
}

// GET /api/allocation/eligible-students
pub async fn eligible_students(
    State(app_state): State<AppState>,
    guard: RequirePage<AllocationPage>,
) -> Result<Json<EligibleStudentsResponse>, AppError> {
    let (slots, students) = app_state
        .seating_service
        .eligible_students(guard.session().id)
        .await?;

    Ok(Json(EligibleStudentsResponse { slots, students }))
}

// POST /api/allocation/submit
pub async fn submit_allocation(
    State(app_state): State<AppState>,
    guard: RequirePage<AllocationPage>,
) -> Result<Json<SeatingResponse>, AppError> {
    let draft = app_state.seating_service.submit(guard.session().id).await?;
    Ok(Json(SeatingResponse::from(&draft)))
}

// GET /api/allocation/layout.pdf
pub async fn download_layout(
    State(app_state): State<AppState>,
    guard: RequirePage<AllocationPage>,
) -> Result<Response, AppError> {
    let session = guard.session();
    let draft = app_state.seating_service.current(session.id).await?;

    // genpdf é síncrono e pesado: roda fora do executor
    let room = draft.configuration.room.clone();
    let document_service = app_state.document_service.clone();
    let prepared_by = session.user.name.clone();
    let pdf_bytes = tokio::task::spawn_blocking(move || document_service.seating_layout_pdf(&draft, &prepared_by))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task do PDF: {}", e))??;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"seating_{}.pdf\"", room),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
