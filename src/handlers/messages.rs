// src/handlers/messages.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{MessagePage, RequirePage},
    models::message::{
        MessageTemplate, MessageVariable, Recipient, RecipientQuery, SendMessagePayload,
        SendMessageResponse, SentMessage,
    },
};

#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    templates: &'static [MessageTemplate],
    variables: &'static [MessageVariable],
}

// GET /api/messages/templates
pub async fn list_templates(
    State(app_state): State<AppState>,
    _guard: RequirePage<MessagePage>,
) -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        templates: app_state.message_service.templates(),
        variables: app_state.message_service.variables(),
    })
}

// GET /api/messages/recipients?type=student|faculty
pub async fn list_recipients(
    State(app_state): State<AppState>,
    guard: RequirePage<MessagePage>,
    Query(query): Query<RecipientQuery>,
) -> Json<Vec<Recipient>> {
    Json(app_state.message_service.recipients(guard.session(), query.kind))
}

// POST /api/messages/send
pub async fn send_message(
    State(app_state): State<AppState>,
    guard: RequirePage<MessagePage>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<Json<SendMessageResponse>, AppError> {
    Ok(Json(app_state.message_service.send(guard.session(), payload).await?))
}

// GET /api/messages/sent
pub async fn list_sent(
    State(app_state): State<AppState>,
    guard: RequirePage<MessagePage>,
) -> Json<Vec<SentMessage>> {
    Json(app_state.message_service.sent_by(guard.session()).await)
}
