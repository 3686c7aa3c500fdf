// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, User},
};

// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    Ok(Json(response))
}

// POST /api/auth/logout
pub async fn logout(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> StatusCode {
    app_state.auth_service.logout(session.id).await;
    StatusCode::NO_CONTENT
}

// GET /api/users/me
pub async fn get_me(AuthenticatedUser(session): AuthenticatedUser) -> Json<User> {
    Json(session.user)
}
