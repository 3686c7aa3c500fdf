// src/handlers/dashboard.rs

use axum::{extract::State, Json};

use crate::{
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{access::DashboardResponse, auth::Role},
};

// GET /api/dashboard (também é o destino de quem cai numa página sem acesso)
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    AuthenticatedUser(session): AuthenticatedUser,
) -> Json<DashboardResponse> {
    let role = session.user.role;
    Json(DashboardResponse {
        pages: app_state.access_table.pages_for(role),
        is_admin: role == Role::Admin,
        user: session.user,
    })
}
