// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{config::AppState, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let session_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/users/me", get(handlers::auth::get_me))
        .route("/dashboard", get(handlers::dashboard::get_dashboard));

    let eligibility_routes = Router::new()
        .route("/students", get(handlers::eligibility::list_students))
        .route("/upload", post(handlers::eligibility::upload_attendance));

    let review_routes = Router::new()
        .route("/", get(handlers::review::list_under_review))
        .route("/submit", post(handlers::review::submit_review))
        .route("/{reg_no}/certificate", post(handlers::review::upload_certificate))
        .route("/{reg_no}/decision", post(handlers::review::decide));

    let allocation_routes = Router::new()
        .route("/", get(handlers::allocation::get_allocation))
        .route("/rooms", get(handlers::allocation::list_rooms))
        .route("/generate", post(handlers::allocation::generate_seats))
        .route(
            "/seats/{seat_id}/occupants/{index}",
            put(handlers::allocation::edit_occupant),
        )
        .route("/eligible-students", get(handlers::allocation::eligible_students))
        .route("/submit", post(handlers::allocation::submit_allocation))
        .route("/layout.pdf", get(handlers::allocation::download_layout));

    let invigilation_routes = Router::new()
        .route("/faculty", get(handlers::invigilation::list_faculty))
        .route(
            "/assignments",
            get(handlers::invigilation::get_schedule).post(handlers::invigilation::create_assignment),
        )
        .route("/assignments/{id}", delete(handlers::invigilation::delete_assignment))
        .route(
            "/slots",
            get(handlers::invigilation::get_slots).put(handlers::invigilation::update_slots),
        )
        .route("/submit", post(handlers::invigilation::submit_schedule));

    let message_routes = Router::new()
        .route("/templates", get(handlers::messages::list_templates))
        .route("/recipients", get(handlers::messages::list_recipients))
        .route("/send", post(handlers::messages::send_message))
        .route("/sent", get(handlers::messages::list_sent));

    // Tudo abaixo exige token; a checagem de página fica nos extratores
    let protected_routes = Router::new()
        .merge(session_routes)
        .nest("/eligibility", eligibility_routes)
        .nest("/review", review_routes)
        .nest("/allocation", allocation_routes)
        .nest("/invigilation", invigilation_routes)
        .nest("/messages", message_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .with_state(app_state)
}
