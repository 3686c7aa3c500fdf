// src/common/error.rs

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::access::Page;

/// Para onde um acesso negado é redirecionado.
pub const DASHBOARD_PATH: &str = "/api/dashboard";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Usuário desconhecido e senha errada caem aqui, sem distinção.
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Página '{0}' não liberada para o cargo")]
    PageNotAllowed(Page),

    #[error("Aluno não encontrado: {0}")]
    StudentNotFound(String),

    #[error("Docente não encontrado: {0}")]
    FacultyNotFound(String),

    #[error("Nenhuma alocação de assentos gerada")]
    NoSeatingDraft,

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar PDF: {0}")]
    PdfError(String),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            // Sem página de "acesso negado": volta para o dashboard.
            AppError::PageNotAllowed(page) => {
                tracing::debug!("Acesso à página '{}' negado, redirecionando", page);
                return (StatusCode::SEE_OTHER, [(header::LOCATION, DASHBOARD_PATH)]).into_response();
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid username or password.".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Missing or invalid authentication token.".to_string()),
            AppError::StudentNotFound(reg_no) => (StatusCode::NOT_FOUND, format!("Student {} not found.", reg_no)),
            AppError::FacultyNotFound(id) => (StatusCode::NOT_FOUND, format!("Faculty member {} not found.", id)),
            AppError::NoSeatingDraft => (StatusCode::NOT_FOUND, "Generate a seat allocation first.".to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),

            // Todo o resto vira 500; o `tracing` registra o detalhe.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
