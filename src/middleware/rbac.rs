// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    db::session_repo::Session,
    models::access::Page,
};

/// 1. O Trait que define qual página a rota representa
pub trait PageDef: Send + Sync + 'static {
    fn page() -> Page;
}

/// 2. O Extractor (Guardião). Entrega a sessão já autorizada.
pub struct RequirePage<T>(pub Session, pub PhantomData<T>);

impl<T> RequirePage<T> {
    pub fn session(&self) -> &Session {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePage<T>
where
    T: PageDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Extrai a sessão (colocada pelo auth_guard)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        // B. Consulta a tabela de acesso
        let page = T::page();
        if !app_state.access_table.can_open(session.user.role, page) {
            tracing::debug!("{} ({}) sem acesso a '{}'", session.user.username, session.user.role, page);
            return Err(AppError::PageNotAllowed(page));
        }

        Ok(RequirePage(session, PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PÁGINAS (TIPOS)
// ---

pub struct EligibilityPage;
impl PageDef for EligibilityPage {
    fn page() -> Page { Page::Eligibility }
}

pub struct ReviewPage;
impl PageDef for ReviewPage {
    fn page() -> Page { Page::Review }
}

pub struct AllocationPage;
impl PageDef for AllocationPage {
    fn page() -> Page { Page::Allocation }
}

pub struct InvigilationPage;
impl PageDef for InvigilationPage {
    fn page() -> Page { Page::Invigilation }
}

pub struct MessagePage;
impl PageDef for MessagePage {
    fn page() -> Page { Page::Message }
}
