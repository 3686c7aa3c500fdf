// src/db/session_repo.rs

use chrono::{DateTime, Duration, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    allocation::SeatingDraft,
    auth::User,
    students::{ClassSelection, Student},
};

/// Estado de um login: criado no login, alimentado pelas telas, descartado no logout.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user: User,
    pub created_at: DateTime<Utc>,
    // Mesmo instante do `exp` do token
    pub expires_at: DateTime<Utc>,
    pub selection: Option<ClassSelection>,
    // Planilha enviada na tela de elegibilidade (e revisada depois)
    pub working_set: Vec<Student>,
    // Lista final gravada no envio da revisão
    pub eligible: Vec<Student>,
    pub seating: Option<SeatingDraft>,
}

impl Session {
    fn new(user: User, ttl: Duration) -> Self {
        let created_at = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user,
            created_at,
            expires_at: created_at + ttl,
            selection: None,
            working_set: Vec::new(),
            eligible: Vec::new(),
            seating: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Duração padrão de uma sessão (e do token emitido para ela).
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 8;

/// Sessões em memória. Expiradas são descartadas no próximo acesso.
#[derive(Clone, Debug)]
pub struct SessionRepository {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    ttl: Duration,
}

impl Default for SessionRepository {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }
}

impl SessionRepository {
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Arc::default(), ttl }
    }

    pub async fn create(&self, user: User) -> Session {
        let session = Session::new(user, self.ttl);
        let mut sessions = self.sessions.write().await;

        // Varre as expiradas a cada login
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now));
        if sessions.len() != before {
            tracing::debug!("{} sessões expiradas removidas", before - sessions.len());
        }

        sessions.insert(session.id, session.clone());
        session
    }

    pub async fn find(&self, id: Uuid) -> Option<Session> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&id) {
                Some(session) if !session.is_expired(now) => return Some(session.clone()),
                None => return None,
                Some(_) => {}
            }
        }
        self.sessions.write().await.remove(&id);
        None
    }

    pub async fn remove(&self, id: Uuid) -> Option<Session> {
        self.sessions.write().await.remove(&id)
    }

    /// Aplica `f` à sessão sob o lock de escrita. `None` se a sessão não existe mais.
    pub async fn update<F, R>(&self, id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut sessions = self.sessions.write().await;
        if sessions.get(&id).is_some_and(|s| s.is_expired(Utc::now())) {
            sessions.remove(&id);
            return None;
        }
        sessions.get_mut(&id).map(f)
    }
}
