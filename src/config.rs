// src/config.rs

use anyhow::Context;
use std::{env, path::PathBuf, sync::Arc};

use crate::{
    db::{
        CredentialRepository, FacultyRepository, InvigilationRepository, MessageRepository,
        SessionRepository, StudentRepository,
    },
    services::{
        access::AccessTable, auth::AuthService, document_service::DocumentService,
        invigilation_service::InvigilationService, message_service::MessageService,
        review_service::ReviewService, seating_service::SeatingService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bcrypt_cost: u32,
    // Sem semente, cada execução gera uma base diferente
    pub data_seed: Option<u64>,
    pub fonts_dir: PathBuf,
    pub access_table_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret,
            jwt_ttl_hours: parse_var("JWT_TTL_HOURS")?.unwrap_or(8),
            bcrypt_cost: parse_var("BCRYPT_COST")?.unwrap_or(bcrypt::DEFAULT_COST),
            data_seed: parse_var("DATA_SEED")?,
            fonts_dir: env::var("FONTS_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("./fonts")),
            access_table_path: env::var("ACCESS_TABLE_PATH").ok().map(PathBuf::from),
        })
    }
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .with_context(|| format!("{} inválido: '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub access_table: AccessTable,
    pub auth_service: AuthService,
    pub review_service: ReviewService,
    pub seating_service: SeatingService,
    pub invigilation_service: InvigilationService,
    pub message_service: MessageService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let access_table = match &settings.access_table_path {
            Some(path) => {
                tracing::info!("Tabela de acesso carregada de {}", path.display());
                AccessTable::from_file(path)?
            }
            None => AccessTable::default(),
        };

        let seed = settings.data_seed.unwrap_or_else(rand::random);

        // --- Monta o gráfico de dependências ---
        let credentials = CredentialRepository::with_default_users(settings.bcrypt_cost)
            .await
            .context("falha ao montar a tabela de credenciais")?;
        let sessions = SessionRepository::new(chrono::Duration::hours(settings.jwt_ttl_hours));
        let students = StudentRepository::generate(seed);
        let faculty = FacultyRepository::default();

        let auth_service = AuthService::new(
            Arc::new(credentials),
            sessions.clone(),
            settings.jwt_secret.clone(),
        );
        let review_service = ReviewService::new(students.clone(), sessions.clone());
        let seating_service = SeatingService::new(students.clone(), sessions.clone());
        let invigilation_service = InvigilationService::new(faculty.clone(), InvigilationRepository::default());
        let message_service = MessageService::new(students, faculty, MessageRepository::default());
        let document_service = DocumentService::new(settings.fonts_dir.clone());

        Ok(Self {
            access_table,
            auth_service,
            review_service,
            seating_service,
            invigilation_service,
            message_service,
            document_service,
        })
    }
}
