// src/services/auth.rs

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{session_repo::Session, SessionRepository},
    models::auth::{AuthResponse, Claims, User},
};

/// Quem confere usuário e senha. A tabela fixa é só uma implementação.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `None` tanto para usuário inexistente quanto para senha errada.
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError>;
}

#[derive(Clone)]
pub struct AuthService {
    authenticator: Arc<dyn Authenticator>,
    sessions: SessionRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        sessions: SessionRepository,
        jwt_secret: String,
    ) -> Self {
        Self { authenticator, sessions, jwt_secret }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        self.authenticator.authenticate(username, password).await
    }

    /// Login completo: confere credenciais, abre sessão e emite o token.
    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self.login(username, password).await?.ok_or_else(|| {
            tracing::warn!("Tentativa de login inválida");
            AppError::InvalidCredentials
        })?;

        let session = self.sessions.create(user.clone()).await;
        tracing::info!("Login de {} ({}), sessão {}", user.username, user.role, session.id);

        let token = self.create_token(&session)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn validate_token(&self, token: &str) -> Result<Session, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // Token válido mas sessão encerrada (logout) também é rejeitado
        self.sessions
            .find(token_data.claims.sub)
            .await
            .ok_or(AppError::InvalidToken)
    }

    pub async fn logout(&self, session_id: Uuid) {
        if let Some(session) = self.sessions.remove(session_id).await {
            tracing::info!("Logout de {}, sessão {}", session.user.username, session_id);
        }
    }

    fn create_token(&self, session: &Session) -> Result<String, AppError> {
        // O token vive exatamente o mesmo que a sessão
        let claims = Claims {
            sub: session.id,
            role: session.user.role,
            exp: session.expires_at.timestamp() as usize,
            iat: session.created_at.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::CredentialRepository, models::auth::Role};

    async fn service_with(sessions: SessionRepository) -> AuthService {
        let credentials = CredentialRepository::with_default_users(4).await.unwrap();
        AuthService::new(Arc::new(credentials), sessions, "test-secret".into())
    }

    async fn service() -> AuthService {
        service_with(SessionRepository::default()).await
    }

    #[tokio::test]
    async fn test_login_admin() {
        let auth = service().await;
        let user = auth.login("Cyni", "Vpu09370@").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.id, "admin1");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let auth = service().await;
        assert!(auth.login("Cyni", "wrong").await.unwrap().is_none());
        assert!(auth.login("nobody", "Vpu09370@").await.unwrap().is_none());

        let wrong = auth.login_user("Cyni", "wrong").await.unwrap_err();
        let unknown = auth.login_user("nobody", "x").await.unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_token_round_trip_and_logout() {
        let auth = service().await;
        let response = auth.login_user("33701", "AMC33701").await.unwrap();
        assert_eq!(response.user.role, Role::Amc);

        let session = auth.validate_token(&response.token).await.unwrap();
        assert_eq!(session.user.name, "G. Ramesh Naidu");

        auth.logout(session.id).await;
        assert!(matches!(
            auth.validate_token(&response.token).await,
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let auth = service().await;
        assert!(matches!(auth.validate_token("not-a-jwt").await, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_expired_login_leaves_no_session() {
        let sessions = SessionRepository::new(chrono::Duration::hours(-1));
        let auth = service_with(sessions.clone()).await;

        for _ in 0..5 {
            let response = auth.login_user("Cyni", "Vpu09370@").await.unwrap();
            assert!(matches!(
                auth.validate_token(&response.token).await,
                Err(AppError::InvalidToken)
            ));
        }

        let response = auth.login_user("Cyni", "Vpu09370@").await.unwrap();
        let mut validation = Validation::default();
        validation.validate_exp = false;
        let claims = decode::<Claims>(&response.token, &DecodingKey::from_secret(b"test-secret"), &validation)
            .unwrap()
            .claims;
        assert!(claims.exp <= claims.iat);
        assert!(sessions.find(claims.sub).await.is_none());
    }
}
