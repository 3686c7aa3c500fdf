// src/db/user_repo.rs

use async_trait::async_trait;
use bcrypt::{hash, verify};
use std::{collections::HashMap, sync::Arc};

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
    services::auth::Authenticator,
};

// (username, senha, id, nome, cargo)
const DEFAULT_USERS: [(&str, &str, &str, &str, Role); 4] = [
    ("Cyni", "Vpu09370@", "admin1", "Cyni", Role::Admin),
    ("11301", "HOD11301", "hod1", "T. Uma Devi", Role::Hod),
    ("22501", "EC22501", "ec1", "M. Suresh", Role::ExamCoordinator),
    ("33701", "AMC33701", "amc1", "G. Ramesh Naidu", Role::Amc),
];

#[derive(Debug)]
struct CredentialRecord {
    password_hash: String,
    user: User,
}

/// Tabela fixa de credenciais. As senhas só existem em memória como hash bcrypt.
#[derive(Clone, Debug)]
pub struct CredentialRepository {
    records: Arc<HashMap<String, CredentialRecord>>,
}

impl CredentialRepository {
    pub async fn with_default_users(bcrypt_cost: u32) -> Result<Self, AppError> {
        let mut records = HashMap::with_capacity(DEFAULT_USERS.len());

        for (username, password, id, name, role) in DEFAULT_USERS {
            let password_hash = tokio::task::spawn_blocking(move || hash(password, bcrypt_cost))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

            records.insert(
                username.to_string(),
                CredentialRecord {
                    password_hash,
                    user: User {
                        id: id.to_string(),
                        username: username.to_string(),
                        name: name.to_string(),
                        role,
                    },
                },
            );
        }

        tracing::debug!("Tabela de credenciais carregada com {} usuários", records.len());
        Ok(Self { records: Arc::new(records) })
    }
}

#[async_trait]
impl Authenticator for CredentialRepository {
    async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        let Some(record) = self.records.get(username) else {
            return Ok(None);
        };

        let password_clone = password.to_owned();
        let password_hash_clone = record.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        Ok(is_password_valid.then(|| record.user.clone()))
    }
}
