// src/db/message_repo.rs

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::message::SentMessage;

/// Caixa de saída em memória. Nada é entregue de fato.
#[derive(Clone, Debug, Default)]
pub struct MessageRepository {
    outbox: Arc<RwLock<Vec<SentMessage>>>,
}

impl MessageRepository {
    pub async fn record(&self, message: SentMessage) {
        self.outbox.write().await.push(message);
    }

    pub async fn list_by_sender(&self, sender: &str) -> Vec<SentMessage> {
        self.outbox
            .read()
            .await
            .iter()
            .filter(|m| m.sender == sender)
            .cloned()
            .collect()
    }
}
