// src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageVariable {
    pub variable: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    Student,
    Faculty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RecipientType,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    WhatsApp,
    Email,
}

#[derive(Debug, Deserialize)]
pub struct RecipientQuery {
    #[serde(rename = "type")]
    pub kind: Option<RecipientType>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    #[validate(length(min = 1, message = "Recipient is required."))]
    pub to: String,
    #[serde(default)]
    pub recipient_id: Option<String>,
    #[validate(length(min = 1, message = "Subject is required."))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message body is required."))]
    pub body: String,
    #[serde(default = "default_true")]
    pub send_via_whats_app: bool,
    #[serde(default)]
    pub send_via_email: bool,
    // Valores para @examDate, @roomNumber, ...
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub id: Uuid,
    pub sender: String,
    pub to: String,
    pub recipient_id: Option<String>,
    pub subject: String,
    pub body: String,
    pub channels: Vec<Channel>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message: String,
    pub sent: SentMessage,
}
