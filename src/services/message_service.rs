// src/services/message_service.rs

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{session_repo::Session, FacultyRepository, MessageRepository, StudentRepository},
    models::{
        message::{
            Channel, MessageTemplate, MessageVariable, Recipient, RecipientType, SendMessagePayload,
            SendMessageResponse, SentMessage,
        },
        students::{ClassSelection, Program, Section, Semester},
    },
};

/// Turma usada para a lista de alunos quando a sessão ainda não carregou nenhuma.
const DEFAULT_RECIPIENT_CLASS: ClassSelection = ClassSelection {
    program: Program::Mca,
    semester: Semester::IV,
    section: Section::B,
};
const DEFAULT_RECIPIENT_LIMIT: usize = 15;

pub const TEMPLATES: [MessageTemplate; 3] = [
    MessageTemplate {
        id: "1",
        name: "Exam Schedule Announcement",
        subject: "Mid-Term Examination Schedule for @program @semester @section",
        body: "Dear @recipientName,\n\nThis is to inform you that the Mid-Term Examination for @program @semester @section is scheduled to begin on @examDate.\n\nPlease find your seating arrangement details below:\n- Room: @roomNumber\n- Time: @examTime\n\nPlease ensure you arrive at least 15 minutes before the examination time with your ID card.\n\nBest regards,\n@senderName",
    },
    MessageTemplate {
        id: "2",
        name: "Invigilation Duty",
        subject: "Invigilation Duty Assignment for Mid-Term Examinations",
        body: "Dear @recipientName,\n\nYou have been assigned invigilation duty for the upcoming Mid-Term Examinations as follows:\n\nDate: @examDate\nTime: @examTime\nRoom: @roomNumber\nSubject: @subjectName\n\nPlease ensure you arrive at the examination hall 30 minutes before the scheduled time to make necessary arrangements.\n\nThank you for your cooperation.\n\nBest regards,\n@senderName",
    },
    MessageTemplate {
        id: "3",
        name: "Exam Postponement",
        subject: "Important: Postponement of @subjectName Examination",
        body: "Dear @recipientName,\n\nThis is to inform you that the @subjectName examination scheduled for @examDate has been postponed due to unavoidable circumstances.\n\nThe revised schedule will be communicated to you shortly.\n\nWe apologize for any inconvenience caused.\n\nBest regards,\n@senderName",
    },
];

pub const VARIABLES: [MessageVariable; 9] = [
    MessageVariable { variable: "@recipientName", description: "Name of the recipient" },
    MessageVariable { variable: "@senderName", description: "Your name" },
    MessageVariable { variable: "@program", description: "Program (BCA, MCA, etc.)" },
    MessageVariable { variable: "@semester", description: "Semester (I, II, III, etc.)" },
    MessageVariable { variable: "@section", description: "Section (A, B, etc.)" },
    MessageVariable { variable: "@examDate", description: "Examination date" },
    MessageVariable { variable: "@examTime", description: "Examination time" },
    MessageVariable { variable: "@roomNumber", description: "Room number" },
    MessageVariable { variable: "@subjectName", description: "Subject name" },
];

/// Substitui `@variavel` pelos valores dados. Variáveis sem valor ficam como estão.
pub fn render(text: &str, values: &HashMap<String, String>) -> String {
    let mut known: Vec<&MessageVariable> = VARIABLES.iter().collect();
    // mais longas primeiro para não cortar um nome que é prefixo de outro
    known.sort_by_key(|v| std::cmp::Reverse(v.variable.len()));

    known.into_iter().fold(text.to_string(), |acc, var| {
        let key = var.variable.trim_start_matches('@');
        match values.get(key) {
            Some(value) => acc.replace(var.variable, value),
            None => acc,
        }
    })
}

#[derive(Clone, Debug)]
pub struct MessageService {
    students: StudentRepository,
    faculty: FacultyRepository,
    outbox: MessageRepository,
}

impl MessageService {
    pub fn new(students: StudentRepository, faculty: FacultyRepository, outbox: MessageRepository) -> Self {
        Self { students, faculty, outbox }
    }

    pub fn templates(&self) -> &'static [MessageTemplate] {
        &TEMPLATES
    }

    pub fn variables(&self) -> &'static [MessageVariable] {
        &VARIABLES
    }

    pub fn recipients(&self, session: &Session, kind: Option<RecipientType>) -> Vec<Recipient> {
        let mut recipients = Vec::new();
        if kind != Some(RecipientType::Faculty) {
            recipients.extend(self.student_recipients(session));
        }
        if kind != Some(RecipientType::Student) {
            recipients.extend(self.faculty.all().iter().map(|f| Recipient {
                id: f.id.clone(),
                name: f.name.clone(),
                kind: RecipientType::Faculty,
                email: f.email.clone(),
                phone: f.phone.clone(),
            }));
        }
        recipients
    }

    fn student_recipients(&self, session: &Session) -> Vec<Recipient> {
        let students = if session.working_set.is_empty() {
            let mut fallback = self.students.students_by_filter(&DEFAULT_RECIPIENT_CLASS);
            fallback.truncate(DEFAULT_RECIPIENT_LIMIT);
            fallback
        } else {
            session.working_set.clone()
        };

        // Telefones fictícios, estáveis para a mesma semente
        let mut rng = ChaCha8Rng::seed_from_u64(self.students.seed());
        students
            .into_iter()
            .map(|s| {
                let phone: u64 = rng.gen_range(1_000_000_000..10_000_000_000);
                Recipient {
                    email: format!(
                        "{}@student.example.com",
                        s.name.to_lowercase().split_whitespace().collect::<Vec<_>>().join(".")
                    ),
                    phone: format!("+91 {}", phone),
                    id: s.reg_no,
                    name: s.name,
                    kind: RecipientType::Student,
                }
            })
            .collect()
    }

    pub async fn send(&self, session: &Session, payload: SendMessagePayload) -> Result<SendMessageResponse, AppError> {
        payload.validate()?;

        let mut channels = Vec::new();
        if payload.send_via_whats_app {
            channels.push(Channel::WhatsApp);
        }
        if payload.send_via_email {
            channels.push(Channel::Email);
        }
        if channels.is_empty() {
            return Err(AppError::BadRequest("Please select at least one send method.".into()));
        }

        let recipient = payload.recipient_id.as_deref().and_then(|id| {
            self.recipients(session, None).into_iter().find(|r| r.id == id)
        });

        let mut values = payload.variables;
        values
            .entry("recipientName".into())
            .or_insert_with(|| recipient.as_ref().map_or(payload.to.clone(), |r| r.name.clone()));
        values.entry("senderName".into()).or_insert_with(|| session.user.name.clone());
        if let Some(selection) = session.selection {
            values.entry("program".into()).or_insert_with(|| selection.program.to_string());
            values.entry("semester".into()).or_insert_with(|| selection.semester.to_string());
            values.entry("section".into()).or_insert_with(|| selection.section.to_string());
        }

        let sent = SentMessage {
            id: Uuid::new_v4(),
            sender: session.user.username.clone(),
            to: payload.to,
            recipient_id: payload.recipient_id,
            subject: render(&payload.subject, &values),
            body: render(&payload.body, &values),
            channels,
            sent_at: Utc::now(),
        };

        // Entrega real fora do escopo: só registra
        tracing::info!("Mensagem {} para {} via {:?}", sent.id, sent.to, sent.channels);
        self.outbox.record(sent.clone()).await;

        let via = match sent.channels.as_slice() {
            [Channel::WhatsApp, Channel::Email] => "WhatsApp and Email",
            [Channel::Email] => "Email",
            _ => "WhatsApp",
        };
        Ok(SendMessageResponse { message: format!("Message sent successfully via {}", via), sent })
    }

    pub async fn sent_by(&self, session: &Session) -> Vec<SentMessage> {
        self.outbox.list_by_sender(&session.user.username).await
    }
}
