// src/models/allocation.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::students::{ClassSelection, Student};

/// Salas disponíveis para prova.
pub const ROOMS: [&str; 7] = ["PB701", "PB702", "PB703", "PB704", "PB705", "PB706", "PB707"];

pub fn is_known_room(room: &str) -> bool {
    ROOMS.contains(&room)
}

/// Um conjunto (programa, semestre, turma) que preenche uma posição de todas as carteiras.
pub type RosterSlot = ClassSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatingOption {
    Single,
    Double,
    Triple,
}

impl SeatingOption {
    /// Alunos por carteira.
    pub fn multiplicity(self) -> usize {
        match self {
            SeatingOption::Single => 1,
            SeatingOption::Double => 2,
            SeatingOption::Triple => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: u32,
    pub roll_numbers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingConfiguration {
    pub room: String,
    pub seating_option: SeatingOption,
    pub slots: Vec<RosterSlot>,
}

impl SeatingConfiguration {
    pub fn multiplicity(&self) -> usize {
        self.seating_option.multiplicity()
    }
}

/// Alocação em edição dentro da sessão.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingDraft {
    pub configuration: SeatingConfiguration,
    pub seats: Vec<Seat>,
    pub submitted: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSeatsPayload {
    #[validate(length(min = 1, message = "Room is required."))]
    pub room: String,
    pub seating_option: SeatingOption,
    #[serde(default)]
    pub slots: Vec<RosterSlot>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditOccupantPayload {
    #[validate(length(max = 32, message = "Roll number is too long."))]
    pub roll_number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingResponse {
    pub configuration: SeatingConfiguration,
    pub seats: Vec<Seat>,
    pub allocated_count: usize,
    pub submitted: bool,
}

impl From<&SeatingDraft> for SeatingResponse {
    fn from(draft: &SeatingDraft) -> Self {
        Self {
            configuration: draft.configuration.clone(),
            seats: draft.seats.clone(),
            allocated_count: crate::services::seating_service::allocated_count(&draft.seats),
            submitted: draft.submitted,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibleStudentsResponse {
    pub slots: Vec<RosterSlot>,
    pub students: Vec<Student>,
}
