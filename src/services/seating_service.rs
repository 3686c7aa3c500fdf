// src/services/seating_service.rs

use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SessionRepository, StudentRepository},
    models::{
        allocation::{is_known_room, RosterSlot, Seat, SeatingConfiguration, SeatingDraft, SeatingOption},
        students::{ClassSelection, Program, Section, Semester, Student},
    },
};

/// Quantidade fixa de carteiras por sala, independente do layout.
pub const GRID_SIZE: usize = 24;
/// Colunas do layout impresso (4 x 6).
pub const GRID_COLUMNS: usize = 4;

/// Primeiro conjunto quando nada foi selecionado na sessão.
pub const DEFAULT_FIRST_SLOT: RosterSlot = ClassSelection {
    program: Program::Mca,
    semester: Semester::VI,
    section: Section::B,
};

/// Preenchimento automático do 2º e 3º conjuntos ao aumentar a multiplicidade.
pub const FALLBACK_SLOTS: [RosterSlot; 2] = [
    ClassSelection { program: Program::Mca, semester: Semester::IV, section: Section::A },
    ClassSelection { program: Program::Bca, semester: Semester::III, section: Section::B },
];

/// Fonte das matrículas de um conjunto. Deve devolver até `count` números, em ordem.
pub trait RosterFetcher {
    fn fetch_roster(&self, slot: &RosterSlot, count: usize) -> Vec<String>;
}

impl<F> RosterFetcher for F
where
    F: Fn(&RosterSlot, usize) -> Vec<String>,
{
    fn fetch_roster(&self, slot: &RosterSlot, count: usize) -> Vec<String> {
        self(slot, count)
    }
}

/// Elegíveis conhecidos primeiro (lista gravada na revisão, depois a base),
/// completando com numeração sintética.
pub struct EligibleRosterSource<'a> {
    pub reviewed: &'a [Student],
    pub directory: &'a StudentRepository,
}

impl EligibleRosterSource<'_> {
    pub fn known_eligible(&self, slot: &RosterSlot) -> Vec<Student> {
        let reviewed: Vec<Student> = self.reviewed.iter().filter(|s| slot.matches(s)).cloned().collect();
        if !reviewed.is_empty() {
            return reviewed;
        }
        self.directory.eligible_students(slot)
    }
}

impl RosterFetcher for EligibleRosterSource<'_> {
    fn fetch_roster(&self, slot: &RosterSlot, count: usize) -> Vec<String> {
        let known = self.known_eligible(slot).into_iter().map(|s| s.reg_no).collect();
        pad_roster(known, slot, count)
    }
}

/// Numeração sintética determinística por (programa, turma): `VU22MCA001`, `VU22MCA002`, ...
pub fn synthetic_roll_numbers(program: Program, section: Section, count: usize) -> Vec<String> {
    (0..count as u32)
        .map(|i| program.registration_number(section.first_roll() + i))
        .collect()
}

/// Corta em `count` ou completa com a numeração sintética da turma.
///
/// A sequência começa no primeiro número da turma e avança de um em um, mas
/// números que já estão no roster são pulados: MCA IV A com 009..020 elegíveis
/// recebe 001..008 e depois 021..024, sem matrícula repetida.
pub fn pad_roster(mut roster: Vec<String>, slot: &RosterSlot, count: usize) -> Vec<String> {
    roster.truncate(count);
    if roster.len() == count {
        return roster;
    }

    let taken: HashSet<String> = roster.iter().cloned().collect();
    let mut sequence = slot.section.first_roll();
    while roster.len() < count {
        let candidate = slot.program.registration_number(sequence);
        if !taken.contains(&candidate) {
            roster.push(candidate);
        }
        sequence += 1;
    }
    roster
}

/// Monta as 24 carteiras intercalando os conjuntos posição a posição.
pub fn generate_seats(config: &SeatingConfiguration, fetcher: &impl RosterFetcher) -> Vec<Seat> {
    let multiplicity = config.multiplicity();
    let rosters: Vec<Vec<String>> = config
        .slots
        .iter()
        .map(|slot| fetcher.fetch_roster(slot, GRID_SIZE))
        .collect();

    (0..GRID_SIZE)
        .map(|i| {
            let mut roll_numbers = Vec::with_capacity(multiplicity);
            if !rosters.is_empty() {
                for j in 0..multiplicity {
                    match rosters[j % rosters.len()].get(i) {
                        Some(roll) if !roll.is_empty() => roll_numbers.push(roll.clone()),
                        _ => {}
                    }
                }
            }
            Seat { id: i as u32 + 1, roll_numbers }
        })
        .collect()
}

/// Troca um único ocupante. Carteira inexistente: nada muda.
pub fn set_seat_occupant(
    mut seats: Vec<Seat>,
    seat_id: u32,
    occupant_index: usize,
    roll_number: String,
) -> Vec<Seat> {
    if let Some(seat) = seats.iter_mut().find(|s| s.id == seat_id) {
        if seat.roll_numbers.len() <= occupant_index {
            seat.roll_numbers.resize(occupant_index + 1, String::new());
        }
        seat.roll_numbers[occupant_index] = roll_number;
    }
    seats
}

/// Ajusta a lista de conjuntos à multiplicidade: completa com os padrões ou corta do fim.
pub fn reconcile_slots(current: &[RosterSlot], multiplicity: usize) -> Vec<RosterSlot> {
    let mut slots = current.to_vec();
    slots.truncate(multiplicity);
    while slots.len() < multiplicity {
        let next = match slots.len() {
            0 => DEFAULT_FIRST_SLOT,
            n => FALLBACK_SLOTS[(n - 1).min(FALLBACK_SLOTS.len() - 1)],
        };
        slots.push(next);
    }
    slots
}

/// Ocupantes preenchidos (ignora vazios e "Empty").
pub fn allocated_count(seats: &[Seat]) -> usize {
    seats
        .iter()
        .flat_map(|s| s.roll_numbers.iter())
        .filter(|roll| !roll.is_empty() && roll.as_str() != "Empty")
        .count()
}

#[derive(Clone, Debug)]
pub struct SeatingService {
    students: StudentRepository,
    sessions: SessionRepository,
}

impl SeatingService {
    pub fn new(students: StudentRepository, sessions: SessionRepository) -> Self {
        Self { students, sessions }
    }

    pub async fn generate(
        &self,
        session_id: Uuid,
        room: String,
        seating_option: SeatingOption,
        requested_slots: Vec<RosterSlot>,
    ) -> Result<SeatingDraft, AppError> {
        if !is_known_room(&room) {
            return Err(AppError::BadRequest(format!("Unknown room '{}'.", room)));
        }

        let directory = self.students.clone();
        self.sessions
            .update(session_id, |session| {
                let mut slots = requested_slots;
                if slots.is_empty() {
                    slots.push(session.selection.unwrap_or(DEFAULT_FIRST_SLOT));
                }
                let slots = reconcile_slots(&slots, seating_option.multiplicity());

                for slot in slots.iter().filter(|slot| !slot.is_valid()) {
                    tracing::warn!("Conjunto {} fora dos semestres do programa, usando numeração sintética", slot);
                }

                let configuration = SeatingConfiguration { room, seating_option, slots };
                let source = EligibleRosterSource { reviewed: &session.eligible, directory: &directory };
                let seats = generate_seats(&configuration, &source);

                tracing::info!(
                    "Alocação gerada: sala {}, {:?}, {} ocupantes",
                    configuration.room,
                    configuration.seating_option,
                    allocated_count(&seats)
                );

                let draft = SeatingDraft { configuration, seats, submitted: false };
                session.seating = Some(draft.clone());
                draft
            })
            .await
            .ok_or(AppError::InvalidToken)
    }

    pub async fn current(&self, session_id: Uuid) -> Result<SeatingDraft, AppError> {
        self.sessions
            .find(session_id)
            .await
            .ok_or(AppError::InvalidToken)?
            .seating
            .ok_or(AppError::NoSeatingDraft)
    }

    pub async fn edit_occupant(
        &self,
        session_id: Uuid,
        seat_id: u32,
        occupant_index: usize,
        roll_number: String,
    ) -> Result<SeatingDraft, AppError> {
        self.sessions
            .update(session_id, |session| {
                let draft = session.seating.as_mut().ok_or(AppError::NoSeatingDraft)?;
                let multiplicity = draft.configuration.multiplicity();
                if occupant_index >= multiplicity {
                    return Err(AppError::BadRequest(format!(
                        "Occupant index must be below {}.",
                        multiplicity
                    )));
                }

                let seats = std::mem::take(&mut draft.seats);
                draft.seats = set_seat_occupant(seats, seat_id, occupant_index, roll_number);
                draft.submitted = false;
                Ok(draft.clone())
            })
            .await
            .ok_or(AppError::InvalidToken)?
    }

    /// Elegíveis de todos os conjuntos da alocação atual (ou da seleção da sessão).
    pub async fn eligible_students(&self, session_id: Uuid) -> Result<(Vec<RosterSlot>, Vec<Student>), AppError> {
        let session = self.sessions.find(session_id).await.ok_or(AppError::InvalidToken)?;
        let slots = match &session.seating {
            Some(draft) => draft.configuration.slots.clone(),
            None => vec![session.selection.unwrap_or(DEFAULT_FIRST_SLOT)],
        };

        let source = EligibleRosterSource { reviewed: &session.eligible, directory: &self.students };
        let students = slots.iter().flat_map(|slot| source.known_eligible(slot)).collect();
        Ok((slots, students))
    }

    pub async fn submit(&self, session_id: Uuid) -> Result<SeatingDraft, AppError> {
        self.sessions
            .update(session_id, |session| {
                let draft = session.seating.as_mut().ok_or(AppError::NoSeatingDraft)?;
                draft.submitted = true;
                tracing::info!(
                    "Alocação da sala {} enviada por {}",
                    draft.configuration.room,
                    session.user.username
                );
                Ok(draft.clone())
            })
            .await
            .ok_or(AppError::InvalidToken)?
    }
}
