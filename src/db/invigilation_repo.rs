// src/db/invigilation_repo.rs

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::invigilation::{InvigilationAssignment, Shift, SlotTimes};

#[derive(Debug)]
struct ScheduleState {
    slots: SlotTimes,
    assignments: Vec<InvigilationAssignment>,
    submitted: bool,
}

#[derive(Clone, Debug)]
pub struct InvigilationRepository {
    state: Arc<RwLock<ScheduleState>>,
}

impl Default for InvigilationRepository {
    fn default() -> Self {
        Self::with_assignments(seed_assignments())
    }
}

impl InvigilationRepository {
    pub fn with_assignments(assignments: Vec<InvigilationAssignment>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ScheduleState {
                slots: SlotTimes::default(),
                assignments,
                submitted: false,
            })),
        }
    }

    pub async fn list(&self) -> Vec<InvigilationAssignment> {
        self.state.read().await.assignments.clone()
    }

    /// Insere com id = último id + 1.
    pub async fn insert(
        &self,
        faculty_id: String,
        faculty_name: String,
        date: NaiveDate,
        shift: Shift,
        room: String,
    ) -> InvigilationAssignment {
        let mut state = self.state.write().await;
        let id = state.assignments.last().map_or(0, |a| a.id) + 1;
        let assignment = InvigilationAssignment { id, faculty_id, faculty_name, date, shift, room };
        state.assignments.push(assignment.clone());
        state.submitted = false;
        assignment
    }

    pub async fn delete(&self, id: u32) -> bool {
        let mut state = self.state.write().await;
        let before = state.assignments.len();
        state.assignments.retain(|a| a.id != id);
        let removed = state.assignments.len() != before;
        if removed {
            state.submitted = false;
        }
        removed
    }

    pub async fn slots(&self) -> SlotTimes {
        self.state.read().await.slots
    }

    pub async fn set_slots(&self, slots: SlotTimes) {
        self.state.write().await.slots = slots;
    }

    pub async fn mark_submitted(&self) {
        self.state.write().await.submitted = true;
    }

    pub async fn is_submitted(&self) -> bool {
        self.state.read().await.submitted
    }
}

fn seed_assignments() -> Vec<InvigilationAssignment> {
    let seed = [
        (1, "100109", "Abhishek Malik", (2025, 4, 22), Shift::First, "PB703"),
        (2, "100102", "Punit Kumar", (2025, 4, 22), Shift::Second, "PB703"),
        (3, "100107", "Sultan Fahad", (2025, 4, 23), Shift::First, "PB702"),
    ];

    seed.into_iter()
        .filter_map(|(id, faculty_id, faculty_name, (y, m, d), shift, room)| {
            Some(InvigilationAssignment {
                id,
                faculty_id: faculty_id.to_string(),
                faculty_name: faculty_name.to_string(),
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                shift,
                room: room.to_string(),
            })
        })
        .collect()
}
