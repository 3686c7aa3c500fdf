// src/services/invigilation_service.rs

use crate::{
    common::error::AppError,
    db::{FacultyRepository, InvigilationRepository},
    models::{
        allocation::is_known_room,
        invigilation::{
            parse_date, CreateAssignmentPayload, Faculty, InvigilationAssignment, InvigilationSchedule,
            SlotTimes,
        },
    },
};

#[derive(Clone, Debug)]
pub struct InvigilationService {
    faculty: FacultyRepository,
    repo: InvigilationRepository,
}

impl InvigilationService {
    pub fn new(faculty: FacultyRepository, repo: InvigilationRepository) -> Self {
        Self { faculty, repo }
    }

    pub fn list_faculty(&self, department: Option<&str>, specialization: Option<&str>) -> Vec<Faculty> {
        let mut faculty = match department {
            Some(department) => self.faculty.by_department(department),
            None => self.faculty.all().to_vec(),
        };
        if let Some(specialization) = specialization {
            let matching = self.faculty.by_specialization(specialization);
            faculty.retain(|f| matching.contains(f));
        }
        faculty
    }

    pub async fn schedule(&self) -> InvigilationSchedule {
        InvigilationSchedule {
            slots: self.repo.slots().await,
            assignments: self.repo.list().await,
            submitted: self.repo.is_submitted().await,
        }
    }

    pub async fn add_assignment(&self, payload: CreateAssignmentPayload) -> Result<InvigilationAssignment, AppError> {
        let date = parse_date(&payload.date)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid date '{}'.", payload.date)))?;

        if !is_known_room(&payload.room) {
            return Err(AppError::BadRequest(format!("Unknown room '{}'.", payload.room)));
        }

        let faculty = self
            .faculty
            .find_by_id(&payload.faculty_id)
            .ok_or_else(|| AppError::FacultyNotFound(payload.faculty_id.clone()))?;

        let assignment = self
            .repo
            .insert(faculty.id.clone(), faculty.name.clone(), date, payload.shift, payload.room)
            .await;

        tracing::info!(
            "Invigilação #{}: {} em {} ({:?}) na sala {}",
            assignment.id,
            assignment.faculty_name,
            assignment.date,
            assignment.shift,
            assignment.room
        );
        Ok(assignment)
    }

    /// Remover id inexistente não é erro.
    pub async fn delete_assignment(&self, id: u32) {
        if self.repo.delete(id).await {
            tracing::info!("Invigilação #{} removida", id);
        }
    }

    pub async fn update_slots(&self, slots: SlotTimes) -> Result<SlotTimes, AppError> {
        if slots.first_slot_time >= slots.second_slot_time {
            return Err(AppError::BadRequest("The first shift must start before the second.".into()));
        }
        self.repo.set_slots(slots).await;
        Ok(slots)
    }

    pub async fn submit(&self) -> InvigilationSchedule {
        self.repo.mark_submitted().await;
        let schedule = self.schedule().await;
        tracing::info!("Escala de invigilação enviada: {} designações", schedule.assignments.len());
        schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invigilation::Shift;
    use chrono::NaiveTime;

    fn service() -> InvigilationService {
        InvigilationService::new(FacultyRepository::default(), InvigilationRepository::default())
    }

    fn payload(faculty_id: &str, date: &str, room: &str) -> CreateAssignmentPayload {
        CreateAssignmentPayload {
            faculty_id: faculty_id.into(),
            date: date.into(),
            shift: Shift::Second,
            room: room.into(),
        }
    }

    #[tokio::test]
    async fn test_seeded_schedule() {
        let schedule = service().schedule().await;
        assert_eq!(schedule.assignments.len(), 3);
        assert_eq!(schedule.assignments[2].faculty_name, "Sultan Fahad");
        assert_eq!(schedule.slots, SlotTimes::default());
        assert!(!schedule.submitted);
    }

    #[tokio::test]
    async fn test_add_uses_next_id_and_faculty_name() {
        let service = service();
        let created = service.add_assignment(payload("100115", "2025-04-24", "PB705")).await.unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.faculty_name, "Meera Desai");

        let display = service.add_assignment(payload("100123", "25/04/2025", "PB701")).await.unwrap();
        assert_eq!(display.id, 5);
        assert_eq!(display.date, created.date.succ_opt().unwrap());
    }

    #[tokio::test]
    async fn test_add_validation() {
        let service = service();
        assert!(matches!(
            service.add_assignment(payload("999999", "2025-04-24", "PB705")).await,
            Err(AppError::FacultyNotFound(_))
        ));
        assert!(matches!(
            service.add_assignment(payload("100115", "someday", "PB705")).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            service.add_assignment(payload("100115", "2025-04-24", "LAB1")).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_and_submit() {
        let service = service();
        service.delete_assignment(2).await;
        service.delete_assignment(42).await;
        let schedule = service.submit().await;
        assert!(schedule.submitted);
        assert_eq!(schedule.assignments.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);

        // id segue o último da lista
        let created = service.add_assignment(payload("100115", "2025-04-24", "PB705")).await.unwrap();
        assert_eq!(created.id, 4);
        assert!(!service.schedule().await.submitted);
    }

    #[tokio::test]
    async fn test_slot_times() {
        let service = service();
        let late = SlotTimes {
            first_slot_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            second_slot_time: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
        };
        assert_eq!(service.update_slots(late).await.unwrap(), late);
        assert_eq!(service.schedule().await.slots, late);

        let swapped = SlotTimes { first_slot_time: late.second_slot_time, second_slot_time: late.first_slot_time };
        assert!(service.update_slots(swapped).await.is_err());
    }

    #[test]
    fn test_faculty_filters() {
        let service = service();
        assert_eq!(service.list_faculty(None, None).len(), 15);
        assert_eq!(service.list_faculty(Some("Mathematics"), None).len(), 3);
        let ml = service.list_faculty(Some("Computer Science"), Some("Machine Learning"));
        assert_eq!(ml.len(), 1);
        assert_eq!(ml[0].id, "100123");
    }
}
