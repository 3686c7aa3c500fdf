// src/services/review_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{session_repo::Session, SessionRepository, StudentRepository},
    models::{
        auth::Role,
        students::{
            ClassSelection, EligibilityResponse, EligibilityStatus, MedicalCertificate, ReviewAction,
            ReviewStats, ReviewStatus, ReviewSubmitResponse, Student,
        },
    },
};

/// Upload de frequência, revisão de atestados e lista final de elegíveis.
#[derive(Clone, Debug)]
pub struct ReviewService {
    students: StudentRepository,
    sessions: SessionRepository,
}

impl ReviewService {
    pub fn new(students: StudentRepository, sessions: SessionRepository) -> Self {
        Self { students, sessions }
    }

    /// Turma completa da base, sem mexer na sessão.
    pub fn directory(&self, selection: ClassSelection) -> Result<EligibilityResponse, AppError> {
        ensure_valid(&selection)?;
        let students = self.students.students_by_filter(&selection);
        Ok(EligibilityResponse {
            selection,
            stats: ReviewStats::from_students(&students),
            students,
        })
    }

    /// Grava seleção + planilha na sessão. Sem planilha, usa a turma da base.
    pub async fn upload(
        &self,
        session_id: Uuid,
        selection: ClassSelection,
        uploaded: Option<Vec<Student>>,
    ) -> Result<EligibilityResponse, AppError> {
        ensure_valid(&selection)?;

        let students = match uploaded {
            Some(rows) => {
                if let Some(stray) = rows.iter().find(|s| !selection.matches(s)) {
                    return Err(AppError::BadRequest(format!(
                        "Student {} does not belong to {}.",
                        stray.reg_no, selection
                    )));
                }
                rows.into_iter()
                    .map(|mut s| {
                        s.eligibility_status = EligibilityStatus::from_attendance(s.percentage);
                        s
                    })
                    .collect()
            }
            None => self.students.students_by_filter(&selection),
        };

        let stats = ReviewStats::from_students(&students);
        tracing::info!("Frequência de {} carregada: {} alunos", selection, students.len());

        self.sessions
            .update(session_id, |session| {
                session.selection = Some(selection);
                session.working_set = students.clone();
                session.eligible.clear();
            })
            .await
            .ok_or(AppError::InvalidToken)?;

        Ok(EligibilityResponse { selection, stats, students })
    }

    /// Alunos em avaliação (65% a 75%). Uma seleção diferente recarrega a turma na sessão.
    pub async fn under_review(
        &self,
        session_id: Uuid,
        selection: Option<ClassSelection>,
    ) -> Result<EligibilityResponse, AppError> {
        let session = self.sessions.find(session_id).await.ok_or(AppError::InvalidToken)?;

        let session = match selection {
            Some(selection) if session.selection != Some(selection) => {
                self.upload(session_id, selection, None).await?;
                self.sessions.find(session_id).await.ok_or(AppError::InvalidToken)?
            }
            _ => session,
        };

        let selection = session.selection.ok_or_else(|| {
            AppError::BadRequest("Please select program, semester, and section.".into())
        })?;

        Ok(EligibilityResponse {
            selection,
            stats: ReviewStats::from_students(&session.working_set),
            students: session
                .working_set
                .iter()
                .filter(|s| s.is_under_evaluation())
                .cloned()
                .collect(),
        })
    }

    pub async fn upload_certificate(&self, session_id: Uuid, reg_no: &str) -> Result<Student, AppError> {
        self.with_student(session_id, reg_no, |student| {
            student.medical_certificate = MedicalCertificate::Submitted;
            student.status = Some(ReviewStatus::Pending);
            tracing::info!("Atestado recebido para {}", student.reg_no);
        })
        .await
    }

    /// Aceitar/rejeitar. AMC preenche o parecer da AMC; os demais, o do HOD.
    pub async fn decide(
        &self,
        session_id: Uuid,
        reviewer: Role,
        reg_no: &str,
        action: ReviewAction,
        remark: String,
    ) -> Result<Student, AppError> {
        self.with_student(session_id, reg_no, |student| {
            student.status = Some(ReviewStatus::Completed);
            student.eligibility_status = match action {
                ReviewAction::Accept => EligibilityStatus::Eligible,
                ReviewAction::Reject => EligibilityStatus::Ineligible,
            };
            if reviewer == Role::Amc {
                student.amc_remark = remark;
            } else {
                student.hod_remark = remark;
            }
            tracing::info!("Revisão de {}: {:?} por {}", student.reg_no, action, reviewer);
        })
        .await
    }

    /// Fecha a revisão: grava na sessão a lista final que a alocação vai consumir.
    pub async fn submit(&self, session_id: Uuid) -> Result<ReviewSubmitResponse, AppError> {
        self.sessions
            .update(session_id, |session| {
                let selection = session.selection.ok_or_else(|| {
                    AppError::BadRequest("Please select program, semester, and section.".into())
                })?;

                session.eligible = session
                    .working_set
                    .iter()
                    .filter(|s| s.is_cleared_for_exam())
                    .cloned()
                    .collect();

                tracing::info!(
                    "Revisão de {} enviada por {}: {} elegíveis",
                    selection,
                    session.user.username,
                    session.eligible.len()
                );

                Ok(ReviewSubmitResponse {
                    selection,
                    eligible_count: session.eligible.len(),
                    students: session.eligible.clone(),
                })
            })
            .await
            .ok_or(AppError::InvalidToken)?
    }

    async fn with_student<F>(&self, session_id: Uuid, reg_no: &str, f: F) -> Result<Student, AppError>
    where
        F: FnOnce(&mut Student),
    {
        self.sessions
            .update(session_id, |session: &mut Session| {
                let student = session
                    .working_set
                    .iter_mut()
                    .find(|s| s.reg_no == reg_no)
                    .ok_or_else(|| AppError::StudentNotFound(reg_no.to_string()))?;
                f(student);
                Ok(student.clone())
            })
            .await
            .ok_or(AppError::InvalidToken)?
    }
}

fn ensure_valid(selection: &ClassSelection) -> Result<(), AppError> {
    if selection.is_valid() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "{} has no semester {}.",
            selection.program, selection.semester
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        auth::User,
        students::{Program, Section, Semester},
    };

    async fn setup(role: Role) -> (ReviewService, SessionRepository, Uuid) {
        let sessions = SessionRepository::default();
        let user = User { id: "u".into(), username: "u".into(), name: "U".into(), role };
        let session = sessions.create(user).await;
        let service = ReviewService::new(StudentRepository::generate(11), sessions.clone());
        (service, sessions, session.id)
    }

    fn mca_iv_a() -> ClassSelection {
        ClassSelection::new(Program::Mca, Semester::IV, Section::A)
    }

    #[tokio::test]
    async fn test_upload_rejects_semester_outside_program() {
        let (service, _, id) = setup(Role::Hod).await;
        let bad = ClassSelection::new(Program::Msc, Semester::V, Section::A);
        assert!(matches!(service.upload(id, bad, None).await, Err(AppError::BadRequest(_))));
        assert!(service.directory(bad).is_err());
    }

    #[tokio::test]
    async fn test_review_flow_persists_eligible_list() {
        let (service, sessions, id) = setup(Role::Hod).await;
        let uploaded = service.upload(id, mca_iv_a(), None).await.unwrap();
        assert_eq!(uploaded.students.len(), 20);

        let review = service.under_review(id, None).await.unwrap();
        assert_eq!(review.students.len(), 4);
        let accepted = review.students[0].reg_no.clone();
        let rejected = review.students[1].reg_no.clone();
        let no_certificate = review.students[2].reg_no.clone();

        service.upload_certificate(id, &accepted).await.unwrap();
        let student = service
            .decide(id, Role::Hod, &accepted, ReviewAction::Accept, "Medical leave".into())
            .await
            .unwrap();
        assert_eq!(student.hod_remark, "Medical leave");
        assert!(student.amc_remark.is_empty());

        service.upload_certificate(id, &rejected).await.unwrap();
        service.decide(id, Role::Hod, &rejected, ReviewAction::Reject, String::new()).await.unwrap();
        // Aceito sem atestado não entra na lista
        service.decide(id, Role::Hod, &no_certificate, ReviewAction::Accept, String::new()).await.unwrap();

        let submitted = service.submit(id).await.unwrap();
        assert_eq!(submitted.eligible_count, 13);
        let eligible = sessions.find(id).await.unwrap().eligible;
        assert!(eligible.iter().any(|s| s.reg_no == accepted));
        assert!(!eligible.iter().any(|s| s.reg_no == rejected));
        assert!(!eligible.iter().any(|s| s.reg_no == no_certificate));
    }

    #[tokio::test]
    async fn test_amc_remark_goes_to_amc_field() {
        let (service, _, id) = setup(Role::Amc).await;
        let review = service.under_review(id, Some(mca_iv_a())).await.unwrap();
        let reg_no = review.students[0].reg_no.clone();
        let student = service
            .decide(id, Role::Amc, &reg_no, ReviewAction::Reject, "No certificate".into())
            .await
            .unwrap();
        assert_eq!(student.amc_remark, "No certificate");
        assert_eq!(student.eligibility_status, EligibilityStatus::Ineligible);
    }

    #[tokio::test]
    async fn test_unknown_student_and_missing_selection() {
        let (service, _, id) = setup(Role::Hod).await;
        assert!(matches!(service.under_review(id, None).await, Err(AppError::BadRequest(_))));
        assert!(matches!(service.submit(id).await, Err(AppError::BadRequest(_))));

        service.upload(id, mca_iv_a(), None).await.unwrap();
        assert!(matches!(
            service.upload_certificate(id, "VU00XXX000").await,
            Err(AppError::StudentNotFound(_))
        ));
    }
}
