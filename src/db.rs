pub mod user_repo;
pub use user_repo::CredentialRepository;
pub mod student_repo;
pub use student_repo::StudentRepository;
pub mod faculty_repo;
pub use faculty_repo::FacultyRepository;
pub mod session_repo;
pub use session_repo::SessionRepository;
pub mod invigilation_repo;
pub use invigilation_repo::InvigilationRepository;
pub mod message_repo;
pub use message_repo::MessageRepository;
