pub mod access;
pub mod auth;
pub mod document_service;
pub mod invigilation_service;
pub mod message_service;
pub mod review_service;
pub mod seating_service;
