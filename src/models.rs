pub mod access;
pub mod allocation;
pub mod auth;
pub mod invigilation;
pub mod message;
pub mod students;
