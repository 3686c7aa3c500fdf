pub mod allocation;
pub mod auth;
pub mod dashboard;
pub mod eligibility;
pub mod invigilation;
pub mod messages;
pub mod review;
