pub mod ai_jobs;
pub mod auth;
pub mod uploads;
