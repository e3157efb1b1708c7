//! Repositories over the in-memory tables. One zero-sized struct per table
//! with associated async functions taking `&DbPool`.

pub mod job_repo;
pub mod session_repo;
pub mod user_repo;

pub use job_repo::JobRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
