//! In-memory persistence for jobs, seller accounts and refresh sessions.
//!
//! [`Database`] is created once at process start and shared as a
//! [`DbPool`]. Repositories in [`repositories`] take `&DbPool` the same way
//! a pooled SQL backend would, so handlers do not care what sits behind it.
//! Nothing is ever evicted; retention belongs to an external store.

use std::collections::HashMap;
use std::sync::Arc;

use spark_core::job::Job;
use spark_core::types::JobId;
use tokio::sync::{Mutex, RwLock};

pub mod models;
pub mod repositories;

use models::session::Session;
use models::user::User;

/// Shared handle to the in-memory database.
pub type DbPool = Arc<Database>;

/// Process-lifetime tables.
///
/// The job table maps ids to individually locked records: the outer lock is
/// held only to look up or insert an entry, and a job is mutated under its
/// own mutex, so writers of different jobs never contend.
#[derive(Default)]
pub struct Database {
    pub(crate) jobs: RwLock<HashMap<JobId, Arc<Mutex<Job>>>>,
    pub(crate) users: RwLock<HashMap<String, User>>,
    pub(crate) sessions: RwLock<HashMap<String, Session>>,
}

/// Create an empty database.
pub fn create_pool() -> DbPool {
    Arc::new(Database::default())
}
