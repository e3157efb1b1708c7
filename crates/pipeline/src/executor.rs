//! The pluggable step-execution capability.

use async_trait::async_trait;
use spark_core::job::{Job, Step, StepArtifacts, StepOutcome};
use spark_core::types::JobId;

/// Unrecoverable problems while executing a step. Any of these fails the job.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Invalid resource locator: {0}")]
    InvalidLocator(String),

    #[error("Unreadable image: {0}")]
    InvalidImage(String),

    #[error("Step '{step}' requires {artifact} from an earlier step")]
    MissingArtifact {
        step: &'static str,
        artifact: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a step may read about its job.
#[derive(Debug, Clone)]
pub struct StepContext {
    pub job_id: JobId,
    pub resource_locator: String,
    pub artifacts: StepArtifacts,
}

impl StepContext {
    pub fn from_job(job: &Job) -> Self {
        Self {
            job_id: job.id,
            resource_locator: job.resource_locator.clone(),
            artifacts: job.artifacts.clone(),
        }
    }
}

/// Executes one named step of a job.
///
/// Implementations must not mutate job state; the engine records the
/// returned [`StepOutcome`] itself.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn perform_step(&self, step: Step, ctx: &StepContext) -> Result<StepOutcome, StepError>;
}
