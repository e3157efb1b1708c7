//! Listing enhancement job model and state machine.
//!
//! A [`Job`] walks the five [`Step`]s in order. All transitions live here as
//! plain methods so the engine, the repositories and the tests share one set
//! of rules:
//!
//! ```text
//! pending --start--> running --apply_step(*5)--> completed
//!    |                  |
//!    +------fail--------+--> failed
//! ```
//!
//! `completed` and `failed` are terminal; every mutator is a no-op on a
//! terminal job.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::ProductCategory;
use crate::error::CoreError;
use crate::types::{JobId, OwnerId, Timestamp};

/// Number of steps every job passes through.
pub const STEP_COUNT: usize = 5;

/// Maximum accepted length of a resource locator.
pub const MAX_LOCATOR_LEN: usize = 2048;

/// Error reason recorded on a job cancelled by its owner.
pub const CANCELLED_REASON: &str = "Cancelled";

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// One named stage of the fixed processing sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Upload,
    Analysis,
    Enhancement,
    ContentGeneration,
    Optimization,
}

impl Step {
    /// Steps in execution order.
    pub const ALL: [Step; STEP_COUNT] = [
        Step::Upload,
        Step::Analysis,
        Step::Enhancement,
        Step::ContentGeneration,
        Step::Optimization,
    ];

    /// The step at `index`, or `None` past the end of the sequence.
    pub fn at(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    /// Wire name used by status consumers to key their progress UI.
    pub fn name(self) -> &'static str {
        match self {
            Step::Upload => "upload",
            Step::Analysis => "analysis",
            Step::Enhancement => "enhancement",
            Step::ContentGeneration => "contentGeneration",
            Step::Optimization => "optimization",
        }
    }

    /// Human label shown next to the progress bar.
    pub fn label(self) -> &'static str {
        match self {
            Step::Upload => "Image Upload",
            Step::Analysis => "AI Analysis",
            Step::Enhancement => "Background Removal",
            Step::ContentGeneration => "Content Generation",
            Step::Optimization => "SEO Optimization",
        }
    }
}

/// Per-step status derived from the job's step index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Pending,
    Completed,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Job execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Listing copy generated for the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub category: String,
    pub suggested_price: String,
}

/// Pixel size read from an uploaded image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Payload of a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub enhanced_image_url: String,
    /// Background style applied by the enhancement step.
    pub background: String,
    /// Only known for local uploads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_dimensions: Option<ImageDimensions>,
    pub generated_content: GeneratedContent,
    /// Detected product category key.
    pub detected_category: ProductCategory,
    pub category_name: String,
    /// Confidence score in `0..=100`.
    pub confidence: u8,
    /// Seconds between the job starting and completing.
    pub processing_time_secs: f64,
}

/// What a single step produced. Each variant belongs to exactly one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Uploaded { width: u32, height: u32 },
    /// The resource is not a local upload; no header was inspected.
    UploadedRemote,
    Analyzed { category: ProductCategory },
    Enhanced { image_url: String, background: String },
    ContentGenerated { content: GeneratedContent },
    Optimized { keywords: String, confidence: u8 },
}

impl StepOutcome {
    pub fn step(&self) -> Step {
        match self {
            StepOutcome::Uploaded { .. } | StepOutcome::UploadedRemote => Step::Upload,
            StepOutcome::Analyzed { .. } => Step::Analysis,
            StepOutcome::Enhanced { .. } => Step::Enhancement,
            StepOutcome::ContentGenerated { .. } => Step::ContentGeneration,
            StepOutcome::Optimized { .. } => Step::Optimization,
        }
    }
}

/// Intermediate values carried from earlier steps to later ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepArtifacts {
    pub image_dimensions: Option<ImageDimensions>,
    pub category: Option<ProductCategory>,
    pub enhanced_image_url: Option<String>,
    pub background: Option<String>,
    pub content: Option<GeneratedContent>,
    pub confidence: Option<u8>,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One tracked unit of listing enhancement work.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub owner_id: OwnerId,
    pub resource_locator: String,
    pub status: JobStatus,
    pub current_step_index: usize,
    pub progress_percent: u8,
    pub artifacts: StepArtifacts,
    pub result: Option<JobResult>,
    pub error: Option<String>,
    pub retry_of_job_id: Option<JobId>,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

/// Result of [`Job::apply_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepApplied {
    /// The step was recorded and more steps remain.
    Advanced,
    /// The last step was recorded and the job completed.
    Completed,
    /// The step was recorded but the job could not be completed.
    Failed,
    /// The job had moved on (terminal, or a different step index); nothing changed.
    Stale,
}

impl Job {
    /// Create a `pending` job after validating the resource locator.
    pub fn submit(
        owner_id: impl Into<OwnerId>,
        resource_locator: &str,
    ) -> Result<Self, CoreError> {
        validate_resource_locator(resource_locator)?;
        Ok(Self {
            id: JobId::new_v4(),
            owner_id: owner_id.into(),
            resource_locator: resource_locator.trim().to_string(),
            status: JobStatus::Pending,
            current_step_index: 0,
            progress_percent: 0,
            artifacts: StepArtifacts::default(),
            result: None,
            error: None,
            retry_of_job_id: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        })
    }

    /// Create a fresh job re-running a failed one.
    pub fn retry_of(original: &Job) -> Result<Self, CoreError> {
        if original.status != JobStatus::Failed {
            return Err(CoreError::Validation(
                "Only failed jobs can be retried".into(),
            ));
        }
        let mut job = Self::submit(original.owner_id.clone(), &original.resource_locator)?;
        job.retry_of_job_id = Some(original.id);
        Ok(job)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// The step that the next advance will execute, if any.
    pub fn current_step(&self) -> Option<Step> {
        if self.is_terminal() {
            return None;
        }
        Step::at(self.current_step_index)
    }

    /// Move `pending -> running`. Returns `true` if the status changed.
    pub fn start(&mut self, now: Timestamp) -> bool {
        if self.status != JobStatus::Pending {
            return false;
        }
        self.status = JobStatus::Running;
        self.started_at = Some(now);
        true
    }

    /// Record the outcome of the step at `expected_index`.
    ///
    /// This is the compare-and-swap at the heart of the engine: when the job
    /// is terminal or its index no longer equals `expected_index`, nothing
    /// changes and [`StepApplied::Stale`] is returned.
    pub fn apply_step(
        &mut self,
        expected_index: usize,
        outcome: StepOutcome,
        now: Timestamp,
    ) -> Result<StepApplied, CoreError> {
        if self.status != JobStatus::Running || self.current_step_index != expected_index {
            return Ok(StepApplied::Stale);
        }
        let step = Step::at(expected_index).ok_or_else(|| {
            CoreError::Internal(format!("Step index {expected_index} out of range"))
        })?;
        if outcome.step() != step {
            return Err(CoreError::Internal(format!(
                "Outcome for step '{}' applied to step '{}'",
                outcome.step().name(),
                step.name()
            )));
        }

        self.record(outcome);
        self.current_step_index += 1;
        self.progress_percent = progress_for(self.current_step_index);

        if self.current_step_index < STEP_COUNT {
            return Ok(StepApplied::Advanced);
        }

        match self.build_result(now) {
            Some(result) => {
                self.status = JobStatus::Completed;
                self.result = Some(result);
                self.completed_at = Some(now);
                Ok(StepApplied::Completed)
            }
            None => {
                // Progress may only read 100 on completion.
                self.current_step_index = STEP_COUNT - 1;
                self.progress_percent = progress_for(self.current_step_index);
                self.fail("Processing failed: step results incomplete", now);
                Ok(StepApplied::Failed)
            }
        }
    }

    /// Move a non-terminal job to `failed`. Returns `true` if the status changed.
    pub fn fail(&mut self, reason: impl Into<String>, now: Timestamp) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = JobStatus::Failed;
        self.error = Some(reason.into());
        self.completed_at = Some(now);
        true
    }

    /// Per-step statuses derived from the step index.
    pub fn step_views(&self) -> Vec<StepView> {
        Step::ALL
            .iter()
            .enumerate()
            .map(|(i, step)| StepView {
                id: step.name(),
                label: step.label(),
                status: if i < self.current_step_index {
                    StepState::Completed
                } else {
                    StepState::Pending
                },
            })
            .collect()
    }

    /// Full client-facing projection.
    pub fn view(&self) -> JobView {
        JobView {
            id: self.id,
            status: self.status,
            resource_locator: self.resource_locator.clone(),
            current_step_index: self.current_step_index,
            current_step: self.current_step().map(Step::name),
            progress_percent: self.progress_percent,
            steps: self.step_views(),
            result: self.result.clone(),
            error: self.error.clone(),
            retry_of_job_id: self.retry_of_job_id,
            created_at: self.created_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }

    fn record(&mut self, outcome: StepOutcome) {
        let artifacts = &mut self.artifacts;
        match outcome {
            StepOutcome::Uploaded { width, height } => {
                artifacts.image_dimensions = Some(ImageDimensions { width, height });
            }
            StepOutcome::UploadedRemote => {}
            StepOutcome::Analyzed { category } => artifacts.category = Some(category),
            StepOutcome::Enhanced {
                image_url,
                background,
            } => {
                artifacts.enhanced_image_url = Some(image_url);
                artifacts.background = Some(background);
            }
            StepOutcome::ContentGenerated { content } => artifacts.content = Some(content),
            StepOutcome::Optimized {
                keywords,
                confidence,
            } => {
                if let Some(content) = artifacts.content.as_mut() {
                    content.keywords = keywords;
                }
                artifacts.confidence = Some(confidence.min(100));
            }
        }
    }

    fn build_result(&self, now: Timestamp) -> Option<JobResult> {
        let artifacts = &self.artifacts;
        let started_at = self.started_at.unwrap_or(self.created_at);
        let elapsed_ms = (now - started_at).num_milliseconds().max(0);
        let category = artifacts.category?;
        Some(JobResult {
            enhanced_image_url: artifacts.enhanced_image_url.clone()?,
            background: artifacts.background.clone()?,
            image_dimensions: artifacts.image_dimensions,
            generated_content: artifacts.content.clone()?,
            detected_category: category,
            category_name: category.display_name().to_string(),
            confidence: artifacts.confidence?,
            processing_time_secs: elapsed_ms as f64 / 1000.0,
        })
    }
}

/// `round(step_index / STEP_COUNT * 100)`, clamped to 100.
pub fn progress_for(step_index: usize) -> u8 {
    let index = step_index.min(STEP_COUNT);
    ((index * 100 + STEP_COUNT / 2) / STEP_COUNT) as u8
}

/// Validate a submitted resource locator.
///
/// Rules:
/// - Must not be empty or whitespace-only.
/// - Must not exceed [`MAX_LOCATOR_LEN`] bytes.
/// - Must not contain control characters.
pub fn validate_resource_locator(locator: &str) -> Result<(), CoreError> {
    let trimmed = locator.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "resourceLocator must be a non-empty string".into(),
        ));
    }
    if trimmed.len() > MAX_LOCATOR_LEN {
        return Err(CoreError::Validation(format!(
            "resourceLocator must not exceed {MAX_LOCATOR_LEN} characters"
        )));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(CoreError::Validation(
            "resourceLocator must not contain control characters".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// One entry of [`JobView::steps`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepView {
    pub id: &'static str,
    pub label: &'static str,
    pub status: StepState,
}

/// Status endpoint projection of a [`Job`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: JobId,
    pub status: JobStatus,
    pub resource_locator: String,
    pub current_step_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<&'static str>,
    pub progress_percent: u8,
    pub steps: Vec<StepView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_of_job_id: Option<JobId>,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}
