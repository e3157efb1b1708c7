//! Executor that simulates the AI service with fixed delays and catalogue
//! data.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use spark_core::catalog::{locator_digest, ProductCategory};
use spark_core::job::{GeneratedContent, Step, StepOutcome};
use spark_core::upload::stored_name_from_locator;

use crate::delays::StepDelays;
use crate::executor::{StepContext, StepError, StepExecutor};

/// Lowest confidence the simulated model reports.
const MIN_CONFIDENCE: u8 = 85;

/// Width of the confidence band above [`MIN_CONFIDENCE`].
const CONFIDENCE_SPREAD: u8 = 15;

/// Simulated listing enhancement.
///
/// - `upload`: local uploads (`/uploads/<name>`) must exist in `upload_dir`
///   and have a decodable image header; other locators pass through.
/// - `analysis`: category detected from the locator.
/// - `enhancement`: default background of the category; the asset itself
///   is passed through untouched.
/// - `contentGeneration`: catalogue template for the category.
/// - `optimization`: category SEO terms merged into the keywords, plus a
///   confidence score.
pub struct SimulatedExecutor {
    upload_dir: PathBuf,
    delays: StepDelays,
}

impl SimulatedExecutor {
    pub fn new(upload_dir: impl Into<PathBuf>, delays: StepDelays) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            delays,
        }
    }

    async fn upload(&self, ctx: &StepContext) -> Result<StepOutcome, StepError> {
        let Some(name) = stored_name_from_locator(&ctx.resource_locator) else {
            return Ok(StepOutcome::UploadedRemote);
        };
        let name = name.map_err(|_| StepError::InvalidLocator(ctx.resource_locator.clone()))?;

        let path = self.upload_dir.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(StepError::ResourceNotFound(ctx.resource_locator.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StepError::ResourceNotFound(ctx.resource_locator.clone()));
            }
            Err(e) => return Err(StepError::Io(e)),
        }

        let (width, height) = tokio::task::spawn_blocking(move || read_dimensions(&path))
            .await
            .map_err(|e| StepError::Io(std::io::Error::other(e)))??;

        Ok(StepOutcome::Uploaded { width, height })
    }

    fn category(step: Step, ctx: &StepContext) -> Result<ProductCategory, StepError> {
        ctx.artifacts.category.ok_or(StepError::MissingArtifact {
            step: step.name(),
            artifact: "a detected category",
        })
    }
}

#[async_trait]
impl StepExecutor for SimulatedExecutor {
    async fn perform_step(&self, step: Step, ctx: &StepContext) -> Result<StepOutcome, StepError> {
        let delay = self.delays.for_step(step);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        tracing::debug!(job_id = %ctx.job_id, step = step.name(), "Executing simulated step");

        match step {
            Step::Upload => self.upload(ctx).await,
            Step::Analysis => Ok(StepOutcome::Analyzed {
                category: ProductCategory::detect(&ctx.resource_locator),
            }),
            Step::Enhancement => {
                let category = Self::category(step, ctx)?;
                Ok(StepOutcome::Enhanced {
                    image_url: ctx.resource_locator.clone(),
                    background: category.backgrounds()[0].to_string(),
                })
            }
            Step::ContentGeneration => {
                let template = Self::category(step, ctx)?.content_template();
                Ok(StepOutcome::ContentGenerated {
                    content: GeneratedContent {
                        title: template.title.to_string(),
                        description: template.description.to_string(),
                        keywords: template.keywords.to_string(),
                        category: template.category_label.to_string(),
                        suggested_price: template.suggested_price.to_string(),
                    },
                })
            }
            Step::Optimization => {
                let category = Self::category(step, ctx)?;
                let content = ctx.artifacts.content.as_ref().ok_or(StepError::MissingArtifact {
                    step: step.name(),
                    artifact: "generated content",
                })?;
                Ok(StepOutcome::Optimized {
                    keywords: merge_keywords(&content.keywords, category.seo_terms()),
                    confidence: confidence_for(&ctx.resource_locator),
                })
            }
        }
    }
}

/// Read image dimensions from the file header only.
fn read_dimensions(path: &Path) -> Result<(u32, u32), StepError> {
    image::ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| StepError::InvalidImage(e.to_string()))
}

/// Append each term not already present (case-insensitive).
fn merge_keywords(existing: &str, extra: &[&str]) -> String {
    let mut keywords: Vec<String> = existing
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    for term in extra {
        if !keywords.iter().any(|k| k.eq_ignore_ascii_case(term)) {
            keywords.push((*term).to_string());
        }
    }
    keywords.join(", ")
}

fn confidence_for(resource_locator: &str) -> u8 {
    let digest = locator_digest(resource_locator);
    MIN_CONFIDENCE + digest[1] % CONFIDENCE_SPREAD
}
