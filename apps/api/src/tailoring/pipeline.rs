//! Resume tailoring: orchestrates one tailoring request end to end.
//!
//! Flow: validate → insert pending record → call webhook → normalize reply →
//!       mark record tailored → return output.
//!
//! Every record leaves `pending` exactly once. A webhook failure marks it
//! `failed`; the insert is never rolled back.

use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{NewResume, ResumeRecord};
use crate::store::ResumeStore;
use crate::webhook_client::normalize::{NormalizedReply, TailoredOutput};
use crate::webhook_client::{TailorJob, Tailorer};

/// Request body for a tailoring run. Fields are optional here so a missing
/// field is reported as a validation error rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    #[serde(alias = "userId")]
    pub owner_id: Option<String>,
    pub resume_input: Option<String>,
    pub job_description: Option<String>,
}

/// A request whose three fields are present and non-blank.
#[derive(Debug, Clone)]
pub struct ValidTailorRequest {
    pub owner_id: String,
    pub resume_input: String,
    pub job_description: String,
}

impl TailorRequest {
    pub fn validate(self) -> Result<ValidTailorRequest, AppError> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        let owner_id = present(self.owner_id);
        let resume_input = present(self.resume_input);
        let job_description = present(self.job_description);

        match (owner_id, resume_input, job_description) {
            (Some(owner_id), Some(resume_input), Some(job_description)) => Ok(ValidTailorRequest {
                owner_id,
                resume_input,
                job_description,
            }),
            (owner_id, resume_input, job_description) => {
                let missing: Vec<&str> = [
                    ("ownerId", owner_id.is_none()),
                    ("resumeInput", resume_input.is_none()),
                    ("jobDescription", job_description.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();
                Err(AppError::validation_with(
                    "Missing required fields",
                    missing.join(", "),
                ))
            }
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct TailorOutcome {
    pub record_id: Uuid,
    pub output: TailoredOutput,
}

/// Runs one tailoring request against the store and the webhook.
pub async fn tailor_resume(
    store: &dyn ResumeStore,
    tailorer: &dyn Tailorer,
    allow_placeholder_fallback: bool,
    request: &ValidTailorRequest,
) -> Result<TailorOutcome, AppError> {
    // 1. Pending record
    let record = store
        .insert_pending(NewResume {
            owner_id: &request.owner_id,
            resume_input: &request.resume_input,
            job_description: &request.job_description,
        })
        .await?;
    info!(
        "Created pending resume record {} for owner {}",
        record.id, record.owner_id
    );

    // 2. Webhook
    let job = TailorJob {
        owner_id: &record.owner_id,
        record_id: record.id,
        resume_input: &record.resume_input,
        job_description: &record.job_description,
    };
    let reply = match tailorer.tailor(&job).await {
        Ok(reply) => reply,
        Err(e) => {
            mark_failed(store, &record, &e.to_string()).await;
            return Err(AppError::Upstream(e));
        }
    };

    // 3. Normalize
    let output = match NormalizedReply::parse(&reply) {
        NormalizedReply::Matched(output) => output,
        NormalizedReply::FormatDrift if allow_placeholder_fallback => {
            warn!(
                record_id = %record.id,
                reply_shape = "placeholder",
                "Webhook reply matched no known shape; storing placeholder text"
            );
            TailoredOutput::placeholder()
        }
        NormalizedReply::FormatDrift => {
            mark_failed(store, &record, "webhook reply matched no known shape").await;
            return Err(AppError::UnrecognizedReply);
        }
    };

    // 4. Finalize
    let updated = store
        .mark_tailored(record.id, &record.owner_id, &output)
        .await?;
    info!(
        record_id = %updated.id,
        reply_shape = output.shape.as_str(),
        "Resume record tailored"
    );

    Ok(TailorOutcome {
        record_id: updated.id,
        output,
    })
}

/// Best effort: the upstream error is what the caller sees even if this fails.
async fn mark_failed(store: &dyn ResumeStore, record: &ResumeRecord, reason: &str) {
    warn!("Tailoring failed for record {}: {reason}", record.id);
    if let Err(e) = store.mark_failed(record.id, &record.owner_id, reason).await {
        error!("Could not mark record {} as failed: {e}", record.id);
    }
}
