use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle of a tailoring record: created `Pending`, then moved exactly
/// once to `Tailored` or `Failed` by the request that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    Tailored,
    Failed,
}

impl RecordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Tailored => "tailored",
            RecordStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown record status '{0}'")]
pub struct UnknownStatus(String);

impl TryFrom<String> for RecordStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(RecordStatus::Pending),
            "tailored" => Ok(RecordStatus::Tailored),
            "failed" => Ok(RecordStatus::Failed),
            _ => Err(UnknownStatus(value)),
        }
    }
}

/// One row of the `resumes` table, serialized to clients in camelCase.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub resume_input: String,
    pub job_description: String,
    pub tailored_resume: Option<String>,
    pub tailored_resume_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: RecordStatus,
    /// Which webhook reply shape produced `tailored_resume`.
    pub reply_shape: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for a freshly created pending record.
#[derive(Debug, Clone, Copy)]
pub struct NewResume<'a> {
    pub owner_id: &'a str,
    pub resume_input: &'a str,
    pub job_description: &'a str,
}
