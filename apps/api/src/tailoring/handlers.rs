//! Axum route handlers for tailoring and retrieval.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::tailoring::pipeline::{tailor_resume, TailorRequest};
use crate::webhook_client::normalize::ReplyShape;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorResponse {
    pub message: String,
    pub record_id: Uuid,
    pub tailored_resume: String,
    pub tailored_resume_url: Option<String>,
    pub reply_shape: ReplyShape,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    #[serde(alias = "userId")]
    pub owner_id: Option<String>,
}

/// POST /tailor
///
/// Validates the submission, persists a pending record, runs the webhook and
/// returns the tailored text.
pub async fn handle_tailor(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TailorResponse>, AppError> {
    let Json(body) = payload
        .map_err(|rejection| AppError::validation_with("Invalid JSON body", rejection.body_text()))?;
    // A derived struct also deserializes from a sequence; only objects count.
    if !body.is_object() {
        return Err(AppError::validation_with(
            "Invalid JSON body",
            "Expected a JSON object",
        ));
    }
    let request: TailorRequest = serde_json::from_value(body)
        .map_err(|e| AppError::validation_with("Invalid JSON body", e.to_string()))?;
    let request = request.validate()?;

    let outcome = tailor_resume(
        state.store.as_ref(),
        state.tailorer.as_ref(),
        state.allow_placeholder_fallback,
        &request,
    )
    .await?;

    Ok(Json(TailorResponse {
        message: "Resume tailored successfully".to_string(),
        record_id: outcome.record_id,
        tailored_resume: outcome.output.text,
        tailored_resume_url: outcome.output.url,
        reply_shape: outcome.output.shape,
    }))
}

/// GET /resumes?ownerId=
///
/// Every record of the owner, newest first, pending and failed ones included.
pub async fn handle_get_resumes(
    State(state): State<AppState>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    let owner_id = query
        .ok()
        .and_then(|Query(q)| q.owner_id)
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::validation("ownerId is required"))?;

    let records = state.store.find_by_owner(&owner_id).await?;
    Ok(Json(records))
}
