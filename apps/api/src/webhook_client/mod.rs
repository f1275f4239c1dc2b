/// Webhook client: the single point of entry for calls to the external
/// tailoring workflow.
///
/// One POST per request, bounded by the configured timeout, never retried.
/// The raw JSON reply is handed back; shape handling lives in `normalize`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub mod normalize;

const API_KEY_HEADER: &str = "X-API-Key";
/// Upper bound on how much of an error body ends up in logs and errors.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Outbound payload, one per tailoring request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorJob<'a> {
    pub owner_id: &'a str,
    pub record_id: Uuid,
    pub resume_input: &'a str,
    pub job_description: &'a str,
}

/// Anything that can turn a tailoring job into a raw reply.
///
/// Carried in `AppState` as `Arc<dyn Tailorer>`.
#[async_trait]
pub trait Tailorer: Send + Sync {
    async fn tailor(&self, job: &TailorJob<'_>) -> Result<Value, WebhookError>;
}

#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
    api_key: String,
    timeout: Duration,
}

impl WebhookClient {
    pub fn new(url: String, api_key: String, timeout: Duration) -> Result<Self, WebhookError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url,
            api_key,
            timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> WebhookError {
        if err.is_timeout() {
            WebhookError::Timeout(self.timeout)
        } else {
            WebhookError::Http(err)
        }
    }
}

#[async_trait]
impl Tailorer for WebhookClient {
    async fn tailor(&self, job: &TailorJob<'_>) -> Result<Value, WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(job)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body: truncate(&body, MAX_ERROR_BODY),
            });
        }

        debug!(
            "Webhook replied {} for record {} ({} bytes)",
            status,
            job.record_id,
            body.len()
        );

        // A non-JSON body is kept as a string so it normalizes to drift.
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
