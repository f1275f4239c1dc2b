use std::sync::Arc;

use crate::store::ResumeStore;
use crate::webhook_client::Tailorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable store. Default: `PgResumeStore` over the shared pool.
    pub store: Arc<dyn ResumeStore>,
    /// Pluggable tailoring backend. Default: `WebhookClient`.
    pub tailorer: Arc<dyn Tailorer>,
    /// Store placeholder text when the webhook reply shape is unknown.
    pub allow_placeholder_fallback: bool,
}
