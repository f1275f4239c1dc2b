//! Resume store: persistence for tailoring records.
//!
//! `PgResumeStore` is the production backend. Handlers only see
//! `Arc<dyn ResumeStore>` from `AppState`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeRecord};
use crate::webhook_client::normalize::TailoredOutput;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgResumeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The update matched no pending record for this id and owner.
    #[error("No pending record {id} for owner {owner_id}")]
    NoMatch { id: Uuid, owner_id: String },
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Inserts a `pending` record with null tailored fields.
    async fn insert_pending(&self, new: NewResume<'_>) -> Result<ResumeRecord, StoreError>;

    /// Moves a pending record owned by `owner_id` to `tailored`.
    async fn mark_tailored(
        &self,
        id: Uuid,
        owner_id: &str,
        output: &TailoredOutput,
    ) -> Result<ResumeRecord, StoreError>;

    /// Moves a pending record owned by `owner_id` to `failed`.
    async fn mark_failed(&self, id: Uuid, owner_id: &str, reason: &str) -> Result<(), StoreError>;

    /// All records of an owner, newest first.
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ResumeRecord>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
