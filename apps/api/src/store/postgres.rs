use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::{NewResume, RecordStatus, ResumeRecord};
use crate::store::{ResumeStore, StoreError};
use crate::webhook_client::normalize::TailoredOutput;

/// Postgres-backed store over the `resumes` table.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn insert_pending(&self, new: NewResume<'_>) -> Result<ResumeRecord, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRecord>(
            r#"
            INSERT INTO resumes (owner_id, resume_input, job_description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(new.owner_id)
        .bind(new.resume_input)
        .bind(new.job_description)
        .bind(RecordStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn mark_tailored(
        &self,
        id: Uuid,
        owner_id: &str,
        output: &TailoredOutput,
    ) -> Result<ResumeRecord, StoreError> {
        // Only the pending record of the same owner may transition.
        sqlx::query_as::<_, ResumeRecord>(
            r#"
            UPDATE resumes
            SET tailored_resume = $1,
                tailored_resume_url = $2,
                reply_shape = $3,
                status = $4,
                updated_at = now()
            WHERE id = $5 AND owner_id = $6 AND status = $7
            RETURNING *
            "#,
        )
        .bind(&output.text)
        .bind(output.url.as_deref())
        .bind(output.shape.as_str())
        .bind(RecordStatus::Tailored.as_str())
        .bind(id)
        .bind(owner_id)
        .bind(RecordStatus::Pending.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NoMatch {
            id,
            owner_id: owner_id.to_string(),
        })
    }

    async fn mark_failed(&self, id: Uuid, owner_id: &str, reason: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE resumes
            SET status = $1, failure_reason = $2, updated_at = now()
            WHERE id = $3 AND owner_id = $4 AND status = $5
            "#,
        )
        .bind(RecordStatus::Failed.as_str())
        .bind(reason)
        .bind(id)
        .bind(owner_id)
        .bind(RecordStatus::Pending.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NoMatch {
                id,
                owner_id: owner_id.to_string(),
            });
        }
        Ok(())
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ResumeRecord>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeRecord>(
            "SELECT * FROM resumes WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
