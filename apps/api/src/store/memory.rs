//! In-memory `ResumeStore` for handler and pipeline tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::resume::{NewResume, RecordStatus, ResumeRecord};
use crate::store::{ResumeStore, StoreError};
use crate::webhook_client::normalize::TailoredOutput;

#[derive(Default)]
pub struct MemoryResumeStore {
    records: Mutex<Vec<ResumeRecord>>,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of insert/update calls that reached the store.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn get(&self, id: Uuid) -> Option<ResumeRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn all(&self) -> Vec<ResumeRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Removes a record behind the pipeline's back.
    pub fn remove(&self, id: Uuid) {
        self.records.lock().unwrap().retain(|r| r.id != id);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn transition<F>(&self, id: Uuid, owner_id: &str, apply: F) -> Result<ResumeRecord, StoreError>
    where
        F: FnOnce(&mut ResumeRecord),
    {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner_id && r.status == RecordStatus::Pending)
            .ok_or_else(|| StoreError::NoMatch {
                id,
                owner_id: owner_id.to_string(),
            })?;
        apply(record);
        record.updated_at = Some(Utc::now());
        Ok(record.clone())
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn insert_pending(&self, new: NewResume<'_>) -> Result<ResumeRecord, StoreError> {
        self.check_available()?;
        self.writes.fetch_add(1, Ordering::SeqCst);

        let record = ResumeRecord {
            id: Uuid::new_v4(),
            owner_id: new.owner_id.to_string(),
            resume_input: new.resume_input.to_string(),
            job_description: new.job_description.to_string(),
            tailored_resume: None,
            tailored_resume_url: None,
            status: RecordStatus::Pending,
            reply_shape: None,
            failure_reason: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn mark_tailored(
        &self,
        id: Uuid,
        owner_id: &str,
        output: &TailoredOutput,
    ) -> Result<ResumeRecord, StoreError> {
        self.transition(id, owner_id, |record| {
            record.tailored_resume = Some(output.text.clone());
            record.tailored_resume_url = output.url.clone();
            record.reply_shape = Some(output.shape.as_str().to_string());
            record.status = RecordStatus::Tailored;
        })
    }

    async fn mark_failed(&self, id: Uuid, owner_id: &str, reason: &str) -> Result<(), StoreError> {
        self.transition(id, owner_id, |record| {
            record.failure_reason = Some(reason.to_string());
            record.status = RecordStatus::Failed;
        })
        .map(|_| ())
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ResumeRecord>, StoreError> {
        self.check_available()?;

        // Same order as the SQL: created_at DESC, id DESC.
        let mut found: Vec<ResumeRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(found)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook_client::normalize::ReplyShape;

    fn new_resume(owner_id: &str) -> NewResume<'_> {
        NewResume {
            owner_id,
            resume_input: "resume",
            job_description: "jd",
        }
    }

    fn output(text: &str) -> TailoredOutput {
        TailoredOutput {
            shape: ReplyShape::Direct,
            text: text.to_string(),
            url: None,
        }
    }

    #[tokio::test]
    async fn test_update_scoped_to_owner() {
        let store = MemoryResumeStore::new();
        let record = store.insert_pending(new_resume("alice")).await.unwrap();

        let err = store
            .mark_tailored(record.id, "mallory", &output("X"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NoMatch { .. }));
        assert_eq!(store.get(record.id).unwrap().status, RecordStatus::Pending);
    }

    #[tokio::test]
    async fn test_equal_timestamps_order_by_id_desc() {
        let store = MemoryResumeStore::new();
        let first = store.insert_pending(new_resume("alice")).await.unwrap();
        let second = store.insert_pending(new_resume("alice")).await.unwrap();
        store.records.lock().unwrap()[1].created_at = first.created_at;

        let found = store.find_by_owner("alice").await.unwrap();

        let expected_first = first.id.max(second.id);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, expected_first);
    }

    #[tokio::test]
    async fn test_record_leaves_pending_only_once() {
        let store = MemoryResumeStore::new();
        let record = store.insert_pending(new_resume("alice")).await.unwrap();

        store
            .mark_tailored(record.id, "alice", &output("X"))
            .await
            .unwrap();
        assert!(store
            .mark_tailored(record.id, "alice", &output("Y"))
            .await
            .is_err());
        assert!(store.mark_failed(record.id, "alice", "late").await.is_err());

        let stored = store.get(record.id).unwrap();
        assert_eq!(stored.status, RecordStatus::Tailored);
        assert_eq!(stored.tailored_resume.as_deref(), Some("X"));
        assert_eq!(stored.failure_reason, None);
    }
}
