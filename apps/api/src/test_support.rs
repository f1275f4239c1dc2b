use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::state::AppState;
use crate::store::memory::MemoryResumeStore;
use crate::webhook_client::{TailorJob, Tailorer, WebhookError};

pub enum FakeOutcome {
    Reply(Value),
    Timeout,
    Status(u16),
    /// Transport failure before any reply.
    Unreachable,
    /// Deletes the pending record mid-flight, then replies.
    VanishRecord(Arc<MemoryResumeStore>, Value),
}

/// Scripted `Tailorer` that records the jobs it receives.
pub struct FakeTailorer {
    outcome: FakeOutcome,
    calls: AtomicUsize,
    last_job: Mutex<Option<Value>>,
}

impl FakeTailorer {
    pub fn new(outcome: FakeOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_job: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_job(&self) -> Option<Value> {
        self.last_job.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tailorer for FakeTailorer {
    async fn tailor(&self, job: &TailorJob<'_>) -> Result<Value, WebhookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_job.lock().unwrap() = Some(serde_json::to_value(job).unwrap());

        match &self.outcome {
            FakeOutcome::Reply(reply) => Ok(reply.clone()),
            FakeOutcome::Timeout => Err(WebhookError::Timeout(Duration::from_secs(30))),
            FakeOutcome::Status(status) => Err(WebhookError::Status {
                status: *status,
                body: "upstream failure".to_string(),
            }),
            FakeOutcome::Unreachable => {
                // An unparsable URL fails inside reqwest without touching the network.
                let err = reqwest::Client::new()
                    .post("not a url")
                    .send()
                    .await
                    .unwrap_err();
                Err(WebhookError::Http(err))
            }
            FakeOutcome::VanishRecord(store, reply) => {
                store.remove(job.record_id);
                Ok(reply.clone())
            }
        }
    }
}

pub fn test_state(
    store: Arc<MemoryResumeStore>,
    tailorer: Arc<FakeTailorer>,
    allow_placeholder_fallback: bool,
) -> AppState {
    AppState {
        store,
        tailorer,
        allow_placeholder_fallback,
    }
}
