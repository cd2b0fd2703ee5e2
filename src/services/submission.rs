//! Application submission collaborator.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::SubmissionError;
use crate::signup::model::FormRecord;

/// Acknowledgement of an accepted application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    pub reference: Uuid,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new() -> Self {
        Self {
            reference: Uuid::new_v4(),
            submitted_at: Utc::now(),
        }
    }
}

impl Default for SubmissionReceipt {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends a completed application for review.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    async fn submit(&self, record: &FormRecord) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Stand-in service: waits a fixed delay, then accepts every application.
#[derive(Debug, Clone)]
pub struct SimulatedSubmission {
    delay: Duration,
}

impl SimulatedSubmission {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedSubmission {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl SubmissionService for SimulatedSubmission {
    async fn submit(&self, _record: &FormRecord) -> Result<SubmissionReceipt, SubmissionError> {
        tracing::debug!(
            delay_ms = self.delay.as_millis() as u64,
            "Simulating application submission"
        );
        tokio::time::sleep(self.delay).await;
        Ok(SubmissionReceipt::new())
    }
}
