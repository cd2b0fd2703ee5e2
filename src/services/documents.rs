//! Document upload collaborator.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::SubmissionError;

/// Where an uploaded document lands in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    /// Replaces the business license file.
    BusinessLicense,
    /// Appended to the ownership documents.
    OwnershipDocument,
}

impl std::fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BusinessLicense => write!(f, "business_license"),
            Self::OwnershipDocument => write!(f, "ownership_document"),
        }
    }
}

/// Accepts a document for a slot and returns the stored file name.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upload(&self, slot: DocumentSlot) -> Result<String, SubmissionError>;
}

/// Stand-in store that uploads nothing and names files after the current time.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderDocuments;

impl PlaceholderDocuments {
    pub fn new() -> Self {
        Self
    }
}

/// Placeholder file name for a slot at a given millisecond timestamp.
pub fn placeholder_name(slot: DocumentSlot, millis: i64) -> String {
    match slot {
        DocumentSlot::BusinessLicense => format!("uploaded_document_{millis}.pdf"),
        DocumentSlot::OwnershipDocument => format!("doc_{millis}.pdf"),
    }
}

#[async_trait]
impl DocumentStore for PlaceholderDocuments {
    async fn upload(&self, slot: DocumentSlot) -> Result<String, SubmissionError> {
        Ok(placeholder_name(slot, Utc::now().timestamp_millis()))
    }
}
