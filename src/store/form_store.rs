//! Versioned persistence of the signup form on top of a `KeyValueStore`.
//!
//! The record is stored as an envelope:
//! `{"version": 1, "savedAt": "<rfc3339>", "record": {...}}`.
//!
//! Loading never fails the caller. Missing, corrupted or too-new values
//! all yield the default record.
//!
//! Migration policy:
//! - every record section is `#[serde(default)]`, so older shapes merge
//!   with defaults;
//! - a bare record without an envelope is read as the current version,
//!   either sectioned or in the flat one-key-per-field layout;
//! - an envelope from a newer schema version is discarded with a warning.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::signup::model::{FormPatch, FormRecord};
use crate::signup::state::Step;
use crate::store::traits::KeyValueStore;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    record: FormRecord,
}

/// Loads and saves the form record under a key.
#[derive(Clone)]
pub struct FormStore {
    backend: Arc<dyn KeyValueStore>,
}

impl FormStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Read the record under `key`, or the default when absent or unreadable.
    pub async fn load(&self, key: &str) -> FormRecord {
        let value = match self.backend.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => return FormRecord::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored form, starting empty");
                return FormRecord::default();
            }
        };

        match decode(value) {
            Ok(record) => record,
            Err(reason) => {
                tracing::warn!(key, %reason, "Discarding stored form, starting empty");
                FormRecord::default()
            }
        }
    }

    /// Write `record` under `key`, replacing any previous value.
    pub async fn save(&self, key: &str, record: &FormRecord) -> Result<(), StoreError> {
        let envelope = Envelope {
            version: SCHEMA_VERSION,
            saved_at: Some(Utc::now()),
            record: record.clone(),
        };
        let value = serde_json::to_value(&envelope)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.backend.set(key, &value).await
    }

    /// Remove the stored record. Returns whether anything was removed.
    pub async fn clear(&self, key: &str) -> Result<bool, StoreError> {
        self.backend.delete(key).await
    }
}

/// Top-level keys of the sectioned record layout.
const SECTION_KEYS: [&str; 6] = [
    "business",
    "contact",
    "address",
    "payment",
    "banking",
    "verification",
];

/// Reasons name the failure category only; stored values never reach the log.
fn decode(value: serde_json::Value) -> Result<FormRecord, String> {
    let serde_json::Value::Object(object) = value else {
        return Err("stored value is not an object".to_string());
    };

    match object.get("version").and_then(serde_json::Value::as_u64) {
        Some(version) if version > u64::from(SCHEMA_VERSION) => Err(format!(
            "schema version {version} is newer than supported version {SCHEMA_VERSION}"
        )),
        Some(_) => serde_json::from_value::<Envelope>(serde_json::Value::Object(object))
            .map(|env| env.record)
            .map_err(|e| format!("malformed envelope ({:?})", e.classify())),
        None if is_sectioned(&object) => {
            serde_json::from_value::<FormRecord>(serde_json::Value::Object(object))
                .map_err(|e| format!("malformed record ({:?})", e.classify()))
        }
        None => decode_flat(object),
    }
}

fn is_sectioned(object: &serde_json::Map<String, serde_json::Value>) -> bool {
    SECTION_KEYS
        .iter()
        .any(|key| object.get(*key).is_some_and(serde_json::Value::is_object))
}

/// The flat camelCase layout, one key per form field, as a `FormPatch`
/// spells it. Keys that name no form field are skipped.
fn decode_flat(object: serde_json::Map<String, serde_json::Value>) -> Result<FormRecord, String> {
    if object.is_empty() {
        return Ok(FormRecord::default());
    }
    let known: serde_json::Map<String, serde_json::Value> = object
        .into_iter()
        .filter(|(key, _)| Step::owning(key).is_some())
        .collect();
    if known.is_empty() {
        return Err("no recognised form fields".to_string());
    }

    let patch = serde_json::from_value::<FormPatch>(serde_json::Value::Object(known))
        .map_err(|e| format!("malformed flat record ({:?})", e.classify()))?;
    let mut record = FormRecord::default();
    record.apply(patch);
    Ok(record)
}
