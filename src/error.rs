//! Error types for the merchant signup wizard.

use std::time::Duration;

use crate::signup::state::Step;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage backend failed: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

/// Errors raised by the external collaborators (submission, uploads).
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("Application rejected: {reason}")]
    Rejected { reason: String },

    #[error("Submission service unavailable: {0}")]
    Unavailable(String),

    #[error("Document upload failed: {0}")]
    Upload(String),
}

/// Navigation and submission errors surfaced by the wizard controller.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} is incomplete, missing: {}", missing.join(", "))]
    StepIncomplete { step: Step, missing: Vec<&'static str> },

    #[error("Submission is only available from the verification step (currently at {step})")]
    NotAtFinalStep { step: Step },

    #[error("Submission failed, the form was kept and can be retried: {0}")]
    SubmissionFailed(#[source] SubmissionError),

    #[error("Submission timed out after {timeout:?}, the form was kept and can be retried")]
    SubmissionTimedOut { timeout: Duration },

    #[error("Submission was cancelled, the form was kept")]
    SubmissionCancelled,

    #[error("Unknown merchant category code suggestion: {code}")]
    UnknownSuggestion { code: String },

    #[error("A description can only be suggested once business name and type are set")]
    SuggestionUnavailable,

    #[error("Document upload failed: {0}")]
    UploadFailed(#[source] SubmissionError),

    #[error("Invalid form update: {0}")]
    InvalidPatch(String),
}

impl WizardError {
    /// Whether the user can retry the same action without changing the form.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SubmissionFailed(_)
                | Self::SubmissionTimedOut { .. }
                | Self::SubmissionCancelled
                | Self::UploadFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_step_lists_missing_fields() {
        let err = WizardError::StepIncomplete {
            step: Step::BusinessInfo,
            missing: vec!["businessName", "businessType"],
        };
        let msg = err.to_string();
        assert!(msg.contains("businessName, businessType"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn submission_failures_are_retryable() {
        assert!(WizardError::SubmissionCancelled.is_retryable());
        assert!(
            WizardError::SubmissionTimedOut {
                timeout: Duration::from_secs(1)
            }
            .is_retryable()
        );
        assert!(
            WizardError::SubmissionFailed(SubmissionError::Unavailable("down".into()))
                .is_retryable()
        );
    }

    #[test]
    fn wizard_error_converts_to_top_level() {
        let err: Error = WizardError::SuggestionUnavailable.into();
        assert!(err.to_string().starts_with("Wizard error:"));
    }
}
