//! WizardController: owns the form record and current step, gates
//! navigation, persists every change and drives submission.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::SignupConfig;
use crate::error::WizardError;
use crate::services::{
    DescriptionSuggester, DocumentSlot, DocumentStore, SubmissionReceipt, SubmissionService,
};
use crate::store::FormStore;

use super::model::{FormPatch, FormRecord};
use super::state::{Step, WizardStatus};
use super::steps::{business, payment, verification};
use super::validation;

/// External collaborators of the wizard.
#[derive(Clone)]
pub struct WizardDeps {
    pub store: FormStore,
    pub submission: Arc<dyn SubmissionService>,
    pub documents: Arc<dyn DocumentStore>,
    pub suggester: Arc<dyn DescriptionSuggester>,
}

/// Outcome of a successful `next()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Advanced(Step),
    Submitted(SubmissionReceipt),
}

/// Marks the wizard busy for as long as it is alive, including when the
/// submit future is dropped mid-flight.
struct Busy<'a> {
    status: &'a watch::Sender<WizardStatus>,
}

impl<'a> Busy<'a> {
    fn enter(status: &'a watch::Sender<WizardStatus>) -> Self {
        status.send_modify(|s| s.submitting = true);
        Self { status }
    }
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        self.status.send_modify(|s| s.submitting = false);
    }
}

pub struct WizardController {
    deps: WizardDeps,
    storage_key: String,
    submit_timeout: Duration,
    record: FormRecord,
    step: Step,
    status: watch::Sender<WizardStatus>,
}

impl WizardController {
    /// Restore the stored record (or start empty) at the first step.
    pub async fn open(deps: WizardDeps, config: &SignupConfig) -> Self {
        let record = deps.store.load(&config.storage_key).await;
        if !record.is_empty() {
            tracing::info!(key = %config.storage_key, "Restored saved signup form");
        }
        let (status, _) = watch::channel(WizardStatus::default());
        Self {
            deps,
            storage_key: config.storage_key.clone(),
            submit_timeout: config.submit_timeout,
            record,
            step: Step::default(),
            status,
        }
    }

    pub fn record(&self) -> &FormRecord {
        &self.record
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn status(&self) -> WizardStatus {
        *self.status.borrow()
    }

    /// Observe step, submission and persistence changes.
    pub fn subscribe(&self) -> watch::Receiver<WizardStatus> {
        self.status.subscribe()
    }

    pub fn can_advance(&self) -> bool {
        validation::can_advance(self.step, &self.record)
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        validation::missing_fields(self.step, &self.record)
    }

    /// Shallow-merge `patch` into the record, then write it through to storage.
    pub async fn update_form_data(&mut self, patch: FormPatch) {
        if patch.is_empty() {
            return;
        }
        let changed = patch.changed_fields();
        if patch.owner_steps().iter().any(|owner| *owner != self.step) {
            tracing::debug!(step = %self.step, fields = ?changed, "Patch reaches beyond the current step");
        }
        self.record.apply(patch);
        tracing::debug!(step = %self.step, fields = ?changed, "Form updated");
        self.persist().await;
    }

    /// Advance one step, or submit when already at the final step.
    pub async fn next(&mut self) -> Result<Navigation, WizardError> {
        let Some(next) = self.step.next() else {
            return self.submit().await.map(Navigation::Submitted);
        };

        let missing = self.missing_fields();
        if !missing.is_empty() {
            tracing::debug!(step = %self.step, ?missing, "Step incomplete, staying put");
            return Err(WizardError::StepIncomplete {
                step: self.step,
                missing,
            });
        }

        self.set_step(next);
        tracing::info!(step = %next, "Advanced to next step");
        Ok(Navigation::Advanced(next))
    }

    /// Go back one step. Never gated; a no-op on the first step.
    pub fn previous(&mut self) -> Step {
        if let Some(prev) = self.step.previous() {
            self.set_step(prev);
            tracing::info!(step = %prev, "Went back a step");
        }
        self.step
    }

    /// Submit the application. See [`submit_until`](Self::submit_until).
    pub async fn submit(&mut self) -> Result<SubmissionReceipt, WizardError> {
        self.submit_until(std::future::pending()).await
    }

    /// Submit the application, abandoning it when `cancel` resolves first.
    ///
    /// On success the record is reset to empty and the wizard returns to the
    /// first step. On failure, timeout or cancellation the record and step
    /// are left untouched so the submission can be retried.
    pub async fn submit_until<F>(&mut self, cancel: F) -> Result<SubmissionReceipt, WizardError>
    where
        F: Future<Output = ()>,
    {
        if !self.step.is_final() {
            return Err(WizardError::NotAtFinalStep { step: self.step });
        }
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(WizardError::StepIncomplete {
                step: self.step,
                missing,
            });
        }

        let timeout = self.submit_timeout;
        let outcome = {
            let _busy = Busy::enter(&self.status);
            tracing::info!("Submitting merchant application");
            let attempt = tokio::time::timeout(timeout, self.deps.submission.submit(&self.record));
            tokio::select! {
                result = attempt => match result {
                    Ok(Ok(receipt)) => Ok(receipt),
                    Ok(Err(e)) => Err(WizardError::SubmissionFailed(e)),
                    Err(_) => Err(WizardError::SubmissionTimedOut { timeout }),
                },
                _ = cancel => Err(WizardError::SubmissionCancelled),
            }
        };

        match outcome {
            Ok(receipt) => {
                tracing::info!(reference = %receipt.reference, "Application submitted");
                self.record = FormRecord::default();
                self.set_step(Step::default());
                self.persist().await;
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Submission did not complete, form kept");
                Err(e)
            }
        }
    }

    /// Add or remove one accepted payment method.
    pub async fn toggle_payment_method(&mut self, id: &str, enabled: bool) {
        let patch = payment::toggle_payment_method(&self.record, id, enabled);
        self.update_form_data(patch).await;
    }

    /// Replace the accepted methods with the popular ones.
    pub async fn suggest_popular_payment_methods(&mut self) {
        self.update_form_data(payment::popular_payment_methods())
            .await;
    }

    /// Fill the category code from the suggestion list.
    pub async fn apply_category_suggestion(&mut self, code: &str) -> Result<(), WizardError> {
        let patch = business::select_category(code)?;
        self.update_form_data(patch).await;
        Ok(())
    }

    /// Ask the suggester for a business description and store it.
    pub async fn suggest_description(&mut self) -> Result<(), WizardError> {
        let patch = business::suggest_description(&self.record, self.deps.suggester.as_ref())
            .ok_or(WizardError::SuggestionUnavailable)?;
        self.update_form_data(patch).await;
        Ok(())
    }

    /// Upload a document for `slot` and record its file name.
    pub async fn upload_document(&mut self, slot: DocumentSlot) -> Result<String, WizardError> {
        let file_name = self
            .deps
            .documents
            .upload(slot)
            .await
            .map_err(WizardError::UploadFailed)?;
        tracing::info!(%slot, "Document uploaded");
        let patch = verification::attach_document(&self.record, slot, file_name.clone());
        self.update_form_data(patch).await;
        Ok(file_name)
    }

    /// Discard the form, clear storage and return to the first step.
    pub async fn reset(&mut self) {
        self.record = FormRecord::default();
        self.set_step(Step::default());
        if let Err(e) = self.deps.store.clear(&self.storage_key).await {
            tracing::warn!(error = %e, "Failed to clear stored form, overwriting it instead");
            self.persist().await;
        }
        tracing::info!("Signup form reset");
    }

    fn set_step(&mut self, step: Step) {
        self.step = step;
        self.status.send_modify(|s| s.step = step);
    }

    /// Write the record through. A failed write leaves the wizard running
    /// in memory and flags the status.
    async fn persist(&mut self) {
        let result = self.deps.store.save(&self.storage_key, &self.record).await;
        let degraded = result.is_err();
        match result {
            Ok(()) if self.status().persistence_degraded => {
                tracing::info!("Form storage recovered");
            }
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save signup form, continuing in memory");
            }
        }
        self.status
            .send_if_modified(|s| std::mem::replace(&mut s.persistence_degraded, degraded) != degraded);
    }
}
