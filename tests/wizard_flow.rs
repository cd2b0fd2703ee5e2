//! End-to-end tests of the signup wizard over a file-backed libSQL store.
//!
//! Each test opens a fresh database in a temp directory, drives the
//! wizard through its public API and reopens the store where restoring
//! state matters.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use merchant_signup::config::SignupConfig;
use merchant_signup::error::{SubmissionError, WizardError};
use merchant_signup::services::{
    DocumentSlot, FixedSuggester, PlaceholderDocuments, SimulatedSubmission, SubmissionReceipt,
    SubmissionService,
};
use merchant_signup::signup::{
    BusinessType, Country, FormPatch, FormRecord, MonthlyVolume, Navigation, Step,
    WizardController, WizardDeps,
};
use merchant_signup::store::{FormStore, KeyValueStore, LibSqlStore};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Counts submissions and records what was sent.
#[derive(Default)]
struct RecordingSubmission {
    calls: AtomicUsize,
    last: tokio::sync::Mutex<Option<FormRecord>>,
}

#[async_trait]
impl SubmissionService for RecordingSubmission {
    async fn submit(&self, record: &FormRecord) -> Result<SubmissionReceipt, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().await = Some(record.clone());
        Ok(SubmissionReceipt::new())
    }
}

struct RejectingSubmission;

#[async_trait]
impl SubmissionService for RejectingSubmission {
    async fn submit(&self, _record: &FormRecord) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::Rejected {
            reason: "routing number not recognised".into(),
        })
    }
}

fn config() -> SignupConfig {
    SignupConfig {
        submit_timeout: Duration::from_secs(2),
        ..Default::default()
    }
}

async fn open_store(dir: &tempfile::TempDir) -> Arc<LibSqlStore> {
    let path = dir.path().join("data").join("signup.db");
    Arc::new(LibSqlStore::new_local(&path).await.unwrap())
}

async fn open_wizard(
    backend: Arc<LibSqlStore>,
    submission: Arc<dyn SubmissionService>,
) -> WizardController {
    let deps = WizardDeps {
        store: FormStore::new(backend),
        submission,
        documents: Arc::new(PlaceholderDocuments::new()),
        suggester: Arc::new(FixedSuggester::new(1)),
    };
    WizardController::open(deps, &config()).await
}

/// Fill and leave each of the first three steps, then fill verification.
async fn complete_all_steps(wizard: &mut WizardController) {
    wizard
        .update_form_data(
            FormPatch::new()
                .business_name("Acme Widgets")
                .business_type(BusinessType::Corporation),
        )
        .await;
    wizard.apply_category_suggestion("5999").await.unwrap();
    wizard.suggest_description().await.unwrap();
    assert_eq!(
        wizard.next().await.unwrap(),
        Navigation::Advanced(Step::ContactAddress)
    );

    wizard
        .update_form_data(
            FormPatch::new()
                .contact_name("Jo Smith")
                .contact_email("jo@acme.test")
                .country(Country::UnitedStates)
                .address("1 Main St")
                .city("Austin")
                .state("Texas"),
        )
        .await;
    assert_eq!(
        wizard.next().await.unwrap(),
        Navigation::Advanced(Step::PaymentBanking)
    );

    wizard
        .update_form_data(
            FormPatch::new()
                .monthly_volume(MonthlyVolume::UpToFiveThousand)
                .bank_name("First Bank")
                .account_number("000123456789"),
        )
        .await;
    wizard.suggest_popular_payment_methods().await;
    wizard.toggle_payment_method("apple-pay", false).await;
    assert_eq!(
        wizard.next().await.unwrap(),
        Navigation::Advanced(Step::Verification)
    );

    wizard
        .upload_document(DocumentSlot::BusinessLicense)
        .await
        .unwrap();
    wizard
        .update_form_data(FormPatch::new().tax_id("12-3456789"))
        .await;
}

#[tokio::test]
async fn full_signup_submits_exactly_once() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let backend = open_store(&dir).await;
        let submission = Arc::new(RecordingSubmission::default());
        let mut wizard = open_wizard(backend.clone(), submission.clone()).await;

        complete_all_steps(&mut wizard).await;
        assert!(wizard.can_advance());

        let nav = wizard.next().await.unwrap();
        assert!(matches!(nav, Navigation::Submitted(_)));
        assert_eq!(submission.calls.load(Ordering::SeqCst), 1);

        let sent = submission.last.lock().await.clone().unwrap();
        assert_eq!(sent.business.name, "Acme Widgets");
        assert_eq!(
            sent.business.category_code,
            "5999 - Miscellaneous Retail Stores"
        );
        assert!(sent.business.description.contains("Acme Widgets"));
        assert_eq!(sent.payment.methods.len(), 5);
        assert!(!sent.payment.methods.contains("apple-pay"));
        assert!(sent.verification.business_license.starts_with("uploaded_document_"));

        assert!(wizard.record().is_empty());
        assert_eq!(wizard.step(), Step::BusinessInfo);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn progress_survives_reopening_the_store() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let saved = {
            let backend = open_store(&dir).await;
            let mut wizard =
                open_wizard(backend, Arc::new(SimulatedSubmission::new(Duration::ZERO))).await;
            complete_all_steps(&mut wizard).await;
            wizard.record().clone()
        };

        let backend = open_store(&dir).await;
        let wizard =
            open_wizard(backend, Arc::new(SimulatedSubmission::new(Duration::ZERO))).await;
        assert_eq!(wizard.record(), &saved);
        assert_eq!(wizard.step(), Step::BusinessInfo);
        assert!(wizard.can_advance());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn rejected_submission_keeps_saved_progress() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let backend = open_store(&dir).await;
        let mut wizard = open_wizard(backend.clone(), Arc::new(RejectingSubmission)).await;
        complete_all_steps(&mut wizard).await;

        let err = wizard.next().await.unwrap_err();
        assert!(matches!(
            err,
            WizardError::SubmissionFailed(SubmissionError::Rejected { .. })
        ));
        assert_eq!(wizard.step(), Step::Verification);
        assert!(!wizard.status().submitting);

        let stored = FormStore::new(backend).load(&config().storage_key).await;
        assert_eq!(&stored, wizard.record());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn corrupted_storage_starts_empty() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let backend = open_store(&dir).await;
        backend
            .set(
                &config().storage_key,
                &serde_json::json!({"version": 1, "record": "not a record"}),
            )
            .await
            .unwrap();

        let mut wizard =
            open_wizard(backend.clone(), Arc::new(SimulatedSubmission::new(Duration::ZERO))).await;
        assert!(wizard.record().is_empty());

        wizard
            .update_form_data(FormPatch::new().business_name("Fresh Start"))
            .await;
        let stored = FormStore::new(backend).load(&config().storage_key).await;
        assert_eq!(stored.business.name, "Fresh Start");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn reset_removes_saved_progress() {
    timeout(TEST_TIMEOUT, async {
        let dir = tempfile::tempdir().unwrap();
        let backend = open_store(&dir).await;
        let mut wizard =
            open_wizard(backend.clone(), Arc::new(SimulatedSubmission::new(Duration::ZERO))).await;
        complete_all_steps(&mut wizard).await;

        wizard.reset().await;
        assert!(backend.get(&config().storage_key).await.unwrap().is_none());

        let reopened =
            open_wizard(backend, Arc::new(SimulatedSubmission::new(Duration::ZERO))).await;
        assert!(reopened.record().is_empty());
    })
    .await
    .expect("test timed out");
}
