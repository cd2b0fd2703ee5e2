//! Step 4: documents, tax ID and a final review.

use crate::services::DocumentSlot;
use crate::signup::model::{FormPatch, FormRecord};

pub const HEADING: &str = "Verification & Review";
pub const SUMMARY: &str =
    "Upload required documents and review your application before submission.";

pub const NEXT_STEPS: &[&str] = &[
    "Your application will be reviewed within 1-2 business days",
    "We may contact you for additional information or clarification",
    "Once approved, you'll receive setup instructions and API credentials",
    "Our support team will help you integrate PaymentPro into your system",
];

/// One line of the review checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub label: &'static str,
    pub complete: bool,
}

pub fn review_checklist(record: &FormRecord) -> Vec<ReviewItem> {
    vec![
        ReviewItem {
            label: "Business License",
            complete: !record.verification.business_license.is_empty(),
        },
        ReviewItem {
            label: "Tax ID",
            complete: !record.verification.tax_id.is_empty(),
        },
    ]
}

/// Patch placing an uploaded file: the license is replaced, ownership
/// documents are appended in upload order.
pub fn attach_document(record: &FormRecord, slot: DocumentSlot, file_name: String) -> FormPatch {
    match slot {
        DocumentSlot::BusinessLicense => FormPatch::new().business_license(file_name),
        DocumentSlot::OwnershipDocument => {
            let mut docs = record.verification.ownership_documents.clone();
            docs.push(file_name);
            FormPatch::new().ownership_documents(docs)
        }
    }
}
