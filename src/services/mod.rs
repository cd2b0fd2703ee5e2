//! External collaborators of the wizard: submission, document upload and
//! description suggestions. Each ships with a stand-in implementation.

pub mod documents;
pub mod submission;
pub mod suggestions;

pub use documents::{DocumentSlot, DocumentStore, PlaceholderDocuments};
pub use submission::{SimulatedSubmission, SubmissionReceipt, SubmissionService};
pub use suggestions::{DescriptionSuggester, FixedSuggester, TemplateSuggester};
