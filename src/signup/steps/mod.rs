//! Per-step form units. Each owns the option catalogs and shortcuts for its
//! slice of the record and turns them into `FormPatch`es.

pub mod business;
pub mod contact;
pub mod payment;
pub mod verification;

use super::state::Step;

/// Heading and summary shown above a step's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPage {
    pub step: Step,
    pub heading: &'static str,
    pub summary: &'static str,
}

pub fn page(step: Step) -> StepPage {
    let (heading, summary) = match step {
        Step::BusinessInfo => (business::HEADING, business::SUMMARY),
        Step::ContactAddress => (contact::HEADING, contact::SUMMARY),
        Step::PaymentBanking => (payment::HEADING, payment::SUMMARY),
        Step::Verification => (verification::HEADING, verification::SUMMARY),
    };
    StepPage {
        step,
        heading,
        summary,
    }
}
