//! Guidance panel: read-only overview of all steps relative to the current one.

use serde::Serialize;

use super::state::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Upcoming,
}

/// One card of the guidance panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideEntry {
    pub step: Step,
    pub title: &'static str,
    pub description: &'static str,
    pub estimated_time: &'static str,
    pub requirements: [&'static str; 3],
    pub status: StepStatus,
}

pub const PANEL_TITLE: &str = "PaymentPro Signup";
pub const PANEL_TAGLINE: &str =
    "Join thousands of merchants who trust PaymentPro for secure, fast payments";
pub const AUTOSAVE_NOTE: &str =
    "Your application is automatically saved. You can return anytime to complete it.";

fn describe(step: Step) -> (&'static str, &'static str, [&'static str; 3]) {
    match step {
        Step::BusinessInfo => (
            "Tell us about your business and what you do",
            "2-3 minutes",
            [
                "Business name and type",
                "Business description",
                "Merchant category code",
            ],
        ),
        Step::ContactAddress => (
            "Your contact details and business location",
            "1-2 minutes",
            [
                "Primary contact information",
                "Complete business address",
                "Phone number verification",
            ],
        ),
        Step::PaymentBanking => (
            "Set up your payment processing preferences",
            "3-4 minutes",
            [
                "Monthly transaction volume",
                "Preferred payment methods",
                "Banking information",
            ],
        ),
        Step::Verification => (
            "Upload documents and review your application",
            "2-3 minutes",
            [
                "Business license",
                "Tax identification",
                "Ownership documents",
            ],
        ),
    }
}

pub fn status_for(step: Step, current: Step) -> StepStatus {
    match step.cmp(&current) {
        std::cmp::Ordering::Less => StepStatus::Completed,
        std::cmp::Ordering::Equal => StepStatus::Active,
        std::cmp::Ordering::Greater => StepStatus::Upcoming,
    }
}

/// Guidance cards for every step, marked relative to `current`.
pub fn entries(current: Step) -> Vec<GuideEntry> {
    Step::ALL
        .into_iter()
        .map(|step| {
            let (description, estimated_time, requirements) = describe(step);
            GuideEntry {
                step,
                title: step.title(),
                description,
                estimated_time,
                requirements,
                status: status_for(step, current),
            }
        })
        .collect()
}

/// Plain-text rendering of the panel, as printed by the CLI.
pub fn render(current: Step) -> String {
    let mut lines = vec![PANEL_TITLE.to_string(), PANEL_TAGLINE.to_string(), String::new()];
    for entry in entries(current) {
        let marker = match entry.status {
            StepStatus::Completed => "[x]",
            StepStatus::Active => "[>]",
            StepStatus::Upcoming => "[ ]",
        };
        lines.push(format!(
            "{marker} {}. {} ({})",
            entry.step.index(),
            entry.title,
            entry.estimated_time
        ));
        lines.push(format!("    {}", entry.description));
        for req in entry.requirements {
            lines.push(format!("    - {req}"));
        }
    }
    lines.push(String::new());
    lines.push(AUTOSAVE_NOTE.to_string());
    lines.join("\n")
}
