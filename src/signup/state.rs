//! Wizard step state machine.

use serde::{Deserialize, Serialize};

use super::model::fields;

/// The four ordered stages of the signup wizard.
///
/// Progresses linearly: BusinessInfo → ContactAddress → PaymentBanking →
/// Verification. Submission is only reachable from Verification.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    BusinessInfo,
    ContactAddress,
    PaymentBanking,
    Verification,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::BusinessInfo,
        Step::ContactAddress,
        Step::PaymentBanking,
        Step::Verification,
    ];

    pub const COUNT: u8 = 4;

    /// 1-based position of the step.
    pub fn index(&self) -> u8 {
        match self {
            Self::BusinessInfo => 1,
            Self::ContactAddress => 2,
            Self::PaymentBanking => 3,
            Self::Verification => 4,
        }
    }

    pub fn from_index(index: u8) -> Option<Step> {
        match index {
            1 => Some(Self::BusinessInfo),
            2 => Some(Self::ContactAddress),
            3 => Some(Self::PaymentBanking),
            4 => Some(Self::Verification),
            _ => None,
        }
    }

    pub fn next(&self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(&self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_first(&self) -> bool {
        self.previous().is_none()
    }

    pub fn is_final(&self) -> bool {
        self.next().is_none()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BusinessInfo => "Business Information",
            Self::ContactAddress => "Contact & Address",
            Self::PaymentBanking => "Payment & Banking",
            Self::Verification => "Verification & Review",
        }
    }

    /// Serialized names of the form fields this step reads and writes.
    pub fn fields(&self) -> &'static [&'static str] {
        use fields::*;
        match self {
            Self::BusinessInfo => &[
                BUSINESS_NAME,
                BUSINESS_TYPE,
                BUSINESS_DESCRIPTION,
                MERCHANT_CATEGORY_CODE,
            ],
            Self::ContactAddress => &[
                CONTACT_NAME,
                CONTACT_EMAIL,
                CONTACT_PHONE,
                COUNTRY,
                ADDRESS,
                CITY,
                STATE,
                POSTAL_CODE,
            ],
            Self::PaymentBanking => &[
                MONTHLY_VOLUME,
                AVERAGE_TRANSACTION,
                WEBSITE,
                PAYMENT_METHODS,
                BANK_NAME,
                ACCOUNT_NUMBER,
                ROUTING_NUMBER,
            ],
            Self::Verification => &[BUSINESS_LICENSE, TAX_ID, OWNERSHIP_DOCUMENTS],
        }
    }

    /// The step that owns a serialized field name.
    pub fn owning(field: &str) -> Option<Step> {
        Self::ALL
            .into_iter()
            .find(|s| s.fields().iter().any(|f| *f == field))
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BusinessInfo => "business_info",
            Self::ContactAddress => "contact_address",
            Self::PaymentBanking => "payment_banking",
            Self::Verification => "verification",
        };
        write!(f, "{s}")
    }
}

/// Snapshot of the wizard published to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WizardStatus {
    pub step: Step,
    /// A submission is in flight; navigation is suspended.
    pub submitting: bool,
    /// The last persistence write failed; the form lives in memory only.
    pub persistence_degraded: bool,
}

impl WizardStatus {
    /// Completion percentage shown in the progress bar.
    pub fn progress_percent(&self) -> u8 {
        (u16::from(self.step.index()) * 100 / u16::from(Step::COUNT)) as u8
    }

    /// "Step N of 4".
    pub fn progress_label(&self) -> String {
        format!("Step {} of {}", self.step.index(), Step::COUNT)
    }
}
