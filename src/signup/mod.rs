//! Merchant signup wizard: a four-step form with gated forward navigation,
//! write-through persistence and a single submission at the end.

pub mod controller;
pub mod guidance;
pub mod model;
pub mod state;
pub mod steps;
pub mod validation;

pub use controller::{Navigation, WizardController, WizardDeps};
pub use model::{
    Address, BankingInfo, BusinessInfo, BusinessType, ContactInfo, Country, FormPatch,
    FormRecord, MonthlyVolume, PaymentProfile, Verification,
};
pub use state::{Step, WizardStatus};
pub use validation::{can_advance, missing_fields};
