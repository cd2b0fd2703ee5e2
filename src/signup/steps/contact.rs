//! Step 2: contact person and business address.

use crate::signup::model::{Choice, Country, FormRecord};

pub const HEADING: &str = "Contact & Business Address";
pub const SUMMARY: &str =
    "Provide your contact information and business location for verification.";

pub const US_STATES: &[&str] = &[
    "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
    "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa", "Kansas",
    "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota",
    "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire", "New Jersey",
    "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio", "Oklahoma", "Oregon",
    "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota", "Tennessee", "Texas", "Utah",
    "Vermont", "Virginia", "Washington", "West Virginia", "Wisconsin", "Wyoming",
];

/// How the state/province field is entered for the selected country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateInput {
    /// Pick one of the listed US states.
    Select(&'static [&'static str]),
    FreeText,
}

pub fn country_options() -> &'static [Country] {
    Country::all()
}

pub fn state_input(record: &FormRecord) -> StateInput {
    match record.address.country {
        Some(Country::UnitedStates) => StateInput::Select(US_STATES),
        _ => StateInput::FreeText,
    }
}

pub fn is_us_state(name: &str) -> bool {
    US_STATES.iter().any(|s| s.eq_ignore_ascii_case(name.trim()))
}

/// Whether the stored state fits the selected country. A free-text state is
/// always acceptable; a US address needs a listed state or none yet.
pub fn state_matches_country(record: &FormRecord) -> bool {
    match state_input(record) {
        StateInput::Select(_) => record.address.state.is_empty() || is_us_state(&record.address.state),
        StateInput::FreeText => true,
    }
}
