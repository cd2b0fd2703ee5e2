//! Step 1: business name, type, description and merchant category code.

use crate::error::WizardError;
use crate::services::DescriptionSuggester;
use crate::signup::model::{BusinessType, Choice, FormPatch, FormRecord};

pub const HEADING: &str = "Tell us about your business";
pub const SUMMARY: &str =
    "We need some basic information to set up your payment processing account.";

/// A merchant category code offered as a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySuggestion {
    pub code: &'static str,
    pub category: &'static str,
}

impl CategorySuggestion {
    /// Text written into the category code field, e.g. `"5999 - Miscellaneous Retail Stores"`.
    pub fn field_value(&self) -> String {
        format!("{} - {}", self.code, self.category)
    }
}

pub const CATEGORY_SUGGESTIONS: &[CategorySuggestion] = &[
    CategorySuggestion {
        code: "5411",
        category: "Grocery Stores, Supermarkets",
    },
    CategorySuggestion {
        code: "5812",
        category: "Eating Places, Restaurants",
    },
    CategorySuggestion {
        code: "5969",
        category: "Direct Marketing - Other",
    },
    CategorySuggestion {
        code: "5999",
        category: "Miscellaneous Retail Stores",
    },
    CategorySuggestion {
        code: "7372",
        category: "Computer Programming, Data Processing",
    },
    CategorySuggestion {
        code: "8299",
        category: "Educational Services",
    },
];

pub fn business_type_options() -> &'static [BusinessType] {
    BusinessType::all()
}

pub fn category_suggestion(code: &str) -> Option<&'static CategorySuggestion> {
    let code = code.trim();
    CATEGORY_SUGGESTIONS.iter().find(|s| s.code == code)
}

/// Patch that fills the category code from a suggestion.
pub fn select_category(code: &str) -> Result<FormPatch, WizardError> {
    let suggestion = category_suggestion(code).ok_or_else(|| WizardError::UnknownSuggestion {
        code: code.to_string(),
    })?;
    Ok(FormPatch::new().merchant_category_code(suggestion.field_value()))
}

/// A description can be suggested once both name and type are chosen.
pub fn can_suggest_description(record: &FormRecord) -> bool {
    !record.business.name.is_empty() && record.business.business_type.is_some()
}

/// Patch with a suggested description, or `None` when name or type is missing.
pub fn suggest_description(
    record: &FormRecord,
    suggester: &dyn DescriptionSuggester,
) -> Option<FormPatch> {
    let business_type = record.business.business_type?;
    if record.business.name.is_empty() {
        return None;
    }
    let text = suggester.suggest(&record.business.name, business_type);
    Some(FormPatch::new().business_description(text))
}
