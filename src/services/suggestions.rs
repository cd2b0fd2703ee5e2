//! Business description suggestions.

use rand::seq::SliceRandom;

use crate::signup::model::BusinessType;

/// Produces a draft business description from the name and type.
pub trait DescriptionSuggester: Send + Sync {
    fn suggest(&self, name: &str, business_type: BusinessType) -> String;
}

/// All canned description templates for a business, in a fixed order.
pub fn description_templates(name: &str, business_type: BusinessType) -> [String; 3] {
    let kind = business_type.to_string().to_lowercase();
    [
        format!(
            "{name} is a {kind} that specializes in providing high-quality products and services to our customers."
        ),
        format!(
            "As a {kind}, {name} focuses on delivering exceptional customer experiences through innovative solutions."
        ),
        format!(
            "{name} operates as a {kind}, committed to excellence and customer satisfaction in our industry."
        ),
    ]
}

/// Picks one of the canned templates at random.
#[derive(Debug, Clone, Default)]
pub struct TemplateSuggester;

impl TemplateSuggester {
    pub fn new() -> Self {
        Self
    }
}

impl DescriptionSuggester for TemplateSuggester {
    fn suggest(&self, name: &str, business_type: BusinessType) -> String {
        let templates = description_templates(name, business_type);
        let mut rng = rand::thread_rng();
        templates
            .choose(&mut rng)
            .cloned()
            .unwrap_or_else(|| templates[0].clone())
    }
}

/// Always returns the template at a fixed position. Deterministic.
#[derive(Debug, Clone, Default)]
pub struct FixedSuggester {
    index: usize,
}

impl FixedSuggester {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl DescriptionSuggester for FixedSuggester {
    fn suggest(&self, name: &str, business_type: BusinessType) -> String {
        let templates = description_templates(name, business_type);
        let index = self.index % templates.len();
        templates[index].clone()
    }
}
