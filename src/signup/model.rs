//! Form record and partial-update data models.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::state::Step;

/// Serialized field names, shared by patches, validation and logging.
pub mod fields {
    pub const BUSINESS_NAME: &str = "businessName";
    pub const BUSINESS_TYPE: &str = "businessType";
    pub const BUSINESS_DESCRIPTION: &str = "businessDescription";
    pub const MERCHANT_CATEGORY_CODE: &str = "merchantCategoryCode";
    pub const CONTACT_NAME: &str = "contactName";
    pub const CONTACT_EMAIL: &str = "contactEmail";
    pub const CONTACT_PHONE: &str = "contactPhone";
    pub const COUNTRY: &str = "country";
    pub const ADDRESS: &str = "address";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const POSTAL_CODE: &str = "postalCode";
    pub const WEBSITE: &str = "website";
    pub const MONTHLY_VOLUME: &str = "monthlyVolume";
    pub const AVERAGE_TRANSACTION: &str = "averageTransaction";
    pub const PAYMENT_METHODS: &str = "paymentMethods";
    pub const BANK_NAME: &str = "bankName";
    pub const ACCOUNT_NUMBER: &str = "accountNumber";
    pub const ROUTING_NUMBER: &str = "routingNumber";
    pub const BUSINESS_LICENSE: &str = "businessLicense";
    pub const TAX_ID: &str = "taxId";
    pub const OWNERSHIP_DOCUMENTS: &str = "ownershipDocuments";
}

/// Error returned when a label does not name any option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not a valid {kind}")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
}

/// A closed set of labelled options (select-box fields).
pub trait Choice: Copy + Sized + 'static {
    /// Human-readable name of the field kind, used in errors.
    const KIND: &'static str;

    fn all() -> &'static [Self];

    fn label(&self) -> &'static str;
}

/// Parse a label into a choice. Matching ignores ASCII case and surrounding
/// whitespace.
pub fn parse_choice<T: Choice>(raw: &str) -> Result<T, ParseChoiceError> {
    let wanted = raw.trim();
    T::all()
        .iter()
        .copied()
        .find(|c| c.label().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ParseChoiceError {
            kind: T::KIND,
            value: raw.to_string(),
        })
}

/// Legal structure of the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    #[serde(rename = "Sole Proprietorship")]
    SoleProprietorship,
    Partnership,
    #[serde(rename = "LLC")]
    Llc,
    Corporation,
    #[serde(rename = "Non-Profit")]
    NonProfit,
    Government,
}

impl Choice for BusinessType {
    const KIND: &'static str = "business type";

    fn all() -> &'static [Self] {
        &[
            Self::SoleProprietorship,
            Self::Partnership,
            Self::Llc,
            Self::Corporation,
            Self::NonProfit,
            Self::Government,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::SoleProprietorship => "Sole Proprietorship",
            Self::Partnership => "Partnership",
            Self::Llc => "LLC",
            Self::Corporation => "Corporation",
            Self::NonProfit => "Non-Profit",
            Self::Government => "Government",
        }
    }
}

/// Country of the business address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "United States")]
    UnitedStates,
    Canada,
    #[serde(rename = "United Kingdom")]
    UnitedKingdom,
    Australia,
    Germany,
    France,
    Japan,
    Brazil,
    India,
    Other,
}

impl Choice for Country {
    const KIND: &'static str = "country";

    fn all() -> &'static [Self] {
        &[
            Self::UnitedStates,
            Self::Canada,
            Self::UnitedKingdom,
            Self::Australia,
            Self::Germany,
            Self::France,
            Self::Japan,
            Self::Brazil,
            Self::India,
            Self::Other,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::UnitedStates => "United States",
            Self::Canada => "Canada",
            Self::UnitedKingdom => "United Kingdom",
            Self::Australia => "Australia",
            Self::Germany => "Germany",
            Self::France => "France",
            Self::Japan => "Japan",
            Self::Brazil => "Brazil",
            Self::India => "India",
            Self::Other => "Other",
        }
    }
}

/// Expected monthly processing volume bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthlyVolume {
    #[serde(rename = "Under $1,000")]
    UnderOneThousand,
    #[serde(rename = "$1,000 - $5,000")]
    UpToFiveThousand,
    #[serde(rename = "$5,000 - $25,000")]
    UpToTwentyFiveThousand,
    #[serde(rename = "$25,000 - $100,000")]
    UpToOneHundredThousand,
    #[serde(rename = "$100,000 - $500,000")]
    UpToFiveHundredThousand,
    #[serde(rename = "$500,000+")]
    OverFiveHundredThousand,
}

impl Choice for MonthlyVolume {
    const KIND: &'static str = "monthly volume";

    fn all() -> &'static [Self] {
        &[
            Self::UnderOneThousand,
            Self::UpToFiveThousand,
            Self::UpToTwentyFiveThousand,
            Self::UpToOneHundredThousand,
            Self::UpToFiveHundredThousand,
            Self::OverFiveHundredThousand,
        ]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::UnderOneThousand => "Under $1,000",
            Self::UpToFiveThousand => "$1,000 - $5,000",
            Self::UpToTwentyFiveThousand => "$5,000 - $25,000",
            Self::UpToOneHundredThousand => "$25,000 - $100,000",
            Self::UpToFiveHundredThousand => "$100,000 - $500,000",
            Self::OverFiveHundredThousand => "$500,000+",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for MonthlyVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BusinessType {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for Country {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for MonthlyVolume {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

/// Accepts a label, an empty string, or null. Empty and null mean "not selected".
fn optional_choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Choice,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => parse_choice(label).map(Some).map_err(serde::de::Error::custom),
    }
}

/// Patch variant of [`optional_choice`]: a present key always yields `Some`,
/// so an empty value clears the field instead of being ignored.
fn patch_choice<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Choice,
{
    optional_choice(deserializer).map(Some)
}

// ── Form record ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessInfo {
    pub name: String,
    #[serde(deserialize_with = "optional_choice")]
    pub business_type: Option<BusinessType>,
    pub description: String,
    /// Merchant category code, free text such as `"5999 - Miscellaneous Retail Stores"`.
    pub category_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    /// Optional; empty when not given.
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    #[serde(deserialize_with = "optional_choice")]
    pub country: Option<Country>,
    pub street: String,
    pub city: String,
    /// State or province. A US state name when the country is the United States.
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentProfile {
    #[serde(deserialize_with = "optional_choice")]
    pub monthly_volume: Option<MonthlyVolume>,
    pub average_transaction: String,
    pub website: String,
    /// Accepted payment method identifiers, e.g. `"visa"`, `"apple-pay"`.
    pub methods: BTreeSet<String>,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BankingInfo {
    pub bank_name: String,
    pub account_number: String,
    pub routing_number: String,
}

impl BankingInfo {
    /// Account number with everything but the last four characters hidden.
    pub fn masked_account_number(&self) -> String {
        let chars: Vec<char> = self.account_number.chars().collect();
        if chars.is_empty() {
            return String::new();
        }
        let visible = chars.len().saturating_sub(4);
        let tail: String = chars[visible..].iter().collect();
        format!("{}{}", "*".repeat(visible), tail)
    }
}

impl fmt::Debug for BankingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankingInfo")
            .field("bank_name", &self.bank_name)
            .field("account_number", &self.masked_account_number())
            .field("routing_number", &self.routing_number)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Verification {
    /// Uploaded license file name; empty until uploaded.
    pub business_license: String,
    pub tax_id: String,
    pub ownership_documents: Vec<String>,
}

/// Everything collected across the four signup steps.
///
/// Every section is `#[serde(default)]`, so a stored record that predates a
/// field loads with that field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormRecord {
    pub business: BusinessInfo,
    pub contact: ContactInfo,
    pub address: Address,
    pub payment: PaymentProfile,
    pub banking: BankingInfo,
    pub verification: Verification,
}

impl FormRecord {
    /// Whether the record holds nothing but defaults.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow-merge a patch. Fields the patch leaves as `None` keep their value.
    pub fn apply(&mut self, patch: FormPatch) {
        let FormPatch {
            business_name,
            business_type,
            business_description,
            merchant_category_code,
            contact_name,
            contact_email,
            contact_phone,
            country,
            address,
            city,
            state,
            postal_code,
            website,
            monthly_volume,
            average_transaction,
            payment_methods,
            bank_name,
            account_number,
            routing_number,
            business_license,
            tax_id,
            ownership_documents,
        } = patch;

        if let Some(v) = business_name {
            self.business.name = v;
        }
        if let Some(v) = business_type {
            self.business.business_type = v;
        }
        if let Some(v) = business_description {
            self.business.description = v;
        }
        if let Some(v) = merchant_category_code {
            self.business.category_code = v;
        }
        if let Some(v) = contact_name {
            self.contact.name = v;
        }
        if let Some(v) = contact_email {
            self.contact.email = v;
        }
        if let Some(v) = contact_phone {
            self.contact.phone = v;
        }
        if let Some(v) = country {
            self.address.country = v;
        }
        if let Some(v) = address {
            self.address.street = v;
        }
        if let Some(v) = city {
            self.address.city = v;
        }
        if let Some(v) = state {
            self.address.state = v;
        }
        if let Some(v) = postal_code {
            self.address.postal_code = v;
        }
        if let Some(v) = website {
            self.payment.website = v;
        }
        if let Some(v) = monthly_volume {
            self.payment.monthly_volume = v;
        }
        if let Some(v) = average_transaction {
            self.payment.average_transaction = v;
        }
        if let Some(v) = payment_methods {
            self.payment.methods = v;
        }
        if let Some(v) = bank_name {
            self.banking.bank_name = v;
        }
        if let Some(v) = account_number {
            self.banking.account_number = v;
        }
        if let Some(v) = routing_number {
            self.banking.routing_number = v;
        }
        if let Some(v) = business_license {
            self.verification.business_license = v;
        }
        if let Some(v) = tax_id {
            self.verification.tax_id = v;
        }
        if let Some(v) = ownership_documents {
            self.verification.ownership_documents = v;
        }
    }
}

// ── Partial updates ─────────────────────────────────────────────────

/// A partial form update in the flat field layout of the signup form.
///
/// Deserializes from a camelCase JSON object such as
/// `{"businessName": "Acme", "businessType": "LLC"}`. Choice fields take
/// `Some(None)` (an empty string in JSON) to clear the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FormPatch {
    pub business_name: Option<String>,
    #[serde(deserialize_with = "patch_choice")]
    pub business_type: Option<Option<BusinessType>>,
    pub business_description: Option<String>,
    pub merchant_category_code: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[serde(deserialize_with = "patch_choice")]
    pub country: Option<Option<Country>>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    #[serde(deserialize_with = "patch_choice")]
    pub monthly_volume: Option<Option<MonthlyVolume>>,
    pub average_transaction: Option<String>,
    pub payment_methods: Option<BTreeSet<String>>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub routing_number: Option<String>,
    pub business_license: Option<String>,
    pub tax_id: Option<String>,
    pub ownership_documents: Option<Vec<String>>,
}

impl FormPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a single-field patch from a serialized field name and value.
    pub fn field(name: &str, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let mut object = serde_json::Map::new();
        object.insert(name.to_string(), value);
        serde_json::from_value(serde_json::Value::Object(object))
    }

    pub fn business_name(mut self, v: impl Into<String>) -> Self {
        self.business_name = Some(v.into());
        self
    }

    pub fn business_type(mut self, v: BusinessType) -> Self {
        self.business_type = Some(Some(v));
        self
    }

    pub fn business_description(mut self, v: impl Into<String>) -> Self {
        self.business_description = Some(v.into());
        self
    }

    pub fn merchant_category_code(mut self, v: impl Into<String>) -> Self {
        self.merchant_category_code = Some(v.into());
        self
    }

    pub fn contact_name(mut self, v: impl Into<String>) -> Self {
        self.contact_name = Some(v.into());
        self
    }

    pub fn contact_email(mut self, v: impl Into<String>) -> Self {
        self.contact_email = Some(v.into());
        self
    }

    pub fn contact_phone(mut self, v: impl Into<String>) -> Self {
        self.contact_phone = Some(v.into());
        self
    }

    pub fn country(mut self, v: Country) -> Self {
        self.country = Some(Some(v));
        self
    }

    pub fn address(mut self, v: impl Into<String>) -> Self {
        self.address = Some(v.into());
        self
    }

    pub fn city(mut self, v: impl Into<String>) -> Self {
        self.city = Some(v.into());
        self
    }

    pub fn state(mut self, v: impl Into<String>) -> Self {
        self.state = Some(v.into());
        self
    }

    pub fn postal_code(mut self, v: impl Into<String>) -> Self {
        self.postal_code = Some(v.into());
        self
    }

    pub fn website(mut self, v: impl Into<String>) -> Self {
        self.website = Some(v.into());
        self
    }

    pub fn monthly_volume(mut self, v: MonthlyVolume) -> Self {
        self.monthly_volume = Some(Some(v));
        self
    }

    pub fn average_transaction(mut self, v: impl Into<String>) -> Self {
        self.average_transaction = Some(v.into());
        self
    }

    pub fn payment_methods<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_methods = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn bank_name(mut self, v: impl Into<String>) -> Self {
        self.bank_name = Some(v.into());
        self
    }

    pub fn account_number(mut self, v: impl Into<String>) -> Self {
        self.account_number = Some(v.into());
        self
    }

    pub fn routing_number(mut self, v: impl Into<String>) -> Self {
        self.routing_number = Some(v.into());
        self
    }

    pub fn business_license(mut self, v: impl Into<String>) -> Self {
        self.business_license = Some(v.into());
        self
    }

    pub fn tax_id(mut self, v: impl Into<String>) -> Self {
        self.tax_id = Some(v.into());
        self
    }

    pub fn ownership_documents<I, S>(mut self, docs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ownership_documents = Some(docs.into_iter().map(Into::into).collect());
        self
    }

    /// Serialized names of the fields this patch sets.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        use fields::*;

        let Self {
            business_name,
            business_type,
            business_description,
            merchant_category_code,
            contact_name,
            contact_email,
            contact_phone,
            country,
            address,
            city,
            state,
            postal_code,
            website,
            monthly_volume,
            average_transaction,
            payment_methods,
            bank_name,
            account_number,
            routing_number,
            business_license,
            tax_id,
            ownership_documents,
        } = self;

        [
            (business_name.is_some(), BUSINESS_NAME),
            (business_type.is_some(), BUSINESS_TYPE),
            (business_description.is_some(), BUSINESS_DESCRIPTION),
            (merchant_category_code.is_some(), MERCHANT_CATEGORY_CODE),
            (contact_name.is_some(), CONTACT_NAME),
            (contact_email.is_some(), CONTACT_EMAIL),
            (contact_phone.is_some(), CONTACT_PHONE),
            (country.is_some(), COUNTRY),
            (address.is_some(), ADDRESS),
            (city.is_some(), CITY),
            (state.is_some(), STATE),
            (postal_code.is_some(), POSTAL_CODE),
            (website.is_some(), WEBSITE),
            (monthly_volume.is_some(), MONTHLY_VOLUME),
            (average_transaction.is_some(), AVERAGE_TRANSACTION),
            (payment_methods.is_some(), PAYMENT_METHODS),
            (bank_name.is_some(), BANK_NAME),
            (account_number.is_some(), ACCOUNT_NUMBER),
            (routing_number.is_some(), ROUTING_NUMBER),
            (business_license.is_some(), BUSINESS_LICENSE),
            (tax_id.is_some(), TAX_ID),
            (ownership_documents.is_some(), OWNERSHIP_DOCUMENTS),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }

    /// Steps whose fields this patch sets.
    pub fn owner_steps(&self) -> BTreeSet<Step> {
        self.changed_fields()
            .into_iter()
            .filter_map(Step::owning)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}
