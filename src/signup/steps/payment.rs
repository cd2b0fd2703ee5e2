//! Step 3: processing volume, accepted payment methods and bank account.

use crate::signup::model::{Choice, FormPatch, FormRecord, MonthlyVolume};

pub const HEADING: &str = "Payment & Banking Setup";
pub const SUMMARY: &str = "Configure your payment processing and banking information.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentMethodOption {
    pub id: &'static str,
    pub label: &'static str,
    pub popular: bool,
}

pub const PAYMENT_METHOD_OPTIONS: &[PaymentMethodOption] = &[
    PaymentMethodOption { id: "visa", label: "Visa", popular: true },
    PaymentMethodOption { id: "mastercard", label: "MasterCard", popular: true },
    PaymentMethodOption { id: "amex", label: "American Express", popular: true },
    PaymentMethodOption { id: "discover", label: "Discover", popular: false },
    PaymentMethodOption { id: "paypal", label: "PayPal", popular: true },
    PaymentMethodOption { id: "apple-pay", label: "Apple Pay", popular: true },
    PaymentMethodOption { id: "google-pay", label: "Google Pay", popular: true },
    PaymentMethodOption { id: "bank-transfer", label: "Bank Transfer/ACH", popular: false },
    PaymentMethodOption { id: "crypto", label: "Cryptocurrency", popular: false },
];

pub fn volume_options() -> &'static [MonthlyVolume] {
    MonthlyVolume::all()
}

pub fn payment_method(id: &str) -> Option<&'static PaymentMethodOption> {
    PAYMENT_METHOD_OPTIONS.iter().find(|m| m.id == id)
}

/// Patch that adds or removes one method. Adding a present id or removing an
/// absent one leaves the set unchanged.
pub fn toggle_payment_method(record: &FormRecord, id: &str, enabled: bool) -> FormPatch {
    let mut methods = record.payment.methods.clone();
    if enabled {
        methods.insert(id.to_string());
    } else {
        methods.remove(id);
    }
    FormPatch::new().payment_methods(methods)
}

/// Patch that replaces the selection with every popular method.
pub fn popular_payment_methods() -> FormPatch {
    FormPatch::new().payment_methods(
        PAYMENT_METHOD_OPTIONS
            .iter()
            .filter(|m| m.popular)
            .map(|m| m.id),
    )
}
