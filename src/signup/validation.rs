//! Step completion predicates.
//!
//! A step may only be left forward once every required field it owns is
//! non-empty. Values are not format-checked: any non-empty email or phone
//! string passes.

use super::model::{FormRecord, fields};
use super::state::Step;

/// Whether the wizard may advance past `step` with the given record.
pub fn can_advance(step: Step, record: &FormRecord) -> bool {
    missing_fields(step, record).is_empty()
}

/// Serialized names of the required fields of `step` that are still empty.
pub fn missing_fields(step: Step, record: &FormRecord) -> Vec<&'static str> {
    let required: Vec<(&'static str, bool)> = match step {
        Step::BusinessInfo => vec![
            (fields::BUSINESS_NAME, !record.business.name.is_empty()),
            (
                fields::BUSINESS_TYPE,
                record.business.business_type.is_some(),
            ),
            (
                fields::MERCHANT_CATEGORY_CODE,
                !record.business.category_code.is_empty(),
            ),
        ],
        Step::ContactAddress => vec![
            (fields::CONTACT_NAME, !record.contact.name.is_empty()),
            (fields::CONTACT_EMAIL, !record.contact.email.is_empty()),
            (fields::COUNTRY, record.address.country.is_some()),
            (fields::ADDRESS, !record.address.street.is_empty()),
        ],
        Step::PaymentBanking => vec![
            (
                fields::MONTHLY_VOLUME,
                record.payment.monthly_volume.is_some(),
            ),
            (fields::PAYMENT_METHODS, !record.payment.methods.is_empty()),
            (fields::BANK_NAME, !record.banking.bank_name.is_empty()),
        ],
        Step::Verification => vec![
            (
                fields::BUSINESS_LICENSE,
                !record.verification.business_license.is_empty(),
            ),
            (fields::TAX_ID, !record.verification.tax_id.is_empty()),
        ],
    };

    required
        .into_iter()
        .filter_map(|(name, present)| (!present).then_some(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signup::model::{BusinessType, Country, FormPatch, MonthlyVolume};

    fn complete_record() -> FormRecord {
        let mut record = FormRecord::default();
        record.apply(
            FormPatch::new()
                .business_name("Acme")
                .business_type(BusinessType::Llc)
                .merchant_category_code("5999")
                .contact_name("Jo")
                .contact_email("not-an-email")
                .country(Country::UnitedStates)
                .address("1 Main St")
                .monthly_volume(MonthlyVolume::UnderOneThousand)
                .payment_methods(["visa"])
                .bank_name("First Bank")
                .business_license("license.pdf")
                .tax_id("12-3456789"),
        );
        record
    }

    #[test]
    fn empty_record_blocks_every_step() {
        let record = FormRecord::default();
        for step in Step::ALL {
            assert!(!can_advance(step, &record), "{step} should be blocked");
        }
    }

    #[test]
    fn complete_record_passes_every_step() {
        let record = complete_record();
        for step in Step::ALL {
            assert!(can_advance(step, &record), "{step} should pass");
        }
    }

    #[test]
    fn clearing_any_required_field_blocks_its_step() {
        let clears: Vec<(Step, FormPatch)> = vec![
            (Step::BusinessInfo, FormPatch::new().business_name("")),
            (
                Step::BusinessInfo,
                FormPatch {
                    business_type: Some(None),
                    ..Default::default()
                },
            ),
            (Step::BusinessInfo, FormPatch::new().merchant_category_code("")),
            (Step::ContactAddress, FormPatch::new().contact_name("")),
            (Step::ContactAddress, FormPatch::new().contact_email("")),
            (
                Step::ContactAddress,
                FormPatch {
                    country: Some(None),
                    ..Default::default()
                },
            ),
            (Step::ContactAddress, FormPatch::new().address("")),
            (
                Step::PaymentBanking,
                FormPatch {
                    monthly_volume: Some(None),
                    ..Default::default()
                },
            ),
            (
                Step::PaymentBanking,
                FormPatch::new().payment_methods(Vec::<String>::new()),
            ),
            (Step::PaymentBanking, FormPatch::new().bank_name("")),
            (Step::Verification, FormPatch::new().business_license("")),
            (Step::Verification, FormPatch::new().tax_id("")),
        ];

        for (step, patch) in clears {
            let field = patch.changed_fields()[0];
            let mut record = complete_record();
            record.apply(patch);
            assert!(!can_advance(step, &record), "{field} empty should block {step}");
            assert_eq!(missing_fields(step, &record), vec![field]);
            for other in Step::ALL.into_iter().filter(|s| *s != step) {
                assert!(can_advance(other, &record), "{field} should not affect {other}");
            }
        }
    }

    #[test]
    fn optional_fields_do_not_gate() {
        let record = complete_record();
        assert!(record.contact.phone.is_empty());
        assert!(record.payment.website.is_empty());
        assert!(record.verification.ownership_documents.is_empty());
        assert!(can_advance(Step::ContactAddress, &record));
        assert!(can_advance(Step::PaymentBanking, &record));
        assert!(can_advance(Step::Verification, &record));
    }

    #[test]
    fn business_info_scenario() {
        let mut record = FormRecord::default();
        assert!(!can_advance(Step::BusinessInfo, &record));
        record.apply(
            FormPatch::new()
                .business_name("Acme")
                .business_type(BusinessType::Llc)
                .merchant_category_code("5999"),
        );
        assert!(can_advance(Step::BusinessInfo, &record));
    }

    #[test]
    fn verification_scenario() {
        let mut record = FormRecord::default();
        record.apply(FormPatch::new().business_license("").tax_id("123"));
        assert!(!can_advance(Step::Verification, &record));
        assert_eq!(
            missing_fields(Step::Verification, &record),
            vec![fields::BUSINESS_LICENSE]
        );

        record.apply(FormPatch::new().business_license("doc.pdf"));
        assert!(can_advance(Step::Verification, &record));
    }
}
