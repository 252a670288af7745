//! Domain layer: option maps, business rules, and result types (no I/O).

mod insurance;
mod label;
mod options;
mod postal;
mod response;

pub use insurance::{EXCLUDED_JEWELRY_ZIPS, InsuranceError, validate_insurance};
pub use label::{IMAGE_DATA_PLACEHOLDER, Label, redact_image_data};
pub use options::{OptionValue, Options};
pub use postal::split_postal_code;
pub use response::{
    CarrierPickupResult, PassPhraseResult, RecreditResult, RefundResult, StatusResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trip_through_merge() {
        let defaults = Options::new()
            .with("AccountID", "123456")
            .with("RequesterID", "abcd")
            .with("PassPhrase", "secret");
        let merged = Options::new()
            .with("PassPhrase", "caller wins")
            .merged_over(&defaults);

        assert_eq!(merged.text("AccountID").as_deref(), Some("123456"));
        assert_eq!(merged.text("RequesterID").as_deref(), Some("abcd"));
        assert_eq!(merged.text("PassPhrase").as_deref(), Some("caller wins"));
    }

    #[test]
    fn jewelry_rule_only_fires_on_the_full_combination() {
        let options = Options::new()
            .with("InsuredMail", "Endicia")
            .with("Jewelry", true)
            .with("ToPostalCode", "94108");
        assert!(validate_insurance(&options).is_err());

        let options = Options::new()
            .with("InsuredMail", "Endicia")
            .with("Jewelry", false)
            .with("ToPostalCode", "94108");
        assert!(validate_insurance(&options).is_ok());
    }
}
