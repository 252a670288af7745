use std::fmt;

use crate::domain::options::Options;
use crate::domain::postal::split_postal_code;

/// Destination zips for which Endicia-provided jewelry insurance is
/// disallowed by carrier underwriting (Manhattan/Midtown and two San
/// Francisco zones).
pub const EXCLUDED_JEWELRY_ZIPS: [&str; 4] = ["10036", "10017", "94102", "94108"];

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised before any network call when a label request asks for
/// Endicia-provided insurance on jewelry shipped to an excluded zip.
pub struct InsuranceError {
    pub postal_code: String,
}

impl fmt::Display for InsuranceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "jewelry cannot be insured by Endicia when shipped to {}",
            self.postal_code
        )
    }
}

impl std::error::Error for InsuranceError {}

/// Enforce the jewelry/excluded-zip business rule on merged label options.
///
/// Fails only when all three hold: `InsuredMail` is `"Endicia"`, `Jewelry`
/// is truthy, and the destination zip (its 5-digit part) is excluded. The
/// `Jewelry` flag itself is never serialized into a request; it exists
/// purely as input to this check.
pub fn validate_insurance(options: &Options) -> Result<(), InsuranceError> {
    if options.text("InsuredMail").as_deref() != Some("Endicia") {
        return Ok(());
    }
    if !options.is_truthy("Jewelry") {
        return Ok(());
    }

    let postal_code = options.text("ToPostalCode").unwrap_or_default();
    let (zip, _) = split_postal_code(&postal_code);
    if EXCLUDED_JEWELRY_ZIPS.contains(&zip) {
        return Err(InsuranceError {
            postal_code: zip.to_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jewelry_to(zip: &str) -> Options {
        Options::new()
            .with("InsuredMail", "Endicia")
            .with("Jewelry", true)
            .with("ToPostalCode", zip)
    }

    #[test]
    fn rejects_endicia_insured_jewelry_to_every_excluded_zip() {
        for zip in EXCLUDED_JEWELRY_ZIPS {
            let err = validate_insurance(&jewelry_to(zip)).unwrap_err();
            assert_eq!(err.postal_code, zip);
            assert!(err.to_string().contains(zip));
        }
    }

    #[test]
    fn nine_digit_codes_are_checked_by_their_five_digit_part() {
        let err = validate_insurance(&jewelry_to("10036-1234")).unwrap_err();
        assert_eq!(err.postal_code, "10036");
    }

    #[test]
    fn passes_for_non_excluded_zips() {
        assert!(validate_insurance(&jewelry_to("90210")).is_ok());
    }

    #[test]
    fn passes_without_jewelry_or_endicia_insurance() {
        let options = Options::new()
            .with("InsuredMail", "Endicia")
            .with("ToPostalCode", "10036");
        assert!(validate_insurance(&options).is_ok());

        let options = Options::new()
            .with("InsuredMail", "UspsOnline")
            .with("Jewelry", true)
            .with("ToPostalCode", "10036");
        assert!(validate_insurance(&options).is_ok());

        let options = Options::new()
            .with("Jewelry", true)
            .with("ToPostalCode", "10036");
        assert!(validate_insurance(&options).is_ok());
    }
}
