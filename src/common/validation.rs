// src/common/validation.rs

// Validadores customizados usados nos payloads (`#[validate(custom(...))]`).

use rust_decimal::Decimal;
use validator::ValidationError;

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("required".into());
        return Err(err);
    }
    Ok(())
}

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("negative");
        err.message = Some("must_not_be_negative".into());
        return Err(err);
    }
    Ok(())
}

/// Percentual de comissão: de 0 a 100.
pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    non_negative(value)?;
    if *value > Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("must_be_a_percentage".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("Maria").is_ok());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(non_negative(&dec("-0.01")).is_err());
        assert!(non_negative(&dec("0")).is_ok());
        assert!(non_negative(&dec("1500.50")).is_ok());
    }

    #[test]
    fn percentages_stay_between_zero_and_one_hundred() {
        assert!(percentage(&dec("0")).is_ok());
        assert!(percentage(&dec("37.5")).is_ok());
        assert!(percentage(&dec("100")).is_ok());
        assert!(percentage(&dec("100.01")).is_err());
        assert!(percentage(&dec("1000")).is_err());
        assert!(percentage(&dec("-1")).is_err());
    }
}
