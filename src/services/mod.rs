//! Units of work that span several store calls. Each mutating operation opens
//! its own transaction, so callers never see a half-applied change.

pub mod accounts;
pub mod entries;
pub mod payments;
pub mod receivables;
pub mod reconciliation;
pub mod stats;

use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

/// Largest magnitude accepted for any single amount or balance: 10^15.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

pub(crate) fn require_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Signed amounts such as balances may be zero or negative but stay bounded.
pub(crate) fn require_amount(amount: Decimal, field: &str) -> AppResult<Decimal> {
    if amount.abs() > MAX_AMOUNT {
        return Err(AppError::Validation(format!("{field} is out of range")));
    }
    Ok(amount)
}

pub(crate) fn require_positive(amount: Decimal, field: &str) -> AppResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(format!("{field} must be greater than 0")));
    }
    require_amount(amount, field)
}

/// Blank optional text is stored as NULL.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_text_is_rejected() {
        let error = require_text("   ", "Name").unwrap_err();
        assert_eq!(error.to_string(), "Name is required");
        assert_eq!(require_text(" Cash ", "Name").unwrap(), "Cash");
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(require_positive(dec!(0), "Amount").is_err());
        assert!(require_positive(dec!(-1), "Amount").is_err());
        assert_eq!(require_positive(dec!(0.01), "Amount").unwrap(), dec!(0.01));
    }

    #[test]
    fn amounts_are_bounded() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000000));
        assert_eq!(require_positive(MAX_AMOUNT, "Amount").unwrap(), MAX_AMOUNT);
        let error = require_positive(Decimal::MAX, "Amount").unwrap_err();
        assert_eq!(error.to_string(), "Amount is out of range");
        assert!(require_amount(-MAX_AMOUNT, "Actual balance").is_ok());
        assert!(require_amount(-MAX_AMOUNT - dec!(0.01), "Actual balance").is_err());
    }

    #[test]
    fn blank_notes_become_none() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" rent ".into())), Some("rent".into()));
    }
}
