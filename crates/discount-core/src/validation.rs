//! # Validation Module
//!
//! Parsing and validation of what the admin submits on the settings page.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser                                                       │
//! │  └── <input type="number" min="0" max="100" step="1">                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Reject text that is not a number                                   │
//! │  └── Clamp numbers into [0, 100]                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Resolver                                                      │
//! │  └── Trusts stored values, never re-validates                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::ValidationError;
use crate::types::DiscountPercent;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Parses a percentage typed into a number field and clamps it to `[0, 100]`.
///
/// ## Rules
/// - Empty input means the field default, 0
/// - Non-numeric input (including `NaN`/`inf`) is rejected
/// - Out-of-range numbers are clamped, not rejected
///
/// ## Example
/// ```rust
/// use discount_core::types::DiscountPercent;
/// use discount_core::validation::parse_percentage_input;
///
/// let field = "custom_discount_percentage";
/// assert_eq!(parse_percentage_input(field, "15").unwrap(), DiscountPercent::from_bps(1500));
/// assert_eq!(parse_percentage_input(field, "").unwrap(), DiscountPercent::zero());
/// assert_eq!(parse_percentage_input(field, "250").unwrap(), DiscountPercent::FULL);
/// assert!(parse_percentage_input(field, "ten").is_err());
/// ```
pub fn parse_percentage_input(field: &str, raw: &str) -> ValidationResult<DiscountPercent> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DiscountPercent::zero());
    }

    let pct: f64 = raw
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a number from 0 to 100".to_string(),
        })?;

    if !(0.0..=100.0).contains(&pct) {
        debug!(field, value = pct, "Clamping discount percentage into [0, 100]");
    }

    Ok(DiscountPercent::clamped(pct))
}

/// Parses the values of a multi-select into numeric ids.
///
/// Blank entries are dropped; anything else must be an unsigned integer.
///
/// ## Example
/// ```rust
/// use discount_core::validation::parse_id_list;
///
/// let raw = vec!["12".to_string(), " 7 ".to_string(), String::new()];
/// assert_eq!(parse_id_list("custom_discount_products", &raw).unwrap(), vec![12, 7]);
/// assert!(parse_id_list("custom_discount_products", &["abc".to_string()]).is_err());
/// ```
pub fn parse_id_list(field: &str, raw: &[String]) -> ValidationResult<Vec<u64>> {
    raw.iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry.parse::<u64>().map_err(|_| ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: format!("'{}' is not a valid id", entry),
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: &str = "custom_discount_percentage";

    fn parsed(raw: &str) -> DiscountPercent {
        parse_percentage_input(FIELD, raw).unwrap()
    }

    #[test]
    fn test_parse_percentage_input() {
        assert_eq!(parsed("0"), DiscountPercent::zero());
        assert_eq!(parsed("10"), DiscountPercent::from_bps(1000));
        assert_eq!(parsed(" 33.33 "), DiscountPercent::from_bps(3333));
        assert_eq!(parsed("12.345"), DiscountPercent::from_ppm(123_450));
        assert_eq!(parsed("100"), DiscountPercent::FULL);
    }

    #[test]
    fn test_parse_percentage_input_clamps() {
        assert_eq!(parsed("150"), DiscountPercent::FULL);
        assert_eq!(parsed("-5"), DiscountPercent::zero());
    }

    #[test]
    fn test_parse_percentage_input_rejects() {
        for bad in ["ten", "10%", "NaN", "inf", "1,5"] {
            let err = parse_percentage_input(FIELD, bad).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == FIELD),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("ids", &[]).unwrap(), Vec::<u64>::new());
        assert_eq!(
            parse_id_list("ids", &["1".to_string(), "  ".to_string(), "22".to_string()]).unwrap(),
            vec![1, 22]
        );
        assert!(parse_id_list("ids", &["-1".to_string()]).is_err());
        assert!(parse_id_list("ids", &["3.5".to_string()]).is_err());
    }
}
