//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    19.99 * (1 - 15/100) = 16.991499999999998  ❌ rounds to 16.99        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    1999 * 850_000 = 1_699_150_000  → /1_000_000 half-up → 1699          │
//! │    Every rounding step is explicit and exact                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precision
//! The host platform decides how many decimals a price has
//! ([`CurrencyPrecision`]). A `Money` value is always expressed in the minor
//! unit of that precision: with 2 decimals, `1999` means `19.99`.
//!
//! ## Usage
//! ```rust
//! use discount_core::money::{CurrencyPrecision, Money};
//!
//! let precision = CurrencyPrecision::default(); // 2 decimals
//! let price = Money::parse_decimal("19.99", precision).unwrap();
//! assert_eq!(price.minor_units(), 1999);
//! assert_eq!(price.to_decimal_string(precision), "19.99");
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Sub;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::DiscountPercent;

/// Parts per million in 100%.
const FULL_PPM: i128 = DiscountPercent::FULL.ppm() as i128;

// =============================================================================
// Currency Precision
// =============================================================================

/// Number of decimal places the host uses for prices.
///
/// Mirrors the storefront's "number of decimals" setting. Typical values are
/// 2 (USD, EUR) and 0 (JPY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencyPrecision(u8);

impl CurrencyPrecision {
    /// Largest supported number of decimals.
    pub const MAX_DECIMALS: u8 = 6;

    /// Creates a precision, rejecting values above [`Self::MAX_DECIMALS`].
    pub fn new(decimals: u8) -> Result<Self, ValidationError> {
        if decimals > Self::MAX_DECIMALS {
            return Err(ValidationError::OutOfRange {
                field: "price_decimals".to_string(),
                min: 0,
                max: Self::MAX_DECIMALS as i64,
            });
        }
        Ok(CurrencyPrecision(decimals))
    }

    /// Returns the number of decimals.
    #[inline]
    pub const fn decimals(&self) -> u8 {
        self.0
    }

    /// Minor units per major unit (`10^decimals`).
    #[inline]
    pub const fn scale(&self) -> i64 {
        10_i64.pow(self.0 as u32)
    }
}

impl Default for CurrencyPrecision {
    fn default() -> Self {
        CurrencyPrecision(2)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the minor unit of a [`CurrencyPrecision`].
///
/// ## Design Decisions
/// - **i64 (signed)**: the host may hand us anything, including negatives;
///   the resolver decides what to do with them
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // 10.99 at two decimals
    /// assert_eq!(price.minor_units(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Parses a decimal price string as the host stores it (`"19.99"`).
    ///
    /// ## Rules
    /// - Surrounding whitespace is ignored, a leading `+` or `-` is allowed
    /// - At most one `.` separator, digits only otherwise
    /// - Extra fractional digits round half away from zero
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::money::{CurrencyPrecision, Money};
    ///
    /// let two = CurrencyPrecision::default();
    /// assert_eq!(Money::parse_decimal("12.345", two).unwrap().minor_units(), 1235);
    /// assert_eq!(Money::parse_decimal("7", two).unwrap().minor_units(), 700);
    /// assert!(Money::parse_decimal("abc", two).is_err());
    /// ```
    pub fn parse_decimal(
        text: &str,
        precision: CurrencyPrecision,
    ) -> Result<Money, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (negative, unsigned) = match text.as_bytes()[0] {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(invalid_price("must be a decimal number"));
        }

        let decimals = precision.decimals() as usize;
        let mut minor: i128 = 0;
        let padded_frac = frac.bytes().chain(std::iter::repeat(b'0')).take(decimals);
        for digit in whole.bytes().chain(padded_frac) {
            minor = minor * 10 + (digit - b'0') as i128;
            if minor > i64::MAX as i128 {
                return Err(invalid_price("value is too large"));
            }
        }

        // First dropped digit decides the rounding direction.
        if let Some(next) = frac.as_bytes().get(decimals) {
            if *next >= b'5' {
                minor += 1;
            }
        }

        if negative {
            minor = -minor;
        }

        i64::try_from(minor)
            .map(Money)
            .map_err(|_| invalid_price("value is too large"))
    }

    /// Formats the value as a plain decimal string at the given precision.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::money::{CurrencyPrecision, Money};
    ///
    /// let two = CurrencyPrecision::default();
    /// assert_eq!(Money::from_minor(7500).to_decimal_string(two), "75.00");
    /// assert_eq!(Money::from_minor(-5).to_decimal_string(two), "-0.05");
    /// ```
    pub fn to_decimal_string(&self, precision: CurrencyPrecision) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let decimals = precision.decimals() as usize;

        if decimals == 0 {
            return format!("{}{}", sign, magnitude);
        }

        let scale = precision.scale() as u64;
        format!(
            "{}{}.{:0width$}",
            sign,
            magnitude / scale,
            magnitude % scale,
            width = decimals
        )
    }

    /// Applies a percentage discount and returns the discounted price.
    ///
    /// Computes `self * (1 - percent / 100)` and rounds half away from zero
    /// to the nearest minor unit. This is the only rounding step. Percentages
    /// above 100% produce a negative result and negative ones a markup.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::money::Money;
    /// use discount_core::types::DiscountPercent;
    ///
    /// let regular = Money::from_minor(10000); // 100.00
    /// let discounted = regular.apply_percentage_discount(DiscountPercent::from_bps(2500));
    /// assert_eq!(discounted.minor_units(), 7500); // 75.00
    /// ```
    pub fn apply_percentage_discount(&self, percent: DiscountPercent) -> Money {
        let remaining_ppm = FULL_PPM - percent.ppm() as i128;
        let scaled = self.0 as i128 * remaining_ppm;
        let rounded = div_round_half_away(scaled, FULL_PPM);
        Money(rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

/// Subtraction of two Money values (used for savings in quotes).
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

fn invalid_price(reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
