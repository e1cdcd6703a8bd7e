//! # Domain Types
//!
//! Core domain types used by the discount resolver.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │ DiscountPercent │   │   PriceQuote    │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id             │   │  ppm (i64)      │   │  candidate      │        │
//! │  │  regular_price  │   │ 250_000 = 25%   │   │  regular        │        │
//! │  │  category_ids   │   └─────────────────┘   │  rule, percent  │        │
//! │  └─────────────────┘                         │  price          │        │
//! │                        ┌─────────────────┐   └─────────────────┘        │
//! │                        │  PriceContext   │                              │
//! │                        │  Storefront     │                              │
//! │                        │  AdminScreen    │                              │
//! │                        │  AdminAsync     │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products and categories are owned by the host catalog; this crate only
//! sees their identifiers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a product category (a taxonomy term in the host).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct CategoryId(pub u64);

/// Identifier of a product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ProductId(pub u64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Discount Percent
// =============================================================================

/// Discount percentage stored in parts per million of the price.
///
/// ## Why Parts Per Million?
/// 10_000 ppm = 1%, so 250_000 ppm = 25% and `12.345%` is exactly 123_450.
/// Percents with up to four decimals are kept exactly, so the only rounding
/// is the final one in [`Money::apply_percentage_discount`].
///
/// The value is signed and unchecked: a stored `-10` is a 10% markup and a
/// stored `120` makes the price negative. Values coming from the admin form
/// go through [`DiscountPercent::clamped`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountPercent(i64);

impl DiscountPercent {
    /// Parts per million in one percent.
    pub const PPM_PER_PERCENT: i64 = 10_000;

    /// 100% in parts per million.
    pub const FULL: DiscountPercent = DiscountPercent(1_000_000);

    /// Creates a percentage from parts per million without range checks.
    #[inline]
    pub const fn from_ppm(ppm: i64) -> Self {
        DiscountPercent(ppm)
    }

    /// Creates a percentage from basis points (1 bps = 0.01%).
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        DiscountPercent(bps * 100)
    }

    /// Creates a percentage from a stored number like `12.345`.
    ///
    /// Keeps the sign and values above 100. NaN reads as zero and values too
    /// large for the representation saturate.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::types::DiscountPercent;
    ///
    /// assert_eq!(DiscountPercent::from_percentage(12.345).ppm(), 123_450);
    /// assert_eq!(DiscountPercent::from_percentage(-10.0).ppm(), -100_000);
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        DiscountPercent((pct * Self::PPM_PER_PERCENT as f64).round() as i64)
    }

    /// Creates a percentage from a number like `12.5`, clamped to `[0, 100]`.
    ///
    /// NaN reads as zero.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::types::DiscountPercent;
    ///
    /// assert_eq!(DiscountPercent::clamped(12.5).ppm(), 125_000);
    /// assert_eq!(DiscountPercent::clamped(150.0), DiscountPercent::FULL);
    /// assert_eq!(DiscountPercent::clamped(-5.0).ppm(), 0);
    /// ```
    pub fn clamped(pct: f64) -> Self {
        if pct.is_nan() {
            return DiscountPercent::zero();
        }
        Self::from_percentage(pct.clamp(0.0, 100.0))
    }

    /// Returns the rate in parts per million.
    #[inline]
    pub const fn ppm(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a percentage (for display and storage).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / Self::PPM_PER_PERCENT as f64
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountPercent(0)
    }

    /// Checks if the discount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Product
// =============================================================================

/// The slice of a host product the resolver needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,

    /// Undiscounted list price. `None` when the host has no usable value
    /// (empty or non-numeric in the catalog).
    pub regular_price: Option<Money>,

    /// Categories the product belongs to.
    pub category_ids: BTreeSet<CategoryId>,
}

impl Product {
    /// Creates a product with no categories.
    pub fn new(id: ProductId, regular_price: Option<Money>) -> Self {
        Product {
            id,
            regular_price,
            category_ids: BTreeSet::new(),
        }
    }

    /// Adds category memberships (builder style).
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        self.category_ids.extend(categories);
        self
    }

    /// Returns the regular price when it is present and strictly positive.
    #[inline]
    pub fn discountable_price(&self) -> Option<Money> {
        self.regular_price.filter(Money::is_positive)
    }
}

// =============================================================================
// Price Context
// =============================================================================

/// Where a price lookup originates.
///
/// Back-office product screens re-read prices while editing; rewriting
/// them there would show (and could save) discounted values as if they
/// were the catalog price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PriceContext {
    /// Catalog pages, cart, checkout, public API.
    #[default]
    Storefront,
    /// A regular back-office page render.
    AdminScreen,
    /// An async/API sub-request issued from the back office.
    AdminAsync,
}

impl PriceContext {
    /// Returns true if prices must be left untouched in this context.
    #[inline]
    pub fn bypasses_discounts(&self) -> bool {
        matches!(self, PriceContext::AdminScreen)
    }
}

// =============================================================================
// Price Quote
// =============================================================================

/// Which configuration rule produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiscountRule {
    /// The product is in the selected product list.
    Product,
    /// One of the product's categories is selected.
    Category,
    /// No rule matched; the no-match fallback price was used.
    NoMatch,
    /// The candidate price was returned untouched (admin screen or no
    /// usable regular price).
    Passthrough,
}

/// The transient result of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceQuote {
    /// Price the host was about to return.
    pub candidate: Money,
    /// The product's regular price, if it had one.
    pub regular: Option<Money>,
    /// Rule that decided the outcome.
    pub rule: DiscountRule,
    /// Discount applied (zero unless `rule` is Product or Category).
    pub percent: DiscountPercent,
    /// Final price handed back to the host.
    pub price: Money,
}

impl PriceQuote {
    /// Amount taken off the regular price, if any.
    pub fn savings(&self) -> Money {
        match (self.rule, self.regular) {
            (DiscountRule::Product | DiscountRule::Category, Some(regular)) => regular - self.price,
            _ => Money::zero(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_percent_units() {
        let pct = DiscountPercent::from_bps(2500);
        assert_eq!(pct.ppm(), 250_000);
        assert!((pct.percentage() - 25.0).abs() < 0.001);
        assert_eq!(DiscountPercent::from_ppm(1_000_000), DiscountPercent::FULL);
    }

    #[test]
    fn test_discount_percent_from_percentage() {
        assert_eq!(DiscountPercent::from_percentage(12.5).ppm(), 125_000);
        assert_eq!(DiscountPercent::from_percentage(150.0).ppm(), 1_500_000);
        assert_eq!(DiscountPercent::from_percentage(f64::NAN).ppm(), 0);
    }

    #[test]
    fn test_discount_percent_keeps_sub_basis_point_digits() {
        assert_eq!(DiscountPercent::from_percentage(12.345).ppm(), 123_450);
        assert_eq!(DiscountPercent::from_percentage(0.0001).ppm(), 1);
        assert!((DiscountPercent::from_percentage(12.345).percentage() - 12.345).abs() < 1e-9);
    }

    #[test]
    fn test_discount_percent_keeps_sign() {
        let markup = DiscountPercent::from_percentage(-10.0);
        assert_eq!(markup.ppm(), -100_000);
        assert!(!markup.is_zero());
    }

    #[test]
    fn test_discount_percent_clamped() {
        assert_eq!(DiscountPercent::clamped(10.0), DiscountPercent::from_bps(1000));
        assert_eq!(DiscountPercent::clamped(0.0), DiscountPercent::zero());
        assert_eq!(DiscountPercent::clamped(100.0), DiscountPercent::FULL);
        assert_eq!(DiscountPercent::clamped(1000.0), DiscountPercent::FULL);
        assert_eq!(DiscountPercent::clamped(-0.01), DiscountPercent::zero());
        assert_eq!(DiscountPercent::clamped(f64::NAN), DiscountPercent::zero());
    }

    #[test]
    fn test_discountable_price() {
        let product = Product::new(ProductId(1), Some(Money::from_minor(100)));
        assert_eq!(product.discountable_price(), Some(Money::from_minor(100)));

        let free = Product::new(ProductId(2), Some(Money::zero()));
        assert_eq!(free.discountable_price(), None);

        let negative = Product::new(ProductId(3), Some(Money::from_minor(-1)));
        assert_eq!(negative.discountable_price(), None);

        let missing = Product::new(ProductId(4), None);
        assert_eq!(missing.discountable_price(), None);
    }

    #[test]
    fn test_with_categories() {
        let product = Product::new(ProductId(1), None).with_categories([
            CategoryId(3),
            CategoryId(3),
            CategoryId(9),
        ]);
        assert_eq!(product.category_ids.len(), 2);
        assert!(product.category_ids.contains(&CategoryId(9)));
    }

    #[test]
    fn test_price_context() {
        assert_eq!(PriceContext::default(), PriceContext::Storefront);
        assert!(PriceContext::AdminScreen.bypasses_discounts());
        assert!(!PriceContext::AdminAsync.bypasses_discounts());
        assert!(!PriceContext::Storefront.bypasses_discounts());
    }

    #[test]
    fn test_quote_savings() {
        let quote = PriceQuote {
            candidate: Money::from_minor(10000),
            regular: Some(Money::from_minor(10000)),
            rule: DiscountRule::Product,
            percent: DiscountPercent::from_bps(2500),
            price: Money::from_minor(7500),
        };
        assert_eq!(quote.savings(), Money::from_minor(2500));

        let passthrough = PriceQuote {
            rule: DiscountRule::Passthrough,
            price: Money::from_minor(10000),
            ..quote
        };
        assert!(passthrough.savings().is_zero());
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&ProductId(42)).unwrap(), "42");
        let id: CategoryId = serde_json::from_str("7").unwrap();
        assert_eq!(id, CategoryId(7));
    }
}
