//! # Price Resolver
//!
//! Computes the price a shopper sees from a product's regular price and the
//! current [`DiscountConfig`].
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve(candidate, product, config, context)                           │
//! │       │                                                                 │
//! │       ├── context is AdminScreen? ───────────────► candidate            │
//! │       │                                                                 │
//! │       ├── regular price missing or <= 0? ────────► candidate            │
//! │       │                                                                 │
//! │       ├── product selected? ─────► regular × (1 - product %)            │
//! │       │                                                                 │
//! │       ├── any category selected? ► regular × (1 - category %)           │
//! │       │                                                                 │
//! │       └── otherwise ─────────────► no-match fallback                    │
//! │                                     (regular, or candidate if set)      │
//! │                                                                         │
//! │  Discounted results are rounded half-up to the currency precision.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The result depends on the regular price, never on `candidate` (except in
//! the passthrough branches), so running the resolver twice on its own
//! output gives the same price.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use ts_rs::TS;

use crate::config::DiscountConfig;
use crate::money::{CurrencyPrecision, Money};
use crate::types::{DiscountPercent, DiscountRule, PriceContext, PriceQuote, Product};

/// What to return when a product has a regular price but no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NoMatchFallback {
    /// Return the regular price. Any sale price set elsewhere is replaced.
    #[default]
    RegularPrice,
    /// Return the candidate price untouched, keeping sale prices intact.
    CandidatePrice,
}

impl std::str::FromStr for NoMatchFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regular_price" | "regular" => Ok(NoMatchFallback::RegularPrice),
            "candidate_price" | "candidate" => Ok(NoMatchFallback::CandidatePrice),
            other => Err(format!(
                "Unknown no-match fallback: '{}'. Valid options: regular_price, candidate_price",
                other
            )),
        }
    }
}

/// Resolves discounted prices.
///
/// Holds only host-level parameters; the discount settings are passed per
/// call so every lookup works on an explicit snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceResolver {
    precision: CurrencyPrecision,
    fallback: NoMatchFallback,
}

impl PriceResolver {
    /// Creates a resolver for the host's price precision.
    pub fn new(precision: CurrencyPrecision) -> Self {
        PriceResolver {
            precision,
            fallback: NoMatchFallback::default(),
        }
    }

    /// Sets the no-match behavior (builder style).
    pub fn with_fallback(mut self, fallback: NoMatchFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// The precision results are expressed in.
    pub fn precision(&self) -> CurrencyPrecision {
        self.precision
    }

    /// The configured no-match behavior.
    pub fn fallback(&self) -> NoMatchFallback {
        self.fallback
    }

    /// Returns the price the host should use.
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::config::DiscountConfig;
    /// use discount_core::money::{CurrencyPrecision, Money};
    /// use discount_core::resolver::PriceResolver;
    /// use discount_core::types::{DiscountPercent, PriceContext, Product, ProductId};
    ///
    /// let mut config = DiscountConfig::default();
    /// config.product_ids.insert(ProductId(12));
    /// config.product_discount = DiscountPercent::from_bps(2500);
    ///
    /// let product = Product::new(ProductId(12), Some(Money::from_minor(10000)));
    /// let resolver = PriceResolver::new(CurrencyPrecision::default());
    ///
    /// let candidate = Money::from_minor(10000);
    /// let price = resolver.resolve(candidate, &product, &config, PriceContext::Storefront);
    /// assert_eq!(price.minor_units(), 7500); // 75.00
    /// ```
    pub fn resolve(
        &self,
        candidate: Money,
        product: &Product,
        config: &DiscountConfig,
        context: PriceContext,
    ) -> Money {
        self.quote(candidate, product, config, context).price
    }

    /// Resolves a price and reports how it was reached.
    pub fn quote(
        &self,
        candidate: Money,
        product: &Product,
        config: &DiscountConfig,
        context: PriceContext,
    ) -> PriceQuote {
        let passthrough = PriceQuote {
            candidate,
            regular: product.regular_price,
            rule: DiscountRule::Passthrough,
            percent: DiscountPercent::zero(),
            price: candidate,
        };

        if context.bypasses_discounts() {
            trace!(product_id = %product.id, ?context, "Admin screen, leaving price untouched");
            return passthrough;
        }

        let Some(regular) = product.discountable_price() else {
            trace!(product_id = %product.id, "No usable regular price, leaving price untouched");
            return passthrough;
        };

        let (rule, percent) = if config.selects_product(product.id) {
            (DiscountRule::Product, config.product_discount)
        } else if config.selects_any_category(&product.category_ids) {
            (DiscountRule::Category, config.category_discount)
        } else {
            let price = match self.fallback {
                NoMatchFallback::RegularPrice => regular,
                NoMatchFallback::CandidatePrice => candidate,
            };
            trace!(product_id = %product.id, fallback = ?self.fallback, "No discount rule matched");
            return PriceQuote {
                rule: DiscountRule::NoMatch,
                price,
                ..passthrough
            };
        };

        let price = regular.apply_percentage_discount(percent);

        debug!(
            product_id = %product.id,
            ?rule,
            percent = percent.percentage(),
            regular = %regular.to_decimal_string(self.precision),
            price = %price.to_decimal_string(self.precision),
            "Applied discount"
        );

        PriceQuote {
            rule,
            percent,
            price,
            ..passthrough
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
