//! # discount-core: Pure Pricing Logic for Tiered Discount
//!
//! Category- and product-level percentage discounts for a storefront's
//! price lookups, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │                     Tiered Discount Architecture                      │
//! │                                                                       │
//! │  ┌─────────────────────────────────────────────────────────────────┐  │
//! │  │                    Host storefront platform                     │  │
//! │  │   settings registry • price filters • admin screens • catalog   │  │
//! │  └─────────────────────────────┬───────────────────────────────────┘  │
//! │                                │                                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐  │
//! │  │                  discount-plugin (integration)                  │  │
//! │  │         registers the settings page and the price hooks         │  │
//! │  └─────────────────────────────┬───────────────────────────────────┘  │
//! │                                │                                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐  │
//! │  │                 ★ discount-core (THIS CRATE) ★                  │  │
//! │  │                                                                 │  │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────────────────┐  │  │
//! │  │   │  money   │ │  config  │ │ resolver │ │ settings/pipeline │  │  │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └───────────────────┘  │  │
//! │  │                                                                 │  │
//! │  │       NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │  │
//! │  └─────────────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, DiscountPercent, PriceContext, PriceQuote
//! - [`money`] - Money in integer minor units, currency precision
//! - [`config`] - The `DiscountConfig` snapshot
//! - [`store`] - Settings store seam
//! - [`settings`] - Settings page schema and save action
//! - [`validation`] - Admin input parsing
//! - [`resolver`] - The price resolution rule
//! - [`pipeline`] - Ordered price adjusters
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use discount_core::{
//!     CategoryId, DiscountConfig, DiscountPercent, Money, PriceContext, PriceResolver, Product,
//!     ProductId,
//! };
//! use discount_core::money::CurrencyPrecision;
//!
//! let mut config = DiscountConfig::default();
//! config.category_ids.insert(CategoryId(3));
//! config.category_discount = DiscountPercent::from_bps(1000); // 10%
//!
//! let product = Product::new(ProductId(40), Some(Money::from_minor(5000)))
//!     .with_categories([CategoryId(3)]);
//! let resolver = PriceResolver::new(CurrencyPrecision::default());
//!
//! let candidate = Money::from_minor(5000);
//! let price = resolver.resolve(candidate, &product, &config, PriceContext::Storefront);
//! assert_eq!(price.minor_units(), 4500); // 45.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod money;
pub mod pipeline;
pub mod resolver;
pub mod settings;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::DiscountConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pipeline::{DiscountAdjuster, PriceAdjuster, PriceHook, PricePipeline};
pub use resolver::{NoMatchFallback, PriceResolver};
pub use store::{InMemorySettingsStore, SettingsStore};
pub use types::*;
