//! # Price Pipeline
//!
//! An explicit stand-in for the host's price filters: adjusters subscribe to
//! a hook with a priority, and the pipeline folds a price through them.
//!
//! ## Ordering
//! ```text
//! apply(DisplayPrice, 10.00)
//!      │
//!      ▼
//!  priority 10: tax-display adjuster   10.00 → 10.00
//!      │
//!      ▼
//!  priority 20: DiscountAdjuster       10.00 →  9.00
//!      │
//!      ▼
//!  priority 20: (registered later)      9.00 →  ...
//! ```
//! Lower priorities run first; ties run in registration order.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::config::DiscountConfig;
use crate::error::CoreError;
use crate::money::Money;
use crate::resolver::PriceResolver;
use crate::store::SettingsStore;
use crate::types::{PriceContext, Product};

/// Priority the discount adjuster subscribes with unless configured.
pub const DEFAULT_PRIORITY: i32 = 20;

// =============================================================================
// Hooks
// =============================================================================

/// The price lookups the host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PriceHook {
    /// "Get display price": the active price shown in catalog and cart.
    DisplayPrice,
    /// "Get sale price".
    SalePrice,
}

impl PriceHook {
    /// Both hooks, in the order the plugin subscribes to them.
    pub const ALL: [PriceHook; 2] = [PriceHook::DisplayPrice, PriceHook::SalePrice];
}

impl fmt::Display for PriceHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceHook::DisplayPrice => write!(f, "display_price"),
            PriceHook::SalePrice => write!(f, "sale_price"),
        }
    }
}

impl FromStr for PriceHook {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "display_price" | "price" => Ok(PriceHook::DisplayPrice),
            "sale_price" => Ok(PriceHook::SalePrice),
            other => Err(CoreError::UnknownHook(other.to_string())),
        }
    }
}

// =============================================================================
// Adjuster Capability
// =============================================================================

/// Something that may change a product's price during a lookup.
///
/// Implementations must not fail: whatever happens, return a usable price.
pub trait PriceAdjuster: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Returns the (possibly) adjusted price.
    fn adjust(&self, price: Money, product: &Product, context: PriceContext) -> Money;
}

/// The discount rules as a [`PriceAdjuster`].
///
/// Loads a fresh [`DiscountConfig`] snapshot from the settings store on
/// every call, so a saved change applies to the next lookup.
pub struct DiscountAdjuster {
    resolver: PriceResolver,
    store: Arc<dyn SettingsStore>,
}

impl DiscountAdjuster {
    pub fn new(resolver: PriceResolver, store: Arc<dyn SettingsStore>) -> Self {
        DiscountAdjuster { resolver, store }
    }
}

impl fmt::Debug for DiscountAdjuster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscountAdjuster")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl PriceAdjuster for DiscountAdjuster {
    fn name(&self) -> &str {
        "custom_discount"
    }

    fn adjust(&self, price: Money, product: &Product, context: PriceContext) -> Money {
        let config = DiscountConfig::load(self.store.as_ref());
        self.resolver.resolve(price, product, &config, context)
    }
}

// =============================================================================
// Pipeline
// =============================================================================

struct Subscription {
    hook: PriceHook,
    priority: i32,
    adjuster: Arc<dyn PriceAdjuster>,
}

/// Ordered price adjusters per hook.
#[derive(Default)]
pub struct PricePipeline {
    subscriptions: Vec<Subscription>,
}

impl PricePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `adjuster` to `hook`.
    pub fn subscribe(&mut self, hook: PriceHook, priority: i32, adjuster: Arc<dyn PriceAdjuster>) {
        // Insert after every subscription with priority <= ours so ties keep
        // registration order.
        let at = self
            .subscriptions
            .iter()
            .position(|s| s.priority > priority)
            .unwrap_or(self.subscriptions.len());
        self.subscriptions.insert(
            at,
            Subscription {
                hook,
                priority,
                adjuster,
            },
        );
    }

    /// Number of adjusters subscribed to `hook`.
    pub fn subscriber_count(&self, hook: PriceHook) -> usize {
        self.subscriptions.iter().filter(|s| s.hook == hook).count()
    }

    /// Runs `price` through every adjuster subscribed to `hook`.
    pub fn apply(
        &self,
        hook: PriceHook,
        price: Money,
        product: &Product,
        context: PriceContext,
    ) -> Money {
        self.subscriptions
            .iter()
            .filter(|s| s.hook == hook)
            .fold(price, |price, s| {
                let adjusted = s.adjuster.adjust(price, product, context);
                trace!(
                    %hook,
                    adjuster = s.adjuster.name(),
                    priority = s.priority,
                    before = price.minor_units(),
                    after = adjusted.minor_units(),
                    "Price adjuster ran"
                );
                adjusted
            })
    }
}

impl fmt::Debug for PricePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.subscriptions
                    .iter()
                    .map(|s| (s.hook, s.priority, s.adjuster.name().to_string())),
            )
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::CurrencyPrecision;
    use crate::settings::{save_settings, SettingsSubmission};
    use crate::store::InMemorySettingsStore;
    use crate::types::{CategoryId, ProductId};

    const SHOP: PriceContext = PriceContext::Storefront;
    const DISPLAY: PriceHook = PriceHook::DisplayPrice;

    /// Adds a fixed amount, to observe ordering.
    struct Surcharge(i64);

    impl PriceAdjuster for Surcharge {
        fn name(&self) -> &str {
            "surcharge"
        }

        fn adjust(&self, price: Money, _product: &Product, _context: PriceContext) -> Money {
            Money::from_minor(price.minor_units() + self.0)
        }
    }

    /// Doubles the price.
    struct Double;

    impl PriceAdjuster for Double {
        fn name(&self) -> &str {
            "double"
        }

        fn adjust(&self, price: Money, _product: &Product, _context: PriceContext) -> Money {
            Money::from_minor(price.minor_units() * 2)
        }
    }

    fn discount_store(product_pct: &str, category_pct: &str) -> Arc<InMemorySettingsStore> {
        let store = Arc::new(InMemorySettingsStore::new());
        let form = SettingsSubmission {
            categories: vec!["3".to_string()],
            category_percentage: category_pct.to_string(),
            products: vec!["12".to_string()],
            product_percentage: product_pct.to_string(),
        };
        save_settings(store.as_ref(), &form).unwrap();
        store
    }

    fn discount_adjuster(store: Arc<InMemorySettingsStore>) -> Arc<DiscountAdjuster> {
        Arc::new(DiscountAdjuster::new(
            PriceResolver::new(CurrencyPrecision::default()),
            store,
        ))
    }

    #[test]
    fn test_hook_parsing() {
        assert_eq!("display_price".parse::<PriceHook>().unwrap(), PriceHook::DisplayPrice);
        assert_eq!("SALE_PRICE".parse::<PriceHook>().unwrap(), PriceHook::SalePrice);
        assert!(matches!(
            "weight".parse::<PriceHook>(),
            Err(CoreError::UnknownHook(_))
        ));
        assert_eq!(PriceHook::SalePrice.to_string(), "sale_price");
    }

    #[test]
    fn test_priority_order() {
        let mut pipeline = PricePipeline::new();
        pipeline.subscribe(PriceHook::DisplayPrice, 20, Arc::new(Double));
        pipeline.subscribe(PriceHook::DisplayPrice, 10, Arc::new(Surcharge(100)));

        let product = Product::new(ProductId(1), None);
        // (1000 + 100) * 2, not 1000 * 2 + 100
        let price = pipeline.apply(DISPLAY, Money::from_minor(1000), &product, SHOP);
        assert_eq!(price.minor_units(), 2200);
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let mut pipeline = PricePipeline::new();
        pipeline.subscribe(PriceHook::DisplayPrice, 20, Arc::new(Double));
        pipeline.subscribe(PriceHook::DisplayPrice, 20, Arc::new(Surcharge(1)));

        let product = Product::new(ProductId(1), None);
        let price = pipeline.apply(DISPLAY, Money::from_minor(10), &product, SHOP);
        assert_eq!(price.minor_units(), 21);
    }

    #[test]
    fn test_hooks_are_independent() {
        let mut pipeline = PricePipeline::new();
        pipeline.subscribe(PriceHook::SalePrice, 10, Arc::new(Double));

        let product = Product::new(ProductId(1), None);
        let display = pipeline.apply(DISPLAY, Money::from_minor(10), &product, SHOP);
        assert_eq!(display.minor_units(), 10);
        assert_eq!(pipeline.subscriber_count(PriceHook::DisplayPrice), 0);
        assert_eq!(pipeline.subscriber_count(PriceHook::SalePrice), 1);
    }

    #[test]
    fn test_discount_adjuster_reads_current_settings() {
        let store = discount_store("25", "10");
        let adjuster = discount_adjuster(store.clone());
        let product = Product::new(ProductId(12), Some(Money::from_minor(10000)));

        let price = adjuster.adjust(Money::from_minor(10000), &product, SHOP);
        assert_eq!(price.minor_units(), 7500);

        // A later save applies to the next lookup.
        let form = SettingsSubmission {
            products: vec!["12".to_string()],
            product_percentage: "50".to_string(),
            ..Default::default()
        };
        save_settings(store.as_ref(), &form).unwrap();
        let price = adjuster.adjust(Money::from_minor(10000), &product, SHOP);
        assert_eq!(price.minor_units(), 5000);
    }

    #[test]
    fn test_discount_after_lower_priority_adjuster() {
        let store = discount_store("0", "10");
        let mut pipeline = PricePipeline::new();
        pipeline.subscribe(PriceHook::DisplayPrice, DEFAULT_PRIORITY, discount_adjuster(store));
        pipeline.subscribe(PriceHook::DisplayPrice, 5, Arc::new(Surcharge(999)));

        let product = Product::new(ProductId(40), Some(Money::from_minor(5000)))
            .with_categories([CategoryId(3)]);
        let price = pipeline.apply(DISPLAY, Money::from_minor(5000), &product, SHOP);
        assert_eq!(price.minor_units(), 4500);
    }

    #[test]
    fn test_repeated_discount_subscription_is_stable() {
        let store = discount_store("25", "0");
        let adjuster = discount_adjuster(store);
        let mut pipeline = PricePipeline::new();
        pipeline.subscribe(PriceHook::DisplayPrice, DEFAULT_PRIORITY, adjuster.clone());
        pipeline.subscribe(PriceHook::DisplayPrice, DEFAULT_PRIORITY, adjuster);

        let product = Product::new(ProductId(12), Some(Money::from_minor(10000)));
        let price = pipeline.apply(DISPLAY, Money::from_minor(10000), &product, SHOP);
        assert_eq!(price.minor_units(), 7500);
    }
}
