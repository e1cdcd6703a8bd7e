//! # Discount Configuration
//!
//! The immutable snapshot of the four discount settings.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Settings store (host)                                                  │
//! │       │                                                                 │
//! │       │  DiscountConfig::load()   ← once per price lookup               │
//! │       ▼                                                                 │
//! │  DiscountConfig (snapshot) ──► PriceResolver::resolve()                 │
//! │                                                                         │
//! │  Admin save ──► settings::save_settings() ──► write_to(store)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A fresh install has no stored values; `load` then yields the defaults:
//! empty selections and 0% for both tiers.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tracing::trace;
use ts_rs::TS;

use crate::settings::{
    OPTION_CATEGORIES, OPTION_CATEGORY_PERCENT, OPTION_PRODUCTS, OPTION_PRODUCT_PERCENT,
};
use crate::store::SettingsStore;
use crate::types::{CategoryId, DiscountPercent, ProductId};

/// Store keys in the order `load` reads them.
const OPTION_KEYS: [&str; 4] = [
    OPTION_CATEGORIES,
    OPTION_CATEGORY_PERCENT,
    OPTION_PRODUCTS,
    OPTION_PRODUCT_PERCENT,
];

/// The category and product discount settings.
///
/// ## Invariants
/// - An empty id set means that tier never applies
/// - Percentages saved through the admin form are within `[0, 100]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountConfig {
    /// Categories whose products get `category_discount`.
    pub category_ids: BTreeSet<CategoryId>,
    /// Discount for products in a selected category.
    pub category_discount: DiscountPercent,
    /// Products that get `product_discount`.
    pub product_ids: BTreeSet<ProductId>,
    /// Discount for selected products. Wins over the category discount.
    pub product_discount: DiscountPercent,
}

impl DiscountConfig {
    /// Reads a snapshot from the settings store.
    ///
    /// All four keys are read in one [`SettingsStore::get_many`] call, so a
    /// concurrent save is seen either entirely or not at all.
    ///
    /// ## Leniency
    /// - id lists may hold numbers or numeric strings; other entries are skipped
    /// - a single scalar id is treated as a one-element list
    /// - percentages may be numbers or numeric strings; anything else is 0
    ///
    /// ## Example
    /// ```rust
    /// use discount_core::config::DiscountConfig;
    /// use discount_core::store::InMemorySettingsStore;
    /// use discount_core::types::DiscountPercent;
    /// use serde_json::json;
    ///
    /// let store = InMemorySettingsStore::with_values([
    ///     ("custom_discount_products", json!(["12", 15])),
    ///     ("custom_discount_product_percentage", json!("25")),
    /// ]);
    /// let config = DiscountConfig::load(&store);
    /// assert_eq!(config.product_ids.len(), 2);
    /// assert_eq!(config.product_discount, DiscountPercent::from_bps(2500));
    /// ```
    pub fn load(store: &dyn SettingsStore) -> Self {
        let mut values = store.get_many(&OPTION_KEYS).into_iter();
        let mut next = || values.next().flatten();

        let config = DiscountConfig {
            category_ids: read_ids(next()).map(CategoryId).collect(),
            category_discount: read_percent(next()),
            product_ids: read_ids(next()).map(ProductId).collect(),
            product_discount: read_percent(next()),
        };

        trace!(
            categories = config.category_ids.len(),
            category_pct = config.category_discount.percentage(),
            products = config.product_ids.len(),
            product_pct = config.product_discount.percentage(),
            "Loaded discount config snapshot"
        );

        config
    }

    /// Writes all four values to the settings store in one batch.
    pub fn write_to(&self, store: &dyn SettingsStore) {
        let category_ids: Vec<u64> = self.category_ids.iter().map(|id| id.0).collect();
        let product_ids: Vec<u64> = self.product_ids.iter().map(|id| id.0).collect();

        store.set_many(vec![
            (OPTION_CATEGORIES, json!(category_ids)),
            (OPTION_CATEGORY_PERCENT, json!(self.category_discount.percentage())),
            (OPTION_PRODUCTS, json!(product_ids)),
            (OPTION_PRODUCT_PERCENT, json!(self.product_discount.percentage())),
        ]);
    }

    /// True when `product` is explicitly selected.
    #[inline]
    pub fn selects_product(&self, product: ProductId) -> bool {
        !self.product_ids.is_empty() && self.product_ids.contains(&product)
    }

    /// True when any of `categories` is selected.
    pub fn selects_any_category(&self, categories: &BTreeSet<CategoryId>) -> bool {
        !self.category_ids.is_empty() && !self.category_ids.is_disjoint(categories)
    }
}

fn read_ids(value: Option<Value>) -> impl Iterator<Item = u64> {
    let items = match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => Vec::new(),
        Some(scalar) => vec![scalar],
    };
    items.into_iter().filter_map(|item| match item {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn read_percent(value: Option<Value>) -> DiscountPercent {
    let pct = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    DiscountPercent::from_percentage(pct)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySettingsStore;

    #[test]
    fn test_empty_store_yields_defaults() {
        let store = InMemorySettingsStore::new();
        let config = DiscountConfig::load(&store);
        assert_eq!(config, DiscountConfig::default());
        assert!(config.category_discount.is_zero());
        assert!(config.product_ids.is_empty());
    }

    #[test]
    fn test_load_mixed_value_shapes() {
        let store = InMemorySettingsStore::with_values([
            (OPTION_CATEGORIES, json!(["3", 4, "x", null, " 9 "])),
            (OPTION_CATEGORY_PERCENT, json!(10)),
            (OPTION_PRODUCTS, json!("21")),
            (OPTION_PRODUCT_PERCENT, json!("12.5")),
        ]);
        let config = DiscountConfig::load(&store);

        let expected: BTreeSet<CategoryId> = [3, 4, 9].into_iter().map(CategoryId).collect();
        assert_eq!(config.category_ids, expected);
        assert_eq!(config.category_discount, DiscountPercent::from_bps(1000));
        assert_eq!(config.product_ids, BTreeSet::from([ProductId(21)]));
        assert_eq!(config.product_discount, DiscountPercent::from_bps(1250));
    }

    #[test]
    fn test_load_unparseable_percent_is_zero() {
        let store = InMemorySettingsStore::with_values([
            (OPTION_CATEGORY_PERCENT, json!("lots")),
            (OPTION_PRODUCT_PERCENT, json!({"nested": 1})),
        ]);
        let config = DiscountConfig::load(&store);
        assert!(config.category_discount.is_zero());
        assert!(config.product_discount.is_zero());
    }

    #[test]
    fn test_load_trusts_out_of_range_percent() {
        let store = InMemorySettingsStore::with_values([(OPTION_PRODUCT_PERCENT, json!(120))]);
        let config = DiscountConfig::load(&store);
        assert_eq!(config.product_discount, DiscountPercent::from_bps(12_000));
    }

    #[test]
    fn test_load_keeps_negative_percent() {
        let store = InMemorySettingsStore::with_values([
            (OPTION_PRODUCT_PERCENT, json!(-10)),
            (OPTION_CATEGORY_PERCENT, json!("-2.5")),
        ]);
        let config = DiscountConfig::load(&store);
        assert_eq!(config.product_discount, DiscountPercent::from_percentage(-10.0));
        assert_eq!(config.category_discount, DiscountPercent::from_ppm(-25_000));
    }

    #[test]
    fn test_load_keeps_sub_basis_point_percent() {
        let store = InMemorySettingsStore::with_values([(OPTION_PRODUCT_PERCENT, json!("12.345"))]);
        let config = DiscountConfig::load(&store);
        assert_eq!(config.product_discount.ppm(), 123_450);

        let written = InMemorySettingsStore::new();
        config.write_to(&written);
        assert_eq!(DiscountConfig::load(&written), config);
    }

    #[test]
    fn test_load_never_sees_half_written_save() {
        use std::sync::Arc;
        use std::thread;

        let first = DiscountConfig {
            product_ids: BTreeSet::from([ProductId(1)]),
            product_discount: DiscountPercent::from_bps(1000),
            ..Default::default()
        };
        let second = DiscountConfig {
            product_ids: BTreeSet::from([ProductId(2)]),
            product_discount: DiscountPercent::from_bps(2000),
            ..Default::default()
        };

        let store = Arc::new(InMemorySettingsStore::new());
        first.write_to(store.as_ref());

        let writer = {
            let store = store.clone();
            let (first, second) = (first.clone(), second.clone());
            thread::spawn(move || {
                for i in 0..500 {
                    let next = if i % 2 == 0 { &second } else { &first };
                    next.write_to(store.as_ref());
                }
            })
        };

        for _ in 0..500 {
            let seen = DiscountConfig::load(store.as_ref());
            assert!(seen == first || seen == second, "torn read: {seen:?}");
        }
        writer.join().unwrap();
    }

    #[test]
    fn test_write_then_load() {
        let store = InMemorySettingsStore::new();
        let config = DiscountConfig {
            category_ids: BTreeSet::from([CategoryId(5)]),
            category_discount: DiscountPercent::from_bps(1000),
            product_ids: BTreeSet::from([ProductId(8), ProductId(13)]),
            product_discount: DiscountPercent::from_bps(2550),
        };
        config.write_to(&store);

        assert_eq!(store.get(OPTION_PRODUCTS), Some(json!([8, 13])));
        assert_eq!(DiscountConfig::load(&store), config);
    }

    #[test]
    fn test_selection_checks() {
        let config = DiscountConfig {
            category_ids: BTreeSet::from([CategoryId(1), CategoryId(2)]),
            product_ids: BTreeSet::from([ProductId(7)]),
            ..Default::default()
        };

        assert!(config.selects_product(ProductId(7)));
        assert!(!config.selects_product(ProductId(8)));

        assert!(config.selects_any_category(&BTreeSet::from([CategoryId(2), CategoryId(30)])));
        assert!(!config.selects_any_category(&BTreeSet::from([CategoryId(30)])));
        assert!(!config.selects_any_category(&BTreeSet::new()));

        let empty = DiscountConfig::default();
        assert!(!empty.selects_product(ProductId(7)));
        assert!(!empty.selects_any_category(&BTreeSet::from([CategoryId(1)])));
    }
}
