//! # Host Registration
//!
//! The seam between the plugin and the storefront platform.
//!
//! ## Registration Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Host boot                                                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  DiscountPlugin::install(host)                                          │
//! │     ├── host.register_settings_page("custom_discount", "Discounts")     │
//! │     ├── host.subscribe_price_hook(DisplayPrice, 20, adjuster)           │
//! │     └── host.subscribe_price_hook(SalePrice,    20, adjuster)           │
//! │                                                                         │
//! │  Per price lookup (host-driven)                                         │
//! │     host → adjuster.adjust(price, product, context) → price             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use discount_core::{PriceAdjuster, PriceHook, PricePipeline};

/// What the plugin needs from the host platform.
pub trait Host {
    /// Adds a tab to the host's settings screens.
    fn register_settings_page(&mut self, id: &str, label: &str);

    /// Subscribes an adjuster to one of the price lookups.
    fn subscribe_price_hook(
        &mut self,
        hook: PriceHook,
        priority: i32,
        adjuster: Arc<dyn PriceAdjuster>,
    );
}

/// A registered settings tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsTab {
    pub id: String,
    pub label: String,
}

/// An in-process host: a settings tab list plus a [`PricePipeline`].
///
/// Useful for embedding the discount rules outside a full storefront and
/// for exercising the plugin end to end in tests.
#[derive(Debug, Default)]
pub struct LocalHost {
    pub tabs: Vec<SettingsTab>,
    pub pipeline: PricePipeline,
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a settings tab with `id` is registered.
    pub fn has_tab(&self, id: &str) -> bool {
        self.tabs.iter().any(|tab| tab.id == id)
    }
}

impl Host for LocalHost {
    fn register_settings_page(&mut self, id: &str, label: &str) {
        // The host keys tabs by id; registering again replaces the label.
        match self.tabs.iter_mut().find(|tab| tab.id == id) {
            Some(tab) => tab.label = label.to_string(),
            None => self.tabs.push(SettingsTab {
                id: id.to_string(),
                label: label.to_string(),
            }),
        }
    }

    fn subscribe_price_hook(
        &mut self,
        hook: PriceHook,
        priority: i32,
        adjuster: Arc<dyn PriceAdjuster>,
    ) {
        self.pipeline.subscribe(hook, priority, adjuster);
    }
}
