//! # discount-plugin: Host Integration for Tiered Discount
//!
//! The thin layer between a storefront host and [`discount_core`].
//!
//! ## Responsibilities
//! - Load `discount.toml` and `DISCOUNT_*` overrides ([`config`])
//! - Install the tracing subscriber ([`logging`])
//! - Register the settings page and the two price hooks ([`host`], [`plugin`])
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use discount_core::{InMemorySettingsStore, Money, PriceContext, PriceHook, Product, ProductId};
//! use discount_core::settings::SettingsSubmission;
//! use discount_plugin::{DiscountPlugin, LocalHost, PluginConfig};
//!
//! let store = Arc::new(InMemorySettingsStore::new());
//! let plugin = DiscountPlugin::new(PluginConfig::default(), store).unwrap();
//!
//! let mut host = LocalHost::new();
//! plugin.install(&mut host);
//!
//! plugin.save_settings(&SettingsSubmission {
//!     products: vec!["12".into()],
//!     product_percentage: "25".into(),
//!     ..Default::default()
//! }).unwrap();
//!
//! let product = Product::new(ProductId(12), Some(Money::from_minor(10000)));
//! let candidate = Money::from_minor(10000);
//! let price = host
//!     .pipeline
//!     .apply(PriceHook::DisplayPrice, candidate, &product, PriceContext::Storefront);
//! assert_eq!(price.minor_units(), 7500);
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod plugin;

pub use config::PluginConfig;
pub use error::{PluginError, PluginResult};
pub use host::{Host, LocalHost};
pub use plugin::DiscountPlugin;
