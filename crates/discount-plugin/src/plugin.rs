//! # Discount Plugin
//!
//! Ties the plugin config, the host's settings store and the pricing core
//! together.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, trace};

use discount_core::settings::{
    self, SelectOption, SettingsPage, SettingsSubmission, PAGE_ID, PAGE_LABEL,
};
use discount_core::{
    CoreError, DiscountAdjuster, DiscountConfig, Money, PriceAdjuster, PriceContext, PriceHook,
    PriceQuote, PriceResolver, Product, SettingsStore,
};

use crate::config::PluginConfig;
use crate::error::PluginResult;
use crate::host::Host;
use crate::logging::init_tracing;

/// The installed discount plugin.
pub struct DiscountPlugin {
    config: PluginConfig,
    resolver: PriceResolver,
    hooks: Vec<PriceHook>,
    store: Arc<dyn SettingsStore>,
    adjuster: Arc<DiscountAdjuster>,
}

impl DiscountPlugin {
    /// Creates the plugin from an already loaded config.
    pub fn new(config: PluginConfig, store: Arc<dyn SettingsStore>) -> PluginResult<Self> {
        config.validate()?;
        let resolver = config.resolver()?;
        let hooks = config.price_hooks()?;
        let adjuster = Arc::new(DiscountAdjuster::new(resolver, store.clone()));

        Ok(DiscountPlugin {
            config,
            resolver,
            hooks,
            store,
            adjuster,
        })
    }

    /// Full startup: load config, install logging, build the plugin.
    pub fn bootstrap(
        config_path: Option<PathBuf>,
        store: Arc<dyn SettingsStore>,
    ) -> PluginResult<Self> {
        let config = PluginConfig::load(config_path)?;
        init_tracing(&config.logging.filter);

        info!(
            price_decimals = config.pricing.price_decimals,
            no_match = ?config.pricing.no_match,
            priority = config.hooks.priority,
            "Starting discount plugin"
        );

        Self::new(config, store)
    }

    /// Registers the settings page and the configured price hooks with the
    /// host.
    pub fn install(&self, host: &mut dyn Host) {
        host.register_settings_page(PAGE_ID, PAGE_LABEL);

        let priority = self.config.hook_priority();
        for &hook in &self.hooks {
            host.subscribe_price_hook(hook, priority, self.adjuster.clone());
            debug!(%hook, priority, "Subscribed discount adjuster");
        }
    }

    /// Filter callback for hosts that pass hook names and prices as text.
    ///
    /// `hook` is the host's hook name and `price` the decimal price it is
    /// filtering. The result is formatted at the configured decimals. Hooks
    /// this plugin is not subscribed to keep the price value. An unknown hook
    /// name or a price that is not a decimal number is an error.
    pub fn filter_price_text(
        &self,
        hook: &str,
        price: &str,
        product: &Product,
        context: PriceContext,
    ) -> PluginResult<String> {
        let hook: PriceHook = hook.trim().parse()?;
        let precision = self.resolver.precision();
        let candidate = Money::parse_decimal(price, precision).map_err(CoreError::from)?;

        if !self.hooks.contains(&hook) {
            trace!(%hook, "Not subscribed, leaving price untouched");
            return Ok(candidate.to_decimal_string(precision));
        }

        let adjusted = self.adjuster.adjust(candidate, product, context);
        Ok(adjusted.to_decimal_string(precision))
    }

    /// Builds the settings page schema with the host's catalog choices.
    pub fn settings_page(
        &self,
        categories: Vec<SelectOption>,
        products: Vec<SelectOption>,
    ) -> SettingsPage {
        settings::settings_page(categories, products)
    }

    /// Handles the settings page save action.
    pub fn save_settings(&self, submission: &SettingsSubmission) -> PluginResult<DiscountConfig> {
        Ok(settings::save_settings(self.store.as_ref(), submission)?)
    }

    /// Current discount settings.
    pub fn discount_config(&self) -> DiscountConfig {
        DiscountConfig::load(self.store.as_ref())
    }

    /// Resolves a price with a full breakdown, for previews and reports.
    pub fn quote(&self, candidate: Money, product: &Product, context: PriceContext) -> PriceQuote {
        self.resolver
            .quote(candidate, product, &self.discount_config(), context)
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Hooks the plugin subscribes to on install.
    pub fn price_hooks(&self) -> &[PriceHook] {
        &self.hooks
    }
}
