//! # Plugin Configuration
//!
//! Host-level parameters for the discount plugin. The discount values
//! themselves live in the host's settings store, not here.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     DISCOUNT_PRICE_DECIMALS=2                                           │
//! │     DISCOUNT_NO_MATCH=candidate_price                                   │
//! │     DISCOUNT_HOOK_PRIORITY=20                                           │
//! │     DISCOUNT_HOOKS=display_price,sale_price                             │
//! │     DISCOUNT_LOG=debug                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/discount/discount.toml (Linux)                            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! price_decimals = 2
//! no_match = "regular_price"   # regular_price | candidate_price
//!
//! [hooks]
//! priority = 20
//! names = ["display_price", "sale_price"]
//!
//! [logging]
//! filter = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use discount_core::money::CurrencyPrecision;
use discount_core::pipeline::DEFAULT_PRIORITY;
use discount_core::{NoMatchFallback, PriceHook, PriceResolver};

use crate::error::{PluginError, PluginResult};

// =============================================================================
// Sections
// =============================================================================

/// How prices are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Decimals the host rounds prices to (0..=6).
    #[serde(default = "default_price_decimals")]
    pub price_decimals: u8,

    /// What to return when no discount rule matches a product.
    #[serde(default)]
    pub no_match: NoMatchFallback,
}

fn default_price_decimals() -> u8 {
    2
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            price_decimals: default_price_decimals(),
            no_match: NoMatchFallback::default(),
        }
    }
}

/// Price hook subscription settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSettings {
    /// Priority for the price hooks. Lower runs earlier.
    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Host hook names to subscribe to, e.g. `display_price`.
    #[serde(default = "default_hook_names")]
    pub names: Vec<String>,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

fn default_hook_names() -> Vec<String> {
    PriceHook::ALL.iter().map(ToString::to_string).collect()
}

impl Default for HookSettings {
    fn default() -> Self {
        HookSettings {
            priority: default_priority(),
            names: default_hook_names(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,discount_core=info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Plugin Config
// =============================================================================

/// Complete plugin configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub hooks: HookSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl PluginConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (discount.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> PluginResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading discount plugin config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load discount plugin config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> PluginResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| PluginError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Discount plugin config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PluginResult<()> {
        if self.pricing.price_decimals > CurrencyPrecision::MAX_DECIMALS {
            return Err(PluginError::InvalidConfig(format!(
                "price_decimals must be at most {}, got {}",
                CurrencyPrecision::MAX_DECIMALS,
                self.pricing.price_decimals
            )));
        }

        self.price_hooks()?;

        if self.logging.filter.trim().is_empty() {
            return Err(PluginError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `DISCOUNT_*` overrides read through `var`.
    ///
    /// Unparseable values are logged and ignored.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(decimals) = var("DISCOUNT_PRICE_DECIMALS") {
            match decimals.trim().parse::<u8>() {
                Ok(d) => {
                    debug!(decimals = d, "Overriding price decimals from environment");
                    self.pricing.price_decimals = d;
                }
                Err(_) => warn!(value = %decimals, "Ignoring invalid DISCOUNT_PRICE_DECIMALS"),
            }
        }

        if let Some(mode) = var("DISCOUNT_NO_MATCH") {
            match mode.trim().parse::<NoMatchFallback>() {
                Ok(parsed) => {
                    debug!(mode = %mode, "Overriding no-match fallback from environment");
                    self.pricing.no_match = parsed;
                }
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(priority) = var("DISCOUNT_HOOK_PRIORITY") {
            match priority.trim().parse::<i32>() {
                Ok(p) => {
                    debug!(priority = p, "Overriding hook priority from environment");
                    self.hooks.priority = p;
                }
                Err(_) => warn!(value = %priority, "Ignoring invalid DISCOUNT_HOOK_PRIORITY"),
            }
        }

        if let Some(hooks) = var("DISCOUNT_HOOKS") {
            debug!(hooks = %hooks, "Overriding price hooks from environment");
            self.hooks.names = hooks
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(filter) = var("DISCOUNT_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tiered", "discount")
            .map(|dirs| dirs.config_dir().join("discount.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The host's price precision.
    pub fn precision(&self) -> PluginResult<CurrencyPrecision> {
        CurrencyPrecision::new(self.pricing.price_decimals)
            .map_err(|e| PluginError::InvalidConfig(e.to_string()))
    }

    /// Builds the resolver described by this config.
    pub fn resolver(&self) -> PluginResult<PriceResolver> {
        Ok(PriceResolver::new(self.precision()?).with_fallback(self.pricing.no_match))
    }

    /// Priority for the price hooks.
    pub fn hook_priority(&self) -> i32 {
        self.hooks.priority
    }

    /// Parses the configured hook names, without duplicates.
    ///
    /// An unknown name fails with [`discount_core::CoreError::UnknownHook`].
    pub fn price_hooks(&self) -> PluginResult<Vec<PriceHook>> {
        let mut hooks = Vec::with_capacity(self.hooks.names.len());
        for name in &self.hooks.names {
            let hook: PriceHook = name.trim().parse()?;
            if !hooks.contains(&hook) {
                hooks.push(hook);
            }
        }
        Ok(hooks)
    }
}
