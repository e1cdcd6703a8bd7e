//! # Plugin Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐  │
//! │  │  Configuration  │  │   File / TOML   │  │      Domain             │  │
//! │  │                 │  │                 │  │                         │  │
//! │  │  InvalidConfig  │  │  Io             │  │  Core (settings save)   │  │
//! │  │  ConfigSave...  │  │  TomlParse      │  │                         │  │
//! │  │                 │  │  TomlSerialize  │  │                         │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use discount_core::CoreError;
use thiserror::Error;

/// Result type alias for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors raised while configuring or operating the plugin.
#[derive(Debug, Error)]
pub enum PluginError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid plugin configuration.
    #[error("Invalid discount plugin configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // File / Format Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Error from the pricing core (e.g. a rejected settings submission).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PluginError {
    /// Returns true if the error was caused by admin input rather than the
    /// environment, so it can be shown next to the form.
    pub fn is_user_error(&self) -> bool {
        matches!(self, PluginError::Core(CoreError::Validation(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use discount_core::ValidationError;

    #[test]
    fn test_error_display() {
        let err = PluginError::InvalidConfig("price_decimals must be at most 6".into());
        assert_eq!(
            err.to_string(),
            "Invalid discount plugin configuration: price_decimals must be at most 6"
        );
    }

    #[test]
    fn test_user_error_classification() {
        let err: PluginError = CoreError::from(ValidationError::Required {
            field: "price".into(),
        })
        .into();
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "Validation error: price is required");

        let io: PluginError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(!io.is_user_error());
    }
}
