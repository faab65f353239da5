//! Engine configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Id of the generated stylesheet element
pub const DEFAULT_STYLE_ELEMENT_ID: &str = "dynamic-theme-styles";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration could not be parsed
    #[error("Invalid engine config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Stylesheet id was empty
    #[error("Style element id must not be empty")]
    EmptyStyleElementId,
}

/// Theme engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Id of the style element that receives generated override CSS
    pub style_element_id: String,
    /// Emit overrides that make legacy hardcoded accent classes follow the
    /// primary color
    pub legacy_accent_overrides: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            style_element_id: DEFAULT_STYLE_ELEMENT_ID.to_string(),
            legacy_accent_overrides: true,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generated stylesheet id
    pub fn style_element_id(mut self, id: impl Into<String>) -> Self {
        self.style_element_id = id.into();
        self
    }

    /// Enable or disable legacy accent overrides
    pub fn legacy_accent_overrides(mut self, enabled: bool) -> Self {
        self.legacy_accent_overrides = enabled;
        self
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.style_element_id.trim().is_empty() {
            return Err(ConfigError::EmptyStyleElementId);
        }
        Ok(())
    }
}
