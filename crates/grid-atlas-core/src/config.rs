use serde::{Deserialize, Serialize};

/// Largest width or height an atlas may have, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 4096;
/// Empty pixels between neighbouring sprites and around the canvas border.
pub const DEFAULT_PADDING: u32 = 2;

/// Grid packing configuration. Passed by value to every packing call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackerConfig {
    /// Hard ceiling on both canvas width and height.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    /// Pixels between cells and around the canvas border.
    #[serde(default = "default_padding")]
    pub padding: u32,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            padding: default_padding(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// A zero `max_dimension` is rejected. Padding that leaves no room for a
    /// cell is reported later as `TooLarge`, once the cell size is known.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        if self.max_dimension == 0 {
            return Err(AtlasError::InvalidDimensions {
                max_dimension: self.max_dimension,
            });
        }
        Ok(())
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

fn default_max_dimension() -> u32 {
    DEFAULT_MAX_DIMENSION
}
fn default_padding() -> u32 {
    DEFAULT_PADDING
}

/// Builder for `PackerConfig`.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn max_dimension(mut self, v: u32) -> Self {
        self.cfg.max_dimension = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_card_sheet_settings() {
        let cfg = PackerConfig::default();
        assert_eq!(cfg.max_dimension, 4096);
        assert_eq!(cfg.padding, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: PackerConfig = serde_json::from_str(r#"{"padding": 0}"#).unwrap();
        assert_eq!(cfg.padding, 0);
        assert_eq!(cfg.max_dimension, DEFAULT_MAX_DIMENSION);
    }
}
