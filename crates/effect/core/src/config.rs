//! Pipeline configuration and its environment overlay.

use std::env;

use crate::options::OptionsError;

/// Pipeline configuration shared by every effect of a sequence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Grid size of the active scene in pixels.
    ///
    /// Sprites are normalized onto this grid, and missed-offset sampling
    /// measures its margins in units of it.
    pub grid_size: f64,
    /// Grid size assumed for effects that do not configure their own.
    pub default_effect_grid_size: f64,
    /// Parse `_<w>x<h>` suffixes in asset names instead of probing assets.
    pub structured_asset_names: bool,
    /// Prefix prepended to asset paths of effects without a base folder.
    pub base_path: String,
}

impl PipelineConfig {
    pub const DEFAULT_GRID_SIZE: f64 = 100.0;

    pub fn new() -> Self {
        Self {
            grid_size: Self::DEFAULT_GRID_SIZE,
            default_effect_grid_size: Self::DEFAULT_GRID_SIZE,
            structured_asset_names: false,
            base_path: String::new(),
        }
    }

    pub fn with_grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_structured_asset_names(mut self, enabled: bool) -> Self {
        self.structured_asset_names = enabled;
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Overlay process environment variables onto this configuration.
    ///
    /// Environment variables:
    /// - `EFFECT_GRID_SIZE` - Scene grid size in pixels
    /// - `EFFECT_DEFAULT_GRID_SIZE` - Grid size of effects that set none
    /// - `EFFECT_STRUCTURED_ASSET_NAMES` - Parse dimensions from asset names
    /// - `EFFECT_BASE_PATH` - Default asset path prefix
    ///
    /// Missing or unparsable values leave the current setting untouched.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides), reading
    /// values through `lookup` instead of the process environment.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(size) = parse_var::<f64>(&lookup, "EFFECT_GRID_SIZE").filter(|s| is_grid(*s))
        {
            self.grid_size = size;
        }

        if let Some(size) =
            parse_var::<f64>(&lookup, "EFFECT_DEFAULT_GRID_SIZE").filter(|s| is_grid(*s))
        {
            self.default_effect_grid_size = size;
        }

        if let Some(enable) = parse_var::<bool>(&lookup, "EFFECT_STRUCTURED_ASSET_NAMES") {
            self.structured_asset_names = enable;
        }

        if let Some(base_path) = lookup("EFFECT_BASE_PATH") {
            self.base_path = base_path;
        }

        self
    }

    /// Both grid sizes must be finite and positive.
    pub fn validate(&self) -> Result<(), OptionsError> {
        for size in [self.grid_size, self.default_effect_grid_size] {
            if !is_grid(size) {
                return Err(OptionsError::InvalidGridSize(size));
            }
        }
        Ok(())
    }

    /// Defaults overlaid with process environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

fn is_grid(size: f64) -> bool {
    size.is_finite() && size > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overlay(pairs: &[(&str, &str)]) -> PipelineConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        PipelineConfig::default().with_overrides_from(|key| vars.get(key).cloned())
    }

    #[test]
    fn valid_values_override_defaults() {
        let config = overlay(&[
            ("EFFECT_GRID_SIZE", "140"),
            ("EFFECT_DEFAULT_GRID_SIZE", " 200.5 "),
            ("EFFECT_STRUCTURED_ASSET_NAMES", "true"),
            ("EFFECT_BASE_PATH", "modules/jb2a"),
        ]);
        assert_eq!(config.grid_size, 140.0);
        assert_eq!(config.default_effect_grid_size, 200.5);
        assert!(config.structured_asset_names);
        assert_eq!(config.base_path, "modules/jb2a");
    }

    #[test]
    fn bad_values_keep_defaults() {
        let config = overlay(&[
            ("EFFECT_GRID_SIZE", "0"),
            ("EFFECT_DEFAULT_GRID_SIZE", "big"),
            ("EFFECT_STRUCTURED_ASSET_NAMES", "sometimes"),
        ]);
        assert_eq!(config, PipelineConfig::default());

        let config = overlay(&[("EFFECT_GRID_SIZE", "-50"), ("EFFECT_DEFAULT_GRID_SIZE", "NaN")]);
        assert_eq!(config.grid_size, PipelineConfig::DEFAULT_GRID_SIZE);
        assert_eq!(
            config.default_effect_grid_size,
            PipelineConfig::DEFAULT_GRID_SIZE
        );
    }

    #[test]
    fn missing_values_keep_defaults() {
        assert_eq!(overlay(&[]), PipelineConfig::default());
    }

    #[test]
    fn validate_rejects_degenerate_grids() {
        assert!(PipelineConfig::default().validate().is_ok());
        assert_eq!(
            PipelineConfig::default().with_grid_size(0.0).validate(),
            Err(OptionsError::InvalidGridSize(0.0))
        );

        let config = PipelineConfig {
            default_effect_grid_size: -10.0,
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(OptionsError::InvalidGridSize(-10.0)));

        let config = PipelineConfig::default().with_grid_size(f64::INFINITY);
        assert!(config.validate().is_err());
    }
}
