//! Pipeline configuration loader.

use std::path::Path;

use effect_core::PipelineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for pipeline configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`PipelineConfig`] from a TOML file.
    ///
    /// Missing keys keep their defaults. Grid sizes must be finite and
    /// positive.
    pub fn load(path: &Path) -> LoadResult<PipelineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<PipelineConfig> {
        let config: PipelineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid pipeline config: {}", e))?;

        Ok(config)
    }
}
