//! Effect sequence loader.
//!
//! A sequence file lists effects in the order they are finalized:
//!
//! ```toml
//! [[effects]]
//! asset = "spells/cast_{{color}}.webm"
//! name = "cast"
//! origin = { point = { x = 200.0, y = 300.0 } }
//! template = { color = "blue" }
//!
//! [[effects]]
//! asset = ["bolt_a_400x100.webm", "bolt_b_400x100.webm"]
//! origin = { name = "cast" }
//! target = { entity = { center = { x = 800.0, y = 300.0 }, width = 2.0, height = 2.0 } }
//! missed = true
//! repeats = 3
//! ```
//!
//! The same structure is accepted in RON (files ending in `.ron`).

use std::collections::BTreeMap;
use std::path::Path;

use effect_core::{AssetSource, EffectOptions, LocationRef, Point, ScaleSpec, TargetMode};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Top-level layout of a sequence file.
#[derive(Debug, Clone, Deserialize)]
pub struct SequenceFile {
    #[serde(default)]
    pub effects: Vec<EffectEntry>,
}

/// One effect as written in a sequence file.
///
/// Mirrors the options builder; every field except `asset` is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectEntry {
    pub asset: AssetSource,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub origin: Option<LocationRef>,
    #[serde(default)]
    pub target: Option<LocationRef>,
    #[serde(default)]
    pub mode: TargetMode,
    #[serde(default)]
    pub missed: bool,
    #[serde(default)]
    pub scale: Option<ScaleSpec>,
    #[serde(default)]
    pub anchor: Option<Point>,
    #[serde(default)]
    pub random_rotation: bool,
    #[serde(default)]
    pub mirror_x: bool,
    #[serde(default)]
    pub mirror_y: bool,
    /// `[start, end]` pixels reserved at each end of the sprite.
    #[serde(default)]
    pub trim: Option<(f64, f64)>,
    #[serde(default)]
    pub grid_size: Option<f64>,
    #[serde(default)]
    pub playback_rate: Option<f64>,
    #[serde(default)]
    pub fade_in: u64,
    #[serde(default)]
    pub fade_out: u64,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub template: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub base_folder: Option<String>,
    #[serde(default)]
    pub repeats: Option<usize>,
}

impl EffectEntry {
    /// Builds validated options from this entry.
    pub fn into_options(self) -> LoadResult<EffectOptions> {
        let mut builder = EffectOptions::builder(self.asset)
            .missed(self.missed)
            .random_rotation(self.random_rotation)
            .random_mirror_x(self.mirror_x)
            .random_mirror_y(self.mirror_y)
            .fade_in(self.fade_in)
            .fade_out(self.fade_out);

        if let Some(name) = self.name {
            builder = builder.name(name);
        }
        if let Some(origin) = self.origin {
            builder = builder.at(origin);
        }
        if let Some(target) = self.target {
            builder = match self.mode {
                TargetMode::Stretch => builder.stretch_to(target),
                TargetMode::RotateOnly => builder.rotate_towards(target),
            };
        }
        if let Some(scale) = self.scale {
            builder = builder.scale(scale);
        }
        if let Some(anchor) = self.anchor {
            builder = builder.anchor(anchor.x, anchor.y);
        }
        if let Some((start, end)) = self.trim {
            builder = builder.trim(start, end);
        }
        if let Some(grid_size) = self.grid_size {
            builder = builder.grid_size(grid_size);
        }
        if let Some(rate) = self.playback_rate {
            builder = builder.playback_rate(rate);
        }
        if let Some(ms) = self.duration {
            builder = builder.duration(ms);
        }
        if let Some(data) = self.template {
            builder = builder.template_data(data);
        }
        if let Some(prefix) = self.base_folder {
            builder = builder.base_folder(prefix);
        }
        if let Some(repeats) = self.repeats {
            builder = builder.repeats(repeats);
        }

        Ok(builder.build()?)
    }
}

/// Loader for effect sequences from TOML or RON files.
pub struct SequenceLoader;

impl SequenceLoader {
    /// Load every effect of a sequence file, in file order.
    ///
    /// The format is picked by extension: `.ron` is RON, anything else TOML.
    pub fn load(path: &Path) -> LoadResult<Vec<EffectOptions>> {
        let content = read_file(path)?;
        let file = match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Self::parse_ron(&content)?,
            _ => Self::parse_toml(&content)?,
        };
        Self::into_options(file)
    }

    pub fn parse_toml(content: &str) -> LoadResult<SequenceFile> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse sequence TOML: {}", e))
    }

    pub fn parse_ron(content: &str) -> LoadResult<SequenceFile> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse sequence RON: {}", e))
    }

    pub fn into_options(file: SequenceFile) -> LoadResult<Vec<EffectOptions>> {
        file.effects
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let label = entry.name.clone().unwrap_or_else(|| format!("#{index}"));
                entry
                    .into_options()
                    .map_err(|e| anyhow::anyhow!("Invalid effect {}: {}", label, e))
            })
            .collect()
    }
}
