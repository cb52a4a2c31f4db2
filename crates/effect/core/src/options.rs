//! Declarative effect options and their builder.
//!
//! [`EffectOptions`] is the immutable input of the transform pipeline. Build it
//! with [`EffectOptions::builder`], which mirrors the chained configuration
//! calls of an effect declaration, or with a struct literal over
//! [`EffectOptions::new`]. Either way the pipeline re-validates before use.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use thiserror::Error;

use crate::env::TemplateData;
use crate::geometry::Point;
use crate::hooks::OverrideHook;
use crate::location::LocationRef;

/// Asset path, or a list of variants one of which is picked per run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AssetSource {
    Single(String),
    Variants(Vec<String>),
}

impl AssetSource {
    pub fn variants<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Variants(paths.into_iter().map(Into::into).collect())
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Single(path) => path.is_empty(),
            Self::Variants(paths) => paths.is_empty() || paths.iter().any(String::is_empty),
        }
    }
}

impl From<&str> for AssetSource {
    fn from(path: &str) -> Self {
        Self::Single(path.to_owned())
    }
}

impl From<String> for AssetSource {
    fn from(path: String) -> Self {
        Self::Single(path)
    }
}

impl From<Vec<String>> for AssetSource {
    fn from(paths: Vec<String>) -> Self {
        Self::Variants(paths)
    }
}

/// How an effect with a target relates to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TargetMode {
    /// Rotate toward the target and stretch the sprite to reach it.
    #[default]
    Stretch,
    /// Rotate toward the target only; sprite length is untouched.
    RotateOnly,
}

/// Scale multiplier applied after grid normalization.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ScaleSpec {
    /// Same factor on both axes.
    Uniform(f64),
    /// A single factor drawn uniformly from `[min, max)` per run, applied to
    /// both axes.
    Range(f64, f64),
    /// Explicit factor per axis.
    PerAxis(Point),
}

impl ScaleSpec {
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range(min, max)
    }

    pub fn per_axis(x: f64, y: f64) -> Self {
        Self::PerAxis(Point::new(x, y))
    }
}

impl Default for ScaleSpec {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

bitflags! {
    /// Axes that are mirrored at random (each independently, 50/50).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MirrorAxes: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
    }
}

/// Pixels reserved at each end of a sprite for reach calculations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrimPoints {
    pub start: f64,
    pub end: f64,
}

impl TrimPoints {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Malformed or contradictory effect options.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("effect has no asset path")]
    MissingAsset,

    #[error("grid size must be positive, got {0}")]
    InvalidGridSize(f64),

    #[error("trim points must be non-negative, got start {start} end {end}")]
    NegativeTrim { start: f64, end: f64 },

    #[error("trim points {start}+{end} consume the whole {width}px sprite")]
    DegenerateTrim { width: u32, start: f64, end: f64 },

    #[error("scale range is inverted: {min} > {max}")]
    InvertedScaleRange { min: f64, max: f64 },

    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    #[error("playback rate must be positive, got {0}")]
    InvalidPlaybackRate(f64),

    #[error("effect must run at least once")]
    ZeroRepeats,

    #[error("effect has a target but no origin")]
    TargetWithoutOrigin,

    #[error("entity size must be positive, got {width}x{height} grid units")]
    InvalidEntitySize { width: f64, height: f64 },

    #[error("template distance must be non-negative, got {0}")]
    InvalidTemplateDistance(f64),
}

impl OptionsError {
    pub fn error_code(&self) -> &'static str {
        use OptionsError::*;
        match self {
            MissingAsset => "OPTIONS_MISSING_ASSET",
            InvalidGridSize(_) => "OPTIONS_INVALID_GRID_SIZE",
            NegativeTrim { .. } => "OPTIONS_NEGATIVE_TRIM",
            DegenerateTrim { .. } => "OPTIONS_DEGENERATE_TRIM",
            InvertedScaleRange { .. } => "OPTIONS_INVERTED_SCALE_RANGE",
            NonFinite { .. } => "OPTIONS_NON_FINITE",
            InvalidPlaybackRate(_) => "OPTIONS_INVALID_PLAYBACK_RATE",
            ZeroRepeats => "OPTIONS_ZERO_REPEATS",
            TargetWithoutOrigin => "OPTIONS_TARGET_WITHOUT_ORIGIN",
            InvalidEntitySize { .. } => "OPTIONS_INVALID_ENTITY_SIZE",
            InvalidTemplateDistance(_) => "OPTIONS_INVALID_TEMPLATE_DISTANCE",
        }
    }
}

/// Immutable description of one effect.
#[derive(Clone)]
pub struct EffectOptions {
    pub asset: AssetSource,
    /// Name under which this effect's position is recorded for later effects.
    pub name: Option<String>,
    pub origin: Option<LocationRef>,
    pub target: Option<LocationRef>,
    pub target_mode: TargetMode,
    /// Land near the target (or near the origin when there is no target).
    pub missed: bool,
    pub scale: ScaleSpec,
    /// Explicit anchor; `None` lets the pipeline pick one.
    pub anchor: Option<Point>,
    pub random_rotation: bool,
    pub random_mirror: MirrorAxes,
    pub trim: TrimPoints,
    /// Grid size the asset was authored against; `None` uses the config default.
    pub grid_size: Option<f64>,
    pub playback_rate: f64,
    /// Milliseconds.
    pub fade_in: u64,
    /// Milliseconds.
    pub fade_out: u64,
    /// Milliseconds.
    pub duration: Option<u64>,
    /// Context for `{{key}}` placeholders in the asset path.
    pub template_data: Option<TemplateData>,
    /// Overrides the configured base path.
    pub base_folder: Option<String>,
    /// Repetitions run by the owning sequence.
    pub repeats: usize,
    pub pre_scale_hooks: Vec<Arc<dyn OverrideHook>>,
    pub post_path_hooks: Vec<Arc<dyn OverrideHook>>,
}

impl EffectOptions {
    /// Options with every setting at its default.
    pub fn new(asset: impl Into<AssetSource>) -> Self {
        Self {
            asset: asset.into(),
            name: None,
            origin: None,
            target: None,
            target_mode: TargetMode::default(),
            missed: false,
            scale: ScaleSpec::default(),
            anchor: None,
            random_rotation: false,
            random_mirror: MirrorAxes::empty(),
            trim: TrimPoints::default(),
            grid_size: None,
            playback_rate: 1.0,
            fade_in: 0,
            fade_out: 0,
            duration: None,
            template_data: None,
            base_folder: None,
            repeats: 1,
            pre_scale_hooks: Vec::new(),
            post_path_hooks: Vec::new(),
        }
    }

    pub fn builder(asset: impl Into<AssetSource>) -> EffectOptionsBuilder {
        EffectOptionsBuilder {
            options: Self::new(asset),
        }
    }

    /// Checks everything that can be checked without touching assets.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.asset.is_empty() {
            return Err(OptionsError::MissingAsset);
        }

        if let Some(grid_size) = self.grid_size
            && !(grid_size.is_finite() && grid_size > 0.0)
        {
            return Err(OptionsError::InvalidGridSize(grid_size));
        }

        if !(self.trim.start.is_finite() && self.trim.end.is_finite()) {
            return Err(OptionsError::NonFinite { field: "trim" });
        }
        if self.trim.start < 0.0 || self.trim.end < 0.0 {
            return Err(OptionsError::NegativeTrim {
                start: self.trim.start,
                end: self.trim.end,
            });
        }

        match self.scale {
            ScaleSpec::Uniform(v) if !v.is_finite() => {
                return Err(OptionsError::NonFinite { field: "scale" });
            }
            ScaleSpec::Range(min, max) => {
                if !(min.is_finite() && max.is_finite()) {
                    return Err(OptionsError::NonFinite { field: "scale" });
                }
                if min > max {
                    return Err(OptionsError::InvertedScaleRange { min, max });
                }
            }
            ScaleSpec::PerAxis(p) if !p.is_finite() => {
                return Err(OptionsError::NonFinite { field: "scale" });
            }
            _ => {}
        }

        if let Some(anchor) = self.anchor
            && !anchor.is_finite()
        {
            return Err(OptionsError::NonFinite { field: "anchor" });
        }

        if !(self.playback_rate.is_finite() && self.playback_rate > 0.0) {
            return Err(OptionsError::InvalidPlaybackRate(self.playback_rate));
        }

        if self.repeats == 0 {
            return Err(OptionsError::ZeroRepeats);
        }

        if self.target.is_some() && self.origin.is_none() {
            return Err(OptionsError::TargetWithoutOrigin);
        }

        for location in self.origin.iter().chain(&self.target) {
            validate_location(location)?;
        }

        Ok(())
    }
}

/// Footprint-bearing locations need a usable extent for missed offsets.
fn validate_location(location: &LocationRef) -> Result<(), OptionsError> {
    match location {
        LocationRef::Point(point) if !point.is_finite() => {
            Err(OptionsError::NonFinite { field: "location" })
        }
        LocationRef::Entity(entity) => {
            let positive = |v: f64| v.is_finite() && v > 0.0;
            if !entity.center.is_finite() {
                return Err(OptionsError::NonFinite { field: "location" });
            }
            if !(positive(entity.width) && positive(entity.height)) {
                return Err(OptionsError::InvalidEntitySize {
                    width: entity.width,
                    height: entity.height,
                });
            }
            Ok(())
        }
        LocationRef::Template(template) => {
            if !(template.origin.is_finite() && template.direction.is_finite()) {
                return Err(OptionsError::NonFinite { field: "location" });
            }
            if !(template.distance.is_finite() && template.distance >= 0.0) {
                return Err(OptionsError::InvalidTemplateDistance(template.distance));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

impl fmt::Debug for EffectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hook_names = |hooks: &[Arc<dyn OverrideHook>]| -> Vec<String> {
            hooks.iter().map(|h| h.name().to_owned()).collect()
        };
        f.debug_struct("EffectOptions")
            .field("asset", &self.asset)
            .field("name", &self.name)
            .field("origin", &self.origin)
            .field("target", &self.target)
            .field("target_mode", &self.target_mode)
            .field("missed", &self.missed)
            .field("scale", &self.scale)
            .field("anchor", &self.anchor)
            .field("random_rotation", &self.random_rotation)
            .field("random_mirror", &self.random_mirror)
            .field("trim", &self.trim)
            .field("grid_size", &self.grid_size)
            .field("playback_rate", &self.playback_rate)
            .field("fade_in", &self.fade_in)
            .field("fade_out", &self.fade_out)
            .field("duration", &self.duration)
            .field("template_data", &self.template_data)
            .field("base_folder", &self.base_folder)
            .field("repeats", &self.repeats)
            .field("pre_scale_hooks", &hook_names(&self.pre_scale_hooks))
            .field("post_path_hooks", &hook_names(&self.post_path_hooks))
            .finish()
    }
}

/// Chained configuration for [`EffectOptions`].
#[must_use]
pub struct EffectOptionsBuilder {
    options: EffectOptions,
}

impl EffectOptionsBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    /// Where the effect plays (or starts, when it has a target).
    pub fn at(mut self, origin: impl Into<LocationRef>) -> Self {
        self.options.origin = Some(origin.into());
        self
    }

    /// Stretch from the origin to `target`.
    pub fn stretch_to(mut self, target: impl Into<LocationRef>) -> Self {
        self.options.target = Some(target.into());
        self.options.target_mode = TargetMode::Stretch;
        self
    }

    /// Face `target` without stretching.
    pub fn rotate_towards(mut self, target: impl Into<LocationRef>) -> Self {
        self.options.target = Some(target.into());
        self.options.target_mode = TargetMode::RotateOnly;
        self
    }

    pub fn missed(mut self, missed: bool) -> Self {
        self.options.missed = missed;
        self
    }

    pub fn scale(mut self, scale: ScaleSpec) -> Self {
        self.options.scale = scale;
        self
    }

    pub fn anchor(mut self, x: f64, y: f64) -> Self {
        self.options.anchor = Some(Point::new(x, y));
        self
    }

    pub fn random_rotation(mut self, enabled: bool) -> Self {
        self.options.random_rotation = enabled;
        self
    }

    pub fn random_mirror_x(mut self, enabled: bool) -> Self {
        self.options.random_mirror.set(MirrorAxes::X, enabled);
        self
    }

    pub fn random_mirror_y(mut self, enabled: bool) -> Self {
        self.options.random_mirror.set(MirrorAxes::Y, enabled);
        self
    }

    pub fn trim(mut self, start: f64, end: f64) -> Self {
        self.options.trim = TrimPoints::new(start, end);
        self
    }

    /// Grid size the asset was authored against.
    pub fn grid_size(mut self, grid_size: f64) -> Self {
        self.options.grid_size = Some(grid_size);
        self
    }

    pub fn playback_rate(mut self, rate: f64) -> Self {
        self.options.playback_rate = rate;
        self
    }

    pub fn fade_in(mut self, ms: u64) -> Self {
        self.options.fade_in = ms;
        self
    }

    pub fn fade_out(mut self, ms: u64) -> Self {
        self.options.fade_out = ms;
        self
    }

    pub fn duration(mut self, ms: u64) -> Self {
        self.options.duration = Some(ms);
        self
    }

    pub fn template_data(mut self, data: TemplateData) -> Self {
        self.options.template_data = Some(data);
        self
    }

    pub fn base_folder(mut self, prefix: impl Into<String>) -> Self {
        self.options.base_folder = Some(prefix.into());
        self
    }

    pub fn repeats(mut self, repeats: usize) -> Self {
        self.options.repeats = repeats;
        self
    }

    pub fn pre_scale_hook(mut self, hook: impl OverrideHook + 'static) -> Self {
        self.options.pre_scale_hooks.push(Arc::new(hook));
        self
    }

    pub fn post_path_hook(mut self, hook: impl OverrideHook + 'static) -> Self {
        self.options.post_path_hooks.push(Arc::new(hook));
        self
    }

    pub fn build(self) -> Result<EffectOptions, OptionsError> {
        self.options.validate()?;
        Ok(self.options)
    }
}
