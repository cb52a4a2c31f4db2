//! Transform pipeline: effect options in, render descriptor out.
//!
//! [`TransformPipeline::finalize`] runs a fixed sequence of steps:
//!
//! ```text
//! identity descriptor
//!   → explicit anchor
//!   → origin (missed applies here only without a target), default anchor
//!   → target (missed applies here), trailing-edge anchor, distance/rotation
//!   → random rotation
//!   → pre-scale hooks
//!   → variant choice → path template
//!   → grid normalization
//!   → hit vector (stretch mode, non-zero distance)
//!   → scale spec → random mirroring
//!   → base folder prefix
//!   → post-path hooks
//!   → record position under the effect name
//! ```
//!
//! The only suspension points are asset measurement on a cache miss and
//! hook invocation. Given the same options, caches and random source state,
//! the output is bit-identical.

use std::f64::consts::PI;
use std::sync::Arc;

use effect_core::{
    AssetDimensions, AssetSource, EffectOptions, HookContext, HookStage, LocationRole,
    MirrorAxes, OptionsError, PipelineConfig, Point, RandomSource, RenderDescriptor, ScaleSpec,
    TargetMode, TrimPoints, distance_and_angle, file_stem, parse_structured_dimensions,
};
use tracing::{debug, warn};

use crate::api::{PipelineError, Result};
use crate::hooks::HookChain;
use crate::oracle::Collaborators;
use crate::repository::{AssetDimensionCache, NamedPositionCache};
use crate::resolver::LocationResolver;

/// Lower bound for the vertical scale of a stretched sprite.
pub const HIT_VECTOR_MIN_SCALE_Y: f64 = 0.4;

/// Name recorded for effects with neither a name nor a usable file stem.
pub const UNNAMED_EFFECT: &str = "<unnamed>";

/// Resolves effect options into render descriptors for one sequence.
///
/// Owns (shares, via `Arc`) the sequence's two caches. Build one pipeline per
/// sequence; independent sequences must not share caches.
pub struct TransformPipeline {
    config: PipelineConfig,
    collaborators: Collaborators,
    dimensions: Arc<AssetDimensionCache>,
    positions: Arc<NamedPositionCache>,
}

impl TransformPipeline {
    pub fn builder(collaborators: Collaborators) -> TransformPipelineBuilder {
        TransformPipelineBuilder::new(collaborators)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn dimensions(&self) -> &Arc<AssetDimensionCache> {
        &self.dimensions
    }

    pub fn positions(&self) -> &Arc<NamedPositionCache> {
        &self.positions
    }

    /// Produces the render descriptor for one repetition of `options`.
    ///
    /// Records the resulting position under the effect's name so later
    /// effects of the sequence can reference it.
    pub async fn finalize(
        &self,
        options: &EffectOptions,
        repetition: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<RenderDescriptor> {
        self.config.validate()?;
        options.validate()?;

        let mut descriptor =
            RenderDescriptor::identity(options.playback_rate, options.fade_in, options.fade_out);
        descriptor.duration = options.duration;

        if let Some(anchor) = options.anchor {
            descriptor.anchor = anchor;
        }

        self.place(options, repetition, rng, &mut descriptor)?;

        if options.random_rotation {
            descriptor.rotation += rng.uniform_float(0.0, PI);
        }

        descriptor = self
            .run_hooks(HookStage::PreScale, options, repetition, descriptor)
            .await?;

        let chosen = choose_asset(&options.asset, rng);
        descriptor.path = match &options.template_data {
            Some(data) => self
                .collaborators
                .templater
                .render(&chosen, data)
                .map_err(|source| PipelineError::Template {
                    template: chosen.clone(),
                    source,
                })?,
            None => chosen,
        };

        let effect_grid = options
            .grid_size
            .unwrap_or(self.config.default_effect_grid_size);
        descriptor.scale = descriptor.scale * (self.config.grid_size / effect_grid);

        if options.target_mode == TargetMode::Stretch && descriptor.distance != 0.0 {
            let asset_path = self.base_folder(options, &descriptor.path);
            let dimensions = self.dimensions_of(&asset_path).await?;
            apply_hit_vector(&mut descriptor, dimensions, options.trim)?;
        }

        let factor = match options.scale {
            ScaleSpec::Uniform(v) => Point::splat(v),
            ScaleSpec::Range(min, max) => Point::splat(rng.uniform_float(min, max)),
            ScaleSpec::PerAxis(p) => p,
        };
        descriptor.scale = Point::new(descriptor.scale.x * factor.x, descriptor.scale.y * factor.y);

        if options.random_mirror.contains(MirrorAxes::X) && rng.uniform_bool() {
            descriptor.scale.x = -descriptor.scale.x;
        }
        if options.random_mirror.contains(MirrorAxes::Y) && rng.uniform_bool() {
            descriptor.scale.y = -descriptor.scale.y;
        }

        descriptor.path = self.base_folder(options, &descriptor.path);

        descriptor = self
            .run_hooks(HookStage::PostPath, options, repetition, descriptor)
            .await?;

        let name = effect_name(options, &descriptor.path);
        self.positions
            .record(&name, repetition, descriptor.position)?;

        debug!(
            target: "effect_runtime::pipeline",
            name = %name,
            repetition,
            path = %descriptor.path,
            x = descriptor.position.x,
            y = descriptor.position.y,
            rotation = descriptor.rotation,
            distance = descriptor.distance,
            "finalized effect"
        );

        Ok(descriptor)
    }

    /// Origin and target placement: position, default anchors, distance and
    /// rotation.
    fn place(
        &self,
        options: &EffectOptions,
        repetition: usize,
        rng: &mut dyn RandomSource,
        descriptor: &mut RenderDescriptor,
    ) -> Result<()> {
        let Some(origin_ref) = &options.origin else {
            return Ok(());
        };

        let resolver = LocationResolver::new(&self.positions, self.config.grid_size);
        let origin = resolver.resolve(
            origin_ref,
            LocationRole::Origin,
            repetition,
            options.missed && options.target.is_none(),
            rng,
        )?;
        descriptor.position = origin;
        if options.anchor.is_none() {
            descriptor.anchor = Point::splat(0.5);
        }

        let Some(target_ref) = &options.target else {
            return Ok(());
        };

        let target = resolver.resolve(
            target_ref,
            LocationRole::Target,
            repetition,
            options.missed,
            rng,
        )?;
        if options.anchor.is_none() {
            descriptor.anchor = Point::new(0.0, 0.5);
        }

        let heading = distance_and_angle(origin, target);
        descriptor.distance = heading.distance;
        descriptor.rotation = heading.angle;
        Ok(())
    }

    async fn run_hooks(
        &self,
        stage: HookStage,
        options: &EffectOptions,
        repetition: usize,
        descriptor: RenderDescriptor,
    ) -> Result<RenderDescriptor> {
        let hooks = match stage {
            HookStage::PreScale => &options.pre_scale_hooks,
            HookStage::PostPath => &options.post_path_hooks,
        };
        if hooks.is_empty() {
            return Ok(descriptor);
        }

        let ctx = HookContext {
            stage,
            options,
            repetition,
            config: &self.config,
            positions: self.positions.as_ref(),
        };
        HookChain::new(hooks).run(&ctx, descriptor).await
    }

    /// Pixel size of `path`: structured name, then cache, then probe.
    async fn dimensions_of(&self, path: &str) -> Result<AssetDimensions> {
        if self.config.structured_asset_names {
            if let Some(dimensions) = parse_structured_dimensions(path) {
                return Ok(dimensions);
            }
            warn!(
                target: "effect_runtime::pipeline",
                path,
                "asset name carries no size suffix, probing instead"
            );
        }

        if let Some(dimensions) = self.dimensions.get(path)? {
            return Ok(dimensions);
        }

        let dimensions = self
            .collaborators
            .probe
            .measure(path)
            .await
            .map_err(|source| PipelineError::AssetMeasurement {
                path: path.to_owned(),
                source,
            })?;
        debug!(
            target: "effect_runtime::pipeline",
            path,
            width = dimensions.x,
            height = dimensions.y,
            "measured asset"
        );
        self.dimensions.put(path, dimensions)?;
        Ok(dimensions)
    }

    fn base_folder(&self, options: &EffectOptions, path: &str) -> String {
        let prefix = options
            .base_folder
            .as_deref()
            .unwrap_or(&self.config.base_path);
        join_base(prefix, path)
    }
}

fn choose_asset(asset: &AssetSource, rng: &mut dyn RandomSource) -> String {
    match asset {
        AssetSource::Single(path) => path.clone(),
        AssetSource::Variants(paths) => paths[rng.pick_index(paths.len())].clone(),
    }
}

/// Stretches the sprite so its usable length spans `descriptor.distance`.
///
/// Assumes sprite art runs left to right with `trim` pixels reserved at each
/// end.
fn apply_hit_vector(
    descriptor: &mut RenderDescriptor,
    dimensions: AssetDimensions,
    trim: TrimPoints,
) -> Result<()> {
    let width = f64::from(dimensions.x);
    let true_length = width - trim.start - trim.end;
    if true_length <= 0.0 {
        return Err(OptionsError::DegenerateTrim {
            width: dimensions.x,
            start: trim.start,
            end: trim.end,
        }
        .into());
    }

    descriptor.scale.x = descriptor.distance / true_length;
    descriptor.scale.y = descriptor.scale.x.max(HIT_VECTOR_MIN_SCALE_Y);
    descriptor.anchor.x = trim.start / width;
    Ok(())
}

fn join_base(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn effect_name(options: &EffectOptions, path: &str) -> String {
    options
        .name
        .clone()
        .or_else(|| file_stem(path).map(str::to_owned))
        .unwrap_or_else(|| UNNAMED_EFFECT.to_owned())
}

/// Builder for [`TransformPipeline`].
pub struct TransformPipelineBuilder {
    config: PipelineConfig,
    collaborators: Collaborators,
    dimensions: Option<Arc<AssetDimensionCache>>,
}

impl TransformPipelineBuilder {
    fn new(collaborators: Collaborators) -> Self {
        Self {
            config: PipelineConfig::default(),
            collaborators,
            dimensions: None,
        }
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from a pre-filled dimension cache instead of an empty one.
    pub fn dimension_cache(mut self, cache: Arc<AssetDimensionCache>) -> Self {
        self.dimensions = Some(cache);
        self
    }

    pub fn build(self) -> TransformPipeline {
        TransformPipeline {
            config: self.config,
            collaborators: self.collaborators,
            dimensions: self.dimensions.unwrap_or_default(),
            positions: Arc::new(NamedPositionCache::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_vector_spans_distance() {
        let mut descriptor = RenderDescriptor {
            distance: 100.0,
            ..RenderDescriptor::default()
        };
        apply_hit_vector(
            &mut descriptor,
            AssetDimensions::new(200, 50),
            TrimPoints::default(),
        )
        .unwrap();
        assert_eq!(descriptor.scale, Point::new(0.5, 0.5));
        assert_eq!(descriptor.anchor.x, 0.0);
    }

    #[test]
    fn hit_vector_respects_trim_and_floor() {
        let mut descriptor = RenderDescriptor {
            distance: 60.0,
            ..RenderDescriptor::default()
        };
        apply_hit_vector(
            &mut descriptor,
            AssetDimensions::new(1000, 400),
            TrimPoints::new(200.0, 200.0),
        )
        .unwrap();
        assert!((descriptor.scale.x - 0.1).abs() < 1e-12);
        assert_eq!(descriptor.scale.y, HIT_VECTOR_MIN_SCALE_Y);
        assert_eq!(descriptor.anchor.x, 0.2);
    }

    #[test]
    fn degenerate_trim_is_a_configuration_error() {
        let mut descriptor = RenderDescriptor {
            distance: 10.0,
            ..RenderDescriptor::default()
        };
        let err = apply_hit_vector(
            &mut descriptor,
            AssetDimensions::new(100, 100),
            TrimPoints::new(50.0, 50.0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Configuration(OptionsError::DegenerateTrim { width: 100, .. })
        ));
    }

    #[test]
    fn base_prefix_joins_with_single_separator() {
        assert_eq!(join_base("", "a.webm"), "a.webm");
        assert_eq!(join_base("fx", "a.webm"), "fx/a.webm");
        assert_eq!(join_base("fx/", "a.webm"), "fx/a.webm");
        assert_eq!(join_base("https://cdn", "/a.webm"), "https://cdn/a.webm");
        assert_eq!(join_base("fx/", "/a.webm"), "fx/a.webm");
        assert_eq!(join_base("fx//", "//a.webm"), "fx/a.webm");
    }

    #[test]
    fn names_fall_back_to_stem_then_sentinel() {
        let named = EffectOptions::builder("x.webm").name("boom").build().unwrap();
        assert_eq!(effect_name(&named, "fx/x.webm"), "boom");

        let unnamed = EffectOptions::new("x.webm");
        assert_eq!(effect_name(&unnamed, "fx/x.webm"), "x");
        assert_eq!(effect_name(&unnamed, ""), UNNAMED_EFFECT);
    }
}
