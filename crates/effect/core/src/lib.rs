//! Data model and collaborator contracts for effect placement.
//!
//! This crate describes *what* an effect wants (its [`EffectOptions`]), *what*
//! the renderer receives (a [`RenderDescriptor`]), and the interfaces the
//! transform pipeline calls out to. It holds no mutable shared state; the
//! caches and the pipeline itself live in `effect-runtime`.
//!
//! Modules:
//! - [`geometry`]: points and the distance/angle primitive
//! - [`location`]: point / entity / template / name references
//! - [`options`]: effect options, builder, configuration errors
//! - [`descriptor`]: the render descriptor
//! - [`assets`]: dimensions and structured asset names
//! - [`rng`]: injectable random sources
//! - [`env`]: asset probe, path templater, position lookup contracts
//! - [`hooks`]: override hook interface
//! - [`config`]: pipeline configuration
pub mod assets;
pub mod config;
pub mod descriptor;
pub mod env;
pub mod geometry;
pub mod hooks;
pub mod location;
pub mod options;
pub mod rng;

pub use assets::{AssetDimensions, file_stem, parse_structured_dimensions};
pub use config::PipelineConfig;
pub use descriptor::RenderDescriptor;
pub use env::{
    AssetProbe, PathTemplater, PositionLookup, ProbeError, TemplateData, TemplateError,
    UnresolvedName,
};
pub use geometry::{Heading, Point, distance_and_angle};
pub use hooks::{FnHook, HookContext, HookStage, OverrideHook};
pub use location::{AreaShape, AreaTemplateRef, EntityRef, Footprint, LocationRef, LocationRole};
pub use options::{
    AssetSource, EffectOptions, EffectOptionsBuilder, MirrorAxes, OptionsError, ScaleSpec,
    TargetMode, TrimPoints,
};
pub use rng::{PcgRandom, RandRandom, RandomSource, ScriptedRandom};
