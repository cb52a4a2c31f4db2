//! Effect render-parameter resolution.
//!
//! This crate turns declarative [`effect_core::EffectOptions`] into concrete
//! [`effect_core::RenderDescriptor`]s. It owns the per-sequence caches, wires
//! the asset probe and path templater, and runs override hooks.
//!
//! Modules are organized by responsibility:
//! - [`pipeline`] hosts [`TransformPipeline`] and its `finalize` entry point
//! - [`sequence`] runs a list of effects in declaration order
//! - [`resolver`] turns location references into points
//! - [`hooks`] runs override hooks of one stage
//! - [`oracle`] and [`repository`] provide collaborators and caches
//! - [`api`] exposes the error type downstream callers match on
pub mod api;
pub mod hooks;
pub mod oracle;
pub mod pipeline;
pub mod repository;
pub mod resolver;
pub mod sequence;

pub use api::{PipelineError, Result};
pub use hooks::HookChain;
#[cfg(feature = "image-probe")]
pub use oracle::ImageProbe;
pub use oracle::{BraceTemplater, Collaborators, StaticProbe};
pub use pipeline::{
    HIT_VECTOR_MIN_SCALE_Y, TransformPipeline, TransformPipelineBuilder, UNNAMED_EFFECT,
};
pub use repository::{AssetDimensionCache, CacheError, NamedPositionCache};
pub use resolver::{LocationResolver, missed_offset};
pub use sequence::EffectSequence;
