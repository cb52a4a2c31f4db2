//! Override hooks: user functions that may rewrite a descriptor mid-pipeline.
//!
//! Hooks run at two fixed stages, strictly in registration order, and each
//! receives exactly the descriptor the previous hook returned. There is no
//! isolation between hooks: a hook that corrupts the descriptor corrupts it
//! for every hook after it and for the final result. Callers are trusted.

use async_trait::async_trait;

use crate::config::PipelineConfig;
use crate::descriptor::RenderDescriptor;
use crate::env::PositionLookup;
use crate::options::EffectOptions;

/// Pipeline stage a hook list is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum HookStage {
    /// After placement and rotation, before variant choice and scaling.
    PreScale,
    /// After scaling and the base-folder prefix, right before recording.
    PostPath,
}

/// Read-only view of the pipeline handed to hooks.
pub struct HookContext<'a> {
    pub stage: HookStage,
    /// Options of the effect being finalized.
    pub options: &'a EffectOptions,
    /// Repetition index of this run.
    pub repetition: usize,
    pub config: &'a PipelineConfig,
    /// Positions recorded by earlier effects of the same sequence.
    pub positions: &'a dyn PositionLookup,
}

/// A descriptor override.
///
/// Errors abort the whole finalize call and are surfaced as-is.
#[async_trait]
pub trait OverrideHook: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        "anonymous"
    }

    async fn apply(
        &self,
        ctx: &HookContext<'_>,
        descriptor: RenderDescriptor,
    ) -> anyhow::Result<RenderDescriptor>;
}

/// Adapts a synchronous closure into an [`OverrideHook`].
pub struct FnHook<F> {
    name: String,
    f: F,
}

impl<F> FnHook<F>
where
    F: Fn(&HookContext<'_>, RenderDescriptor) -> anyhow::Result<RenderDescriptor> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> OverrideHook for FnHook<F>
where
    F: Fn(&HookContext<'_>, RenderDescriptor) -> anyhow::Result<RenderDescriptor> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(
        &self,
        ctx: &HookContext<'_>,
        descriptor: RenderDescriptor,
    ) -> anyhow::Result<RenderDescriptor> {
        (self.f)(ctx, descriptor)
    }
}
