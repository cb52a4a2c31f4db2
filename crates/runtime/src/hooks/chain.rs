//! Sequential runner for one stage's hooks.

use std::sync::Arc;

use effect_core::{HookContext, OverrideHook, RenderDescriptor};
use tracing::{debug, error};

use crate::api::{PipelineError, Result};

/// Ordered hooks of a single stage.
///
/// Unlike a priority registry, order is exactly registration order.
pub struct HookChain<'a> {
    hooks: &'a [Arc<dyn OverrideHook>],
}

impl<'a> HookChain<'a> {
    pub fn new(hooks: &'a [Arc<dyn OverrideHook>]) -> Self {
        Self { hooks }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hook names in execution order (for debugging).
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.hooks.iter().map(|h| h.name())
    }

    /// Threads `descriptor` through every hook in order.
    pub async fn run(
        &self,
        ctx: &HookContext<'_>,
        mut descriptor: RenderDescriptor,
    ) -> Result<RenderDescriptor> {
        for (index, hook) in self.hooks.iter().enumerate() {
            debug!(
                target: "effect_runtime::hooks",
                stage = %ctx.stage,
                hook = hook.name(),
                index,
                "running override hook"
            );

            descriptor = match hook.apply(ctx, descriptor).await {
                Ok(next) => next,
                Err(source) => {
                    error!(
                        target: "effect_runtime::hooks",
                        stage = %ctx.stage,
                        hook = hook.name(),
                        error = ?source,
                        "override hook failed, aborting finalize"
                    );
                    return Err(PipelineError::Hook {
                        hook: hook.name().to_owned(),
                        stage: ctx.stage,
                        source,
                    });
                }
            };
        }

        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::NamedPositionCache;
    use async_trait::async_trait;
    use effect_core::{EffectOptions, FnHook, HookStage, PipelineConfig, Point};

    struct AsyncNudge;

    #[async_trait]
    impl OverrideHook for AsyncNudge {
        fn name(&self) -> &str {
            "async_nudge"
        }

        async fn apply(
            &self,
            _ctx: &HookContext<'_>,
            mut descriptor: RenderDescriptor,
        ) -> anyhow::Result<RenderDescriptor> {
            tokio::task::yield_now().await;
            descriptor.position.x += 1.0;
            Ok(descriptor)
        }
    }

    async fn run_chain(hooks: Vec<Arc<dyn OverrideHook>>) -> Result<RenderDescriptor> {
        let options = EffectOptions::new("a.webm");
        let config = PipelineConfig::default();
        let positions = NamedPositionCache::new();
        let ctx = HookContext {
            stage: HookStage::PreScale,
            options: &options,
            repetition: 0,
            config: &config,
            positions: &positions,
        };
        HookChain::new(&hooks)
            .run(&ctx, RenderDescriptor::default())
            .await
    }

    #[tokio::test]
    async fn hooks_see_previous_output() {
        let hooks: Vec<Arc<dyn OverrideHook>> = vec![
            Arc::new(FnHook::new("double", |_ctx: &HookContext<'_>, mut d: RenderDescriptor| {
                d.position = Point::new(10.0, 0.0);
                Ok(d)
            })),
            Arc::new(AsyncNudge),
            Arc::new(FnHook::new("scale_by_x", |_ctx: &HookContext<'_>, mut d: RenderDescriptor| {
                d.scale.x = d.position.x;
                Ok(d)
            })),
        ];
        let out = run_chain(hooks).await.unwrap();
        assert_eq!(out.position.x, 11.0);
        assert_eq!(out.scale.x, 11.0);
    }

    #[tokio::test]
    async fn first_failure_stops_the_chain() {
        let hooks: Vec<Arc<dyn OverrideHook>> = vec![
            Arc::new(FnHook::new("boom", |_ctx: &HookContext<'_>, _d: RenderDescriptor| {
                Err(anyhow::anyhow!("boom"))
            })),
            Arc::new(FnHook::new("unreachable", |_ctx: &HookContext<'_>, _d: RenderDescriptor| {
                panic!("must not run after a failure")
            })),
        ];
        match run_chain(hooks).await {
            Err(PipelineError::Hook { hook, stage, source }) => {
                assert_eq!(hook, "boom");
                assert_eq!(stage, HookStage::PreScale);
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("expected hook error, got {other:?}"),
        }
    }

    #[test]
    fn names_follow_registration_order() {
        let hooks: Vec<Arc<dyn OverrideHook>> = vec![
            Arc::new(AsyncNudge),
            Arc::new(FnHook::new("second", |_ctx: &HookContext<'_>, d: RenderDescriptor| Ok(d))),
        ];
        let chain = HookChain::new(&hooks);
        assert_eq!(chain.names().collect::<Vec<_>>(), ["async_nudge", "second"]);
        assert_eq!(chain.len(), 2);
    }
}
