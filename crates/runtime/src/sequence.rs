//! Ordered runs of effects sharing one pair of caches.

use effect_core::{EffectOptions, Point, RandomSource, RenderDescriptor};
use tracing::{debug, error, info};

use crate::api::Result;
use crate::pipeline::TransformPipeline;

/// A list of effects finalized in declaration order.
///
/// The sequence owns its pipeline (and with it the dimension and named
/// position caches) and the random source every randomized step draws from.
/// Running two sequences never leaks names between them.
pub struct EffectSequence {
    pipeline: TransformPipeline,
    effects: Vec<EffectOptions>,
    rng: Box<dyn RandomSource>,
}

impl EffectSequence {
    pub fn new(pipeline: TransformPipeline, rng: impl RandomSource + 'static) -> Self {
        Self {
            pipeline,
            effects: Vec::new(),
            rng: Box::new(rng),
        }
    }

    pub fn add(&mut self, effect: EffectOptions) -> &mut Self {
        self.effects.push(effect);
        self
    }

    pub fn effects(&self) -> &[EffectOptions] {
        &self.effects
    }

    pub fn pipeline(&self) -> &TransformPipeline {
        &self.pipeline
    }

    /// Pre-seeds a named position, e.g. for an effect played outside this
    /// sequence.
    pub fn record_named_position(
        &self,
        name: &str,
        repetition: usize,
        position: Point,
    ) -> Result<()> {
        Ok(self.pipeline.positions().record(name, repetition, position)?)
    }

    pub fn lookup_named_position(&self, name: &str, repetition: usize) -> Result<Point> {
        Ok(self.pipeline.positions().lookup(name, repetition)?)
    }

    /// Finalizes every effect, `repeats` times each, in declaration order.
    ///
    /// Stops at the first failing effect. Descriptors of effects that already
    /// finished are discarded along with the error, but their named positions
    /// stay recorded.
    pub async fn run(&mut self) -> Result<Vec<RenderDescriptor>> {
        let mut descriptors = Vec::new();

        for (index, effect) in self.effects.iter().enumerate() {
            for repetition in 0..effect.repeats {
                match self
                    .pipeline
                    .finalize(effect, repetition, self.rng.as_mut())
                    .await
                {
                    Ok(descriptor) => descriptors.push(descriptor),
                    Err(err) => {
                        error!(
                            target: "effect_runtime::sequence",
                            index,
                            repetition,
                            code = err.error_code(),
                            error = %err,
                            "effect failed, stopping sequence"
                        );
                        return Err(err);
                    }
                }
            }
            debug!(
                target: "effect_runtime::sequence",
                index,
                repeats = effect.repeats,
                "effect finalized"
            );
        }

        info!(
            target: "effect_runtime::sequence",
            effects = self.effects.len(),
            descriptors = descriptors.len(),
            "sequence complete"
        );
        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PipelineError;
    use crate::oracle::{Collaborators, StaticProbe};
    use effect_core::{LocationRef, PcgRandom};

    fn sequence() -> EffectSequence {
        let pipeline = TransformPipeline::builder(Collaborators::with_probe(StaticProbe::new()))
            .build();
        EffectSequence::new(pipeline, PcgRandom::new(7))
    }

    #[tokio::test]
    async fn later_effects_follow_earlier_names() {
        let mut seq = sequence();
        seq.add(
            EffectOptions::builder("cast.webm")
                .name("cast")
                .at(Point::new(40.0, 60.0))
                .build()
                .unwrap(),
        )
        .add(
            EffectOptions::builder("echo.webm")
                .at(LocationRef::name("cast"))
                .build()
                .unwrap(),
        );

        let out = seq.run().await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].position, Point::new(40.0, 60.0));
        assert_eq!(
            seq.lookup_named_position("echo", 0).unwrap(),
            Point::new(40.0, 60.0)
        );
    }

    #[tokio::test]
    async fn repeats_multiply_descriptors() {
        let mut seq = sequence();
        seq.add(
            EffectOptions::builder("spark.webm")
                .at(Point::ORIGIN)
                .repeats(3)
                .build()
                .unwrap(),
        );
        assert_eq!(seq.run().await.unwrap().len(), 3);
        for rep in 0..3 {
            assert!(seq.lookup_named_position("spark", rep).is_ok());
        }
    }

    #[tokio::test]
    async fn forward_reference_fails() {
        let mut seq = sequence();
        seq.add(
            EffectOptions::builder("early.webm")
                .at(LocationRef::name("late"))
                .build()
                .unwrap(),
        )
        .add(
            EffectOptions::builder("late.webm")
                .name("late")
                .build()
                .unwrap(),
        );

        let err = seq.run().await.unwrap_err();
        assert!(matches!(err, PipelineError::UnresolvedName(_)));
    }

    #[tokio::test]
    async fn preseeded_names_resolve() {
        let mut seq = sequence();
        seq.record_named_position("token", 0, Point::new(5.0, 5.0))
            .unwrap();
        seq.add(
            EffectOptions::builder("ring.webm")
                .at(LocationRef::name("token"))
                .build()
                .unwrap(),
        );
        let out = seq.run().await.unwrap();
        assert_eq!(out[0].position, Point::new(5.0, 5.0));
    }
}
