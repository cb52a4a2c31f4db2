//! Finalize a sequence file.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use effect_content::{ConfigLoader, SequenceLoader};
use effect_core::{PcgRandom, PipelineConfig, RandRandom, RandomSource};
use effect_runtime::{Collaborators, EffectSequence, ImageProbe, TransformPipeline};
use tracing::info;

/// Finalize every effect of a sequence file
#[derive(Parser, Debug)]
pub struct Run {
    /// Sequence file (`.toml` or `.ron`)
    pub file: PathBuf,

    /// Pipeline configuration (TOML). Environment variables override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory asset paths are resolved against when probing
    #[arg(long)]
    pub assets: Option<PathBuf>,
}

impl Run {
    pub async fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => PipelineConfig::default(),
        }
        .with_env_overrides();

        let effects = SequenceLoader::load(&self.file)?;

        let probe = match self.assets {
            Some(root) => ImageProbe::with_root(root),
            None => ImageProbe::new(),
        };
        let pipeline = TransformPipeline::builder(Collaborators::with_probe(probe))
            .config(config)
            .build();

        let rng: Box<dyn RandomSource> = match self.seed {
            Some(seed) => Box::new(PcgRandom::new(seed)),
            None => Box::new(RandRandom::from_entropy()),
        };

        let mut sequence = EffectSequence::new(pipeline, rng);
        for effect in effects {
            sequence.add(effect);
        }

        info!(
            file = %self.file.display(),
            effects = sequence.effects().len(),
            seed = ?self.seed,
            "running sequence"
        );

        let descriptors = sequence
            .run()
            .await
            .with_context(|| format!("Failed to run {}", self.file.display()))?;

        let mut out = io::stdout().lock();
        for descriptor in &descriptors {
            serde_json::to_writer(&mut out, descriptor)?;
            writeln!(out)?;
        }

        Ok(())
    }
}
