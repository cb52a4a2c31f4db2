//! Validate a sequence file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use effect_content::SequenceLoader;

/// Parse and validate a sequence file
#[derive(Parser, Debug)]
pub struct Check {
    /// Sequence file (`.toml` or `.ron`)
    pub file: PathBuf,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let effects = SequenceLoader::load(&self.file)?;
        let runs: usize = effects.iter().map(|e| e.repeats).sum();
        println!(
            "{}: {} effects, {} runs",
            self.file.display(),
            effects.len(),
            runs
        );
        Ok(())
    }
}
