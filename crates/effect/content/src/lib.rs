//! Data-driven effect sequences and pipeline configuration.
//!
//! This crate reads effect sequence files (TOML or RON) and pipeline
//! configuration (TOML) into effect-core types:
//! - Effect sequences: an ordered `effects` list, one entry per effect
//! - Pipeline configuration: grid sizes, structured asset names, base path
//!
//! Hooks cannot be expressed in data files; attach them in code after
//! loading.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, EffectEntry, SequenceFile, SequenceLoader};
