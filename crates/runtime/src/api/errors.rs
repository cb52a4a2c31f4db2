//! Unified error type surfaced by `finalize` and sequence runs.
//!
//! Wraps configuration problems, name resolution misses, collaborator
//! failures and hook failures so callers see one error per failed effect.
use effect_core::{HookStage, OptionsError, ProbeError, TemplateError, UnresolvedName};
use thiserror::Error;

pub use crate::repository::CacheError;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] OptionsError),

    #[error(transparent)]
    UnresolvedName(#[from] UnresolvedName),

    #[error("failed to measure asset {path}")]
    AssetMeasurement {
        path: String,
        #[source]
        source: ProbeError,
    },

    #[error("failed to render path template `{template}`")]
    Template {
        template: String,
        #[source]
        source: TemplateError,
    },

    #[error("{stage} hook `{hook}` failed")]
    Hook {
        hook: String,
        stage: HookStage,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Cache(CacheError),
}

impl PipelineError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Configuration(err) => err.error_code(),
            PipelineError::UnresolvedName(_) => "PIPELINE_UNRESOLVED_NAME",
            PipelineError::AssetMeasurement { .. } => "PIPELINE_ASSET_MEASUREMENT",
            PipelineError::Template { .. } => "PIPELINE_TEMPLATE",
            PipelineError::Hook { .. } => "PIPELINE_HOOK",
            PipelineError::Cache(_) => "PIPELINE_CACHE",
        }
    }
}

impl From<CacheError> for PipelineError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Unresolved(name) => PipelineError::UnresolvedName(name),
            other => PipelineError::Cache(other),
        }
    }
}
