//! Collaborator contracts consumed by the transform pipeline.
//!
//! The pipeline never measures assets, renders templates, or stores named
//! positions by itself. It reaches those through the traits below, which the
//! runtime implements (image probe, brace templater, position cache) and
//! tests replace with in-memory fixtures.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::assets::AssetDimensions;
use crate::geometry::Point;

/// Asset metadata probe failure.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("asset {path} not found")]
    NotFound { path: String },

    #[error("failed to read dimensions of {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("probe task for {path} did not complete")]
    Interrupted { path: String },
}

/// Measures the pixel size of an asset.
///
/// Only invoked on a dimension-cache miss.
#[async_trait]
pub trait AssetProbe: Send + Sync {
    async fn measure(&self, path: &str) -> Result<AssetDimensions, ProbeError>;
}

/// Values available to path templates.
pub type TemplateData = BTreeMap<String, String>;

/// Path template failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template references unknown key `{key}`")]
    UnknownKey { key: String },

    #[error("unterminated placeholder at byte {offset}")]
    Unterminated { offset: usize },
}

/// Renders an asset path template against a context.
pub trait PathTemplater: Send + Sync {
    fn render(&self, template: &str, data: &TemplateData) -> Result<String, TemplateError>;
}

/// No record for a name at a repetition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no effect named `{name}` was recorded for repetition {repetition}")]
pub struct UnresolvedName {
    pub name: String,
    pub repetition: usize,
}

/// Read access to positions recorded by earlier effects of a sequence.
pub trait PositionLookup: Send + Sync {
    /// Position recorded under `name` for `repetition`, if any.
    fn position(&self, name: &str, repetition: usize) -> Option<Point>;
}
