//! External collaborators the pipeline calls out to.
//!
//! The asset probe and the path templater are bundled into [`Collaborators`]
//! so a pipeline can be wired once and cloned cheaply. Both are read-only from
//! the pipeline's point of view; mutable per-sequence data lives in
//! [`crate::repository`].
mod probe;
mod template;

use std::sync::Arc;

use effect_core::{AssetProbe, PathTemplater};

#[cfg(feature = "image-probe")]
pub use probe::ImageProbe;
pub use probe::StaticProbe;
pub use template::BraceTemplater;

/// Probe and templater used by a pipeline.
#[derive(Clone)]
pub struct Collaborators {
    pub(crate) probe: Arc<dyn AssetProbe>,
    pub(crate) templater: Arc<dyn PathTemplater>,
}

impl Collaborators {
    pub fn new(probe: Arc<dyn AssetProbe>, templater: Arc<dyn PathTemplater>) -> Self {
        Self { probe, templater }
    }

    /// Uses `probe` with the default [`BraceTemplater`].
    pub fn with_probe(probe: impl AssetProbe + 'static) -> Self {
        Self::new(Arc::new(probe), Arc::new(BraceTemplater))
    }

    pub fn probe(&self) -> &dyn AssetProbe {
        self.probe.as_ref()
    }

    pub fn templater(&self) -> &dyn PathTemplater {
        self.templater.as_ref()
    }
}
