//! Asset probes.

use std::collections::HashMap;
#[cfg(feature = "image-probe")]
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use effect_core::{AssetDimensions, AssetProbe, ProbeError};

/// Reads dimensions from image headers on disk.
///
/// Decoding runs on the blocking pool. Only image formats enabled on the
/// `image` crate are understood; video assets should use structured names.
#[cfg(feature = "image-probe")]
#[derive(Clone, Debug, Default)]
pub struct ImageProbe {
    root: Option<PathBuf>,
}

#[cfg(feature = "image-probe")]
impl ImageProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative asset paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn locate(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

#[cfg(feature = "image-probe")]
#[async_trait]
impl AssetProbe for ImageProbe {
    async fn measure(&self, path: &str) -> Result<AssetDimensions, ProbeError> {
        let file = self.locate(path);
        let measured = tokio::task::spawn_blocking(move || image::image_dimensions(file))
            .await
            .map_err(|_| ProbeError::Interrupted {
                path: path.to_owned(),
            })?;

        match measured {
            Ok((x, y)) => Ok(AssetDimensions::new(x, y)),
            Err(image::ImageError::IoError(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ProbeError::NotFound {
                    path: path.to_owned(),
                })
            }
            Err(err) => Err(ProbeError::Unreadable {
                path: path.to_owned(),
                reason: err.to_string(),
            }),
        }
    }
}

/// In-memory probe backed by a fixed table.
///
/// Counts every call so tests can assert that cached or structured paths
/// never reach the probe.
#[derive(Debug, Default)]
pub struct StaticProbe {
    table: HashMap<String, AssetDimensions>,
    calls: AtomicUsize,
}

impl StaticProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, dimensions: AssetDimensions) -> Self {
        self.table.insert(path.into(), dimensions);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetProbe for StaticProbe {
    async fn measure(&self, path: &str) -> Result<AssetDimensions, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table
            .get(path)
            .copied()
            .ok_or_else(|| ProbeError::NotFound {
                path: path.to_owned(),
            })
    }
}
