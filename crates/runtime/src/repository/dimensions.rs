//! Per-sequence cache of asset pixel dimensions.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use effect_core::AssetDimensions;
use tracing::trace;

use super::{CacheError, Result};

/// Maps asset paths to their measured pixel size.
///
/// Entries live as long as the owning sequence. Hit and miss counters are
/// kept for diagnostics only.
pub struct AssetDimensionCache {
    entries: RwLock<HashMap<String, AssetDimensions>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AssetDimensionCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, path: &str) -> Result<Option<AssetDimensions>> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned {
            cache: "asset dimension",
        })?;
        let found = entries.get(path).copied();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        trace!(
            target: "effect_runtime::cache",
            path,
            hit = found.is_some(),
            "asset dimension lookup"
        );
        Ok(found)
    }

    pub fn put(&self, path: &str, dimensions: AssetDimensions) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned {
            cache: "asset dimension",
        })?;
        entries.insert(path.to_owned(), dimensions);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}

impl Default for AssetDimensionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_then_hit() {
        let cache = AssetDimensionCache::new();
        assert_eq!(cache.get("bolt.webm").unwrap(), None);

        cache.put("bolt.webm", AssetDimensions::new(400, 100)).unwrap();
        assert_eq!(
            cache.get("bolt.webm").unwrap(),
            Some(AssetDimensions::new(400, 100))
        );
        assert_eq!(cache.stats(), (1, 1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn put_overwrites() {
        let cache = AssetDimensionCache::new();
        cache.put("a.png", AssetDimensions::new(1, 1)).unwrap();
        cache.put("a.png", AssetDimensions::new(2, 3)).unwrap();
        assert_eq!(cache.get("a.png").unwrap(), Some(AssetDimensions::new(2, 3)));
        assert_eq!(cache.len(), 1);
    }
}
