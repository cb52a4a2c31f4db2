//! Per-sequence cache of named effect positions.

use std::collections::HashMap;
use std::sync::RwLock;

use effect_core::{Point, PositionLookup, UnresolvedName};
use tracing::debug;

use super::{CacheError, Result};

/// Resolved origins of earlier effects, keyed by `(name, repetition)`.
///
/// Effects of a sequence are finalized in declaration order, so an effect
/// can only see names recorded by effects declared before it. Re-recording
/// a key overwrites it silently.
pub struct NamedPositionCache {
    entries: RwLock<HashMap<(String, usize), Point>>,
}

impl NamedPositionCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn record(&self, name: &str, repetition: usize, position: Point) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| CacheError::LockPoisoned {
            cache: "named position",
        })?;
        entries.insert((name.to_owned(), repetition), position);
        debug!(
            target: "effect_runtime::cache",
            name,
            repetition,
            x = position.x,
            y = position.y,
            "recorded named position"
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str, repetition: usize) -> Result<Point> {
        let entries = self.entries.read().map_err(|_| CacheError::LockPoisoned {
            cache: "named position",
        })?;
        entries
            .get(&(name.to_owned(), repetition))
            .copied()
            .ok_or_else(|| {
                UnresolvedName {
                    name: name.to_owned(),
                    repetition,
                }
                .into()
            })
    }

    pub fn contains(&self, name: &str, repetition: usize) -> bool {
        self.entries
            .read()
            .map(|entries| entries.contains_key(&(name.to_owned(), repetition)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NamedPositionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionLookup for NamedPositionCache {
    fn position(&self, name: &str, repetition: usize) -> Option<Point> {
        self.lookup(name, repetition).ok()
    }
}
