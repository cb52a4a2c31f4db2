//! Error types raised by the shared caches.

use effect_core::UnresolvedName;
use thiserror::Error;

/// Errors surfaced by cache implementations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{cache} cache lock was poisoned")]
    LockPoisoned { cache: &'static str },

    #[error(transparent)]
    Unresolved(#[from] UnresolvedName),
}

pub type Result<T> = std::result::Result<T, CacheError>;
