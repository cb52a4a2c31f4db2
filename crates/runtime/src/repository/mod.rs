//! Shared caches for one effect sequence.
//!
//! These are the only state shared between effects:
//! - asset dimensions, so each asset is measured at most once
//! - named positions, so later effects can reference earlier ones
//!
//! Each sequence owns its own instances. They tolerate sequential reuse from
//! async code but are not meant for out-of-order concurrent writers.

mod dimensions;
mod error;
mod positions;

pub use dimensions::AssetDimensionCache;
pub use error::{CacheError, Result};
pub use positions::NamedPositionCache;
