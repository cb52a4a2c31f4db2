//! Public runtime API surface.
//!
//! Types exposed to consumers of the runtime crate, so the pipeline and
//! sequence modules can stay focused on orchestration.

pub mod errors;

pub use errors::{PipelineError, Result};
