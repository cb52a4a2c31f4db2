//! Override hook execution.
//!
//! Hooks are attached to an effect's options at two stages (see
//! [`HookStage`]). The chain runs them strictly in registration order; each
//! hook receives the descriptor returned by the previous one.
//!
//! # No isolation
//!
//! A hook sees and may rewrite every descriptor field, and whatever it
//! returns is what later hooks and the renderer get. A misbehaving hook can
//! corrupt the result for everything after it. This is accepted: hooks are
//! caller-supplied code and are trusted like the rest of the caller.
//!
//! # Failure
//!
//! The first failing hook aborts the chain. Its error is returned as the
//! source of [`crate::PipelineError::Hook`] without modification, and no partial
//! descriptor is kept.

mod chain;

pub use chain::HookChain;
pub use effect_core::{FnHook, HookContext, HookStage, OverrideHook};
