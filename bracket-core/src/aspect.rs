//! The four lifecycle hooks wrapped around every intercepted call.
//!
//! An [`Aspect`] is the core's only outward-facing contract. All four
//! methods have pass-through defaults, so an implementor overrides exactly
//! the hooks it cares about:
//!
//! - [`before_call`] - the gate; decides whether the call proceeds and may
//!   attach opaque state for the later hooks
//! - [`after_call`] - the post-success transform; may replace the result
//! - [`on_failure`] - observes a call failure before it is re-raised
//! - [`cleanup`] - always runs last, on every path where the call was
//!   attempted
//!
//! Hooks are synchronous. On deferred calls they run on whatever execution
//! context resumes after the underlying completion; the pipeline introduces
//! no threads of its own.
//!
//! [`before_call`]: Aspect::before_call
//! [`after_call`]: Aspect::after_call
//! [`on_failure`]: Aspect::on_failure
//! [`cleanup`]: Aspect::cleanup

use crate::error::{BoxError, InterceptError};
use crate::gate::{GateDecision, GateState};
use crate::invocation::Invocation;
use std::any::Any;

/// The post-success transform's verdict.
///
/// `Keep` and `Replace` are distinct on purpose: a hook that wants the
/// caller to receive the value type's default says so with
/// `Replace(Box::new(T::default()))`, and a hook with no opinion says
/// `Keep`. There is no sentinel value doing double duty.
pub enum Transform {
    /// Deliver the original result untouched.
    Keep,
    /// Deliver this value instead. It must downcast to the declared
    /// shape's value type; anything else surfaces as
    /// [`InterceptError::ShapeMismatch`].
    Replace(Box<dyn Any + Send>),
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transform::Keep => f.write_str("Transform::Keep"),
            Transform::Replace(_) => f.write_str("Transform::Replace(..)"),
        }
    }
}

/// The four lifecycle hooks.
///
/// Implementations must be thread-safe: a single aspect instance serves
/// concurrent invocations, each of which carries no shared mutable state
/// through the pipeline.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Aspect`",
    label = "missing `Aspect` implementation",
    note = "All four hook methods have defaults; an empty impl is a valid pass-through aspect."
)]
pub trait Aspect: Send + Sync + 'static {
    /// The gate. Runs before the call; a veto short-circuits everything
    /// downstream, and an error here propagates with no other hook run.
    fn before_call(&self, invocation: &mut Invocation) -> Result<GateDecision, BoxError> {
        let _ = invocation;
        Ok(GateDecision::proceed())
    }

    /// The post-success transform. `result` is `None` for the void shapes,
    /// where any `Replace` is discarded.
    fn after_call(
        &self,
        invocation: &mut Invocation,
        state: &GateState,
        result: Option<&dyn Any>,
    ) -> Result<Transform, BoxError> {
        let _ = (invocation, state, result);
        Ok(Transform::Keep)
    }

    /// Observes a call failure. Returning `Ok(())` lets the original
    /// failure re-raise; returning an error supersedes it.
    fn on_failure(
        &self,
        invocation: &mut Invocation,
        fault: &InterceptError,
        state: &GateState,
    ) -> Result<(), BoxError> {
        let _ = (invocation, fault, state);
        Ok(())
    }

    /// Always runs last on every path where the call was attempted. An
    /// error here supersedes whatever was already propagating.
    fn cleanup(&self, invocation: &mut Invocation, state: &GateState) -> Result<(), BoxError> {
        let _ = (invocation, state);
        Ok(())
    }
}
