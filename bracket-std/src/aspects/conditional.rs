//! Conditional aspect - apply an inner aspect only to matching calls.

use bracket_core::{
    Aspect, BoxError, GateDecision, GateState, InterceptError, Invocation, Transform,
};
use std::any::Any;

/// Remembers across the later hooks that the inner aspect's gate ran, and
/// what state it produced. Absent from the gate state entirely when the
/// predicate declined the call.
struct Engaged(GateState);

/// An aspect that applies an inner aspect only when a predicate on the
/// invocation holds.
///
/// When the predicate declines, the call proceeds as if wrapped by a
/// pass-through aspect; none of the inner hooks run. Engagement is decided
/// once, at the gate, so the inner aspect sees a consistent view even if
/// the predicate would answer differently later.
///
/// # Example
///
/// ```rust,ignore
/// // Audit only mutating methods.
/// let audited = When::new(
///     |inv: &Invocation| inv.method().starts_with("set_"),
///     AuditAspect::default(),
/// );
/// ```
pub struct When<A, F> {
    condition: F,
    inner: A,
}

impl<A, F> When<A, F> {
    /// Apply `inner` only to invocations for which `condition` holds.
    pub fn new(condition: F, inner: A) -> Self {
        Self { condition, inner }
    }
}

impl<A, F> Aspect for When<A, F>
where
    A: Aspect,
    F: Fn(&Invocation) -> bool + Send + Sync + 'static,
{
    fn before_call(&self, invocation: &mut Invocation) -> Result<GateDecision, BoxError> {
        if !(self.condition)(invocation) {
            return Ok(GateDecision::proceed());
        }
        let decision = self.inner.before_call(invocation)?;
        if !decision.should_proceed() {
            return Ok(GateDecision::veto());
        }
        Ok(GateDecision::proceed_with(Engaged(decision.into_state())))
    }

    fn after_call(
        &self,
        invocation: &mut Invocation,
        state: &GateState,
        result: Option<&dyn Any>,
    ) -> Result<Transform, BoxError> {
        match state.get::<Engaged>() {
            Some(engaged) => self.inner.after_call(invocation, &engaged.0, result),
            None => Ok(Transform::Keep),
        }
    }

    fn on_failure(
        &self,
        invocation: &mut Invocation,
        fault: &InterceptError,
        state: &GateState,
    ) -> Result<(), BoxError> {
        match state.get::<Engaged>() {
            Some(engaged) => self.inner.on_failure(invocation, fault, &engaged.0),
            None => Ok(()),
        }
    }

    fn cleanup(&self, invocation: &mut Invocation, state: &GateState) -> Result<(), BoxError> {
        match state.get::<Engaged>() {
            Some(engaged) => self.inner.cleanup(invocation, &engaged.0),
            None => Ok(()),
        }
    }
}
