//! Gate decisions and the opaque state they carry.

use std::any::Any;

/// Opaque caller-defined data threaded from the gate to the later hooks.
///
/// The core never interprets the contents; it only carries them. Hooks
/// recover their own type with [`GateState::get`].
///
/// # Example
///
/// ```rust,ignore
/// fn before_call(&self, inv: &mut Invocation) -> Result<GateDecision, BoxError> {
///     Ok(GateDecision::proceed_with(Instant::now()))
/// }
///
/// fn cleanup(&self, inv: &mut Invocation, state: &GateState) -> Result<(), BoxError> {
///     if let Some(started) = state.get::<Instant>() {
///         // ...
///     }
///     Ok(())
/// }
/// ```
#[derive(Default)]
pub struct GateState(Option<Box<dyn Any + Send + Sync>>);

impl GateState {
    /// The empty state.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wrap a caller-defined value.
    pub fn new<S: Any + Send + Sync>(state: S) -> Self {
        Self(Some(Box::new(state)))
    }

    /// Downcast the carried value, if any.
    pub fn get<S: Any>(&self) -> Option<&S> {
        self.0.as_ref().and_then(|s| s.downcast_ref())
    }

    /// Whether any state is carried at all.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl std::fmt::Debug for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(_) => f.write_str("GateState(..)"),
            None => f.write_str("GateState(none)"),
        }
    }
}

/// The pre-call gate's verdict: proceed with optional state, or veto.
///
/// Produced once per invocation by [`Aspect::before_call`]. A veto
/// short-circuits the whole pipeline: the call is never attempted and the
/// caller receives the declared shape's default-completed value.
///
/// [`Aspect::before_call`]: crate::Aspect::before_call
#[derive(Debug)]
pub struct GateDecision {
    proceed: bool,
    state: GateState,
}

impl GateDecision {
    /// Proceed with no state. This is the default gate verdict.
    pub fn proceed() -> Self {
        Self {
            proceed: true,
            state: GateState::none(),
        }
    }

    /// Proceed, threading `state` unchanged into the later hooks.
    pub fn proceed_with<S: Any + Send + Sync>(state: S) -> Self {
        Self {
            proceed: true,
            state: GateState::new(state),
        }
    }

    /// Do not perform the call.
    pub fn veto() -> Self {
        Self {
            proceed: false,
            state: GateState::none(),
        }
    }

    /// Whether the call should be attempted.
    pub fn should_proceed(&self) -> bool {
        self.proceed
    }

    /// Extract the carried state.
    pub fn into_state(self) -> GateState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_roundtrip() {
        let decision = GateDecision::proceed_with(42u64);
        assert!(decision.should_proceed());
        let state = decision.into_state();
        assert_eq!(state.get::<u64>(), Some(&42));
        assert_eq!(state.get::<String>(), None);
    }

    #[test]
    fn veto_carries_nothing() {
        let decision = GateDecision::veto();
        assert!(!decision.should_proceed());
        assert!(decision.into_state().is_none());
    }
}
