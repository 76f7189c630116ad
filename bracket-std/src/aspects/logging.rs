//! Logging aspect for call observation.

use bracket_core::{Aspect, BoxError, GateDecision, GateState, InterceptError, Invocation};

/// An aspect that logs each lifecycle stage of an intercepted call.
///
/// Emits `tracing` events when the `tracing` feature is enabled and is a
/// pass-through otherwise. Never vetoes, never transforms.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingAspect;

impl Aspect for LoggingAspect {
    fn before_call(&self, invocation: &mut Invocation) -> Result<GateDecision, BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(method = invocation.method(), "intercepting call");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = invocation;
        }
        Ok(GateDecision::proceed())
    }

    fn on_failure(
        &self,
        invocation: &mut Invocation,
        fault: &InterceptError,
        _state: &GateState,
    ) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::error!(method = invocation.method(), error = %fault, "intercepted call failed");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = (invocation, fault);
        }
        Ok(())
    }

    fn cleanup(&self, invocation: &mut Invocation, _state: &GateState) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(method = invocation.method(), "intercepted call finalized");
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = invocation;
        }
        Ok(())
    }
}
