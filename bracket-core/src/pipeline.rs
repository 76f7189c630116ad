//! The interception pipeline.
//!
//! [`Interceptor`] is the state machine that wraps one aspect around any
//! intercepted call:
//!
//! ```text
//! Start -> GateEvaluated -> { Vetoed | Proceeding } -> { Completed | Faulted } -> Finalized
//! ```
//!
//! The gate always completes before the call is attempted. A veto
//! synthesizes the declared shape's default-completed value and runs no
//! further hook. For inline shapes the remaining hooks run before
//! [`Interceptor::intercept`] returns; for deferred shapes the caller
//! immediately receives a combined deferred whose completion subsumes both
//! the underlying call and the transform/failure/cleanup hooks — there is
//! no observable instant where the inner call has completed but the hooks
//! have not run.

use crate::aspect::Aspect;
use crate::deferred::{Deferred, LightDeferred};
use crate::dispatch::{self, Continuation, run_void, settle, shape_mismatch};
use crate::error::{BoxError, InterceptError};
use crate::gate::GateState;
use crate::invocation::Invocation;
use crate::shape::{Returnable, ReturnShape};
use crate::synth::synthesize;
use std::any::{Any, type_name};
use std::sync::Arc;

/// Wraps an [`Aspect`] around intercepted calls of any return shape.
///
/// # Example
///
/// ```rust,ignore
/// let interceptor = Interceptor::new(AuditAspect::default());
///
/// let invocation = Invocation::new("total", |inv| {
///     inv.set_return(Deferred::new(async { Ok(fetch_total().await?) }));
///     Ok(())
/// });
///
/// let total: Deferred<u64> = interceptor.intercept(invocation)?;
/// ```
pub struct Interceptor {
    aspect: Arc<dyn Aspect>,
}

impl Interceptor {
    /// Wrap a single aspect.
    pub fn new(aspect: impl Aspect) -> Self {
        Self {
            aspect: Arc::new(aspect),
        }
    }

    /// Wrap an already-shared aspect.
    pub fn from_arc(aspect: Arc<dyn Aspect>) -> Self {
        Self { aspect }
    }

    /// Run one invocation through the pipeline.
    ///
    /// `R` is the call's declared return type; its [`Returnable`]
    /// classification decides the path taken. For the inline shapes the
    /// returned value is the final (possibly transformed) result; for the
    /// deferred shapes it is the combined deferred, returned immediately.
    pub fn intercept<R: Returnable>(&self, mut invocation: Invocation) -> Result<R, InterceptError> {
        let shape = R::shape();

        // Gate. An error here propagates with no other hook run; a veto
        // short-circuits to the synthesized default.
        let decision = self
            .aspect
            .before_call(&mut invocation)
            .map_err(InterceptError::Gate)?;
        if !decision.should_proceed() {
            return Ok(synthesize::<R>());
        }
        let state = decision.into_state();

        let produced: Box<dyn Any + Send>;
        let method: String;
        match shape {
            ReturnShape::Void | ReturnShape::Value => {
                let settled =
                    self.run_inline::<R>(&mut invocation, &state, shape.carries_value())?;
                return settled
                    .downcast::<R>()
                    .map(|value| *value)
                    .map_err(|_| shape_mismatch::<R>(&invocation));
            }
            ReturnShape::DeferredVoid => {
                let inner: Deferred<()> = match trigger(&mut invocation)? {
                    Ok(boxed) => *boxed
                        .downcast()
                        .map_err(|_| shape_mismatch::<R>(&invocation))?,
                    Err(e) => Deferred::faulted(e),
                };
                method = invocation.method().to_string();
                let continuation = self.continuation(invocation, state);
                produced = Box::new(Deferred::new(run_void(inner, continuation)));
            }
            ReturnShape::LightDeferredVoid => {
                let inner: LightDeferred<()> = match trigger(&mut invocation)? {
                    Ok(boxed) => *boxed
                        .downcast()
                        .map_err(|_| shape_mismatch::<R>(&invocation))?,
                    Err(e) => LightDeferred::faulted(e),
                };
                method = invocation.method().to_string();
                let continuation = self.continuation(invocation, state);
                produced = Box::new(LightDeferred::new(run_void(inner, continuation)));
            }
            ReturnShape::DeferredValue(_) | ReturnShape::LightDeferredValue(_) => {
                let dispatcher = dispatch::dispatcher_for::<R>()
                    .ok_or_else(|| shape_mismatch::<R>(&invocation))?;
                let raw = trigger(&mut invocation)?;
                method = invocation.method().to_string();
                produced = dispatcher(raw, self.continuation(invocation, state))?;
            }
        }

        // Deferred arms only; the invocation has moved into the combined
        // deferred, so its name was kept aside for the mismatch report.
        produced
            .downcast::<R>()
            .map(|value| *value)
            .map_err(|_| InterceptError::ShapeMismatch {
                method,
                expected: type_name::<R>(),
            })
    }

    /// Inline (`Void`/`Value`) path: call, settle, deliver.
    fn run_inline<R: Returnable>(
        &self,
        invocation: &mut Invocation,
        state: &GateState,
        carries_value: bool,
    ) -> Result<Box<dyn Any + Send>, InterceptError> {
        let outcome = match invocation.proceed() {
            Ok(()) => {
                if carries_value {
                    match invocation.take_return() {
                        Some(value) => Ok(Some(value)),
                        // Slot never populated: proxy-layer contract
                        // violation, surfaced before any post-call hook.
                        None => return Err(shape_mismatch::<R>(invocation)),
                    }
                } else {
                    Ok(None)
                }
            }
            Err(e) => Err(e),
        };
        let settled = settle(self.aspect.as_ref(), invocation, state, outcome)?;
        if carries_value {
            settled.ok_or_else(|| shape_mismatch::<R>(invocation))
        } else {
            // Void: any transform replacement is discarded.
            Ok(Box::new(()))
        }
    }

    fn continuation(&self, invocation: Invocation, state: GateState) -> Continuation {
        Continuation {
            aspect: Arc::clone(&self.aspect),
            invocation,
            state,
        }
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Interceptor(..)")
    }
}

/// Perform the real call and hand back the raw slot value, or the
/// trigger's synchronous error for the pipeline to fold into the deferred
/// path. An empty slot after a successful trigger is a contract violation
/// and short-circuits.
fn trigger(
    invocation: &mut Invocation,
) -> Result<Result<Box<dyn Any + Send>, BoxError>, InterceptError> {
    match invocation.proceed() {
        Ok(()) => match invocation.take_return() {
            Some(raw) => Ok(Ok(raw)),
            None => Err(InterceptError::ShapeMismatch {
                method: invocation.method().to_string(),
                expected: "a populated return slot",
            }),
        },
        Err(e) => Ok(Err(e)),
    }
}
