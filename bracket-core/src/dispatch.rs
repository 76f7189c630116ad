//! Shape-specific dispatchers and the process-wide dispatcher cache.
//!
//! For the two value-carrying deferred shapes, attaching the hooks means
//! rebuilding a deferred of the same concrete inner type around the
//! awaited completion. The function that does so is monomorphized per
//! inner type; this module builds it once per type, caches it keyed by the
//! declared return type's `TypeId`, and serves the cached copy thereafter.
//!
//! The cache is write-once-read-many. Concurrent first-requests for the
//! same type may race to insert, but every racer constructs the same
//! monomorphized function, so whichever insert wins is correct. Bypassing
//! the cache would change cost, never behavior.

use crate::aspect::{Aspect, Transform};
use crate::deferred::{Deferred, LightDeferred};
use crate::error::{BoxError, InterceptError};
use crate::gate::GateState;
use crate::invocation::Invocation;
use crate::shape::Returnable;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, LazyLock, RwLock};

/// Everything a deferred completion needs to run the remaining hooks:
/// the aspect, the invocation (moved in for the duration), and the gate
/// state. Constructed by the pipeline, consumed exactly once when the
/// inner deferred completes.
pub struct Continuation {
    pub(crate) aspect: Arc<dyn Aspect>,
    pub(crate) invocation: Invocation,
    pub(crate) state: GateState,
}

/// A specialized dispatcher for one concrete value-carrying deferred type.
///
/// Input is the trigger's outcome: the raw slot value on success, or the
/// synchronous trigger error (folded into an immediately-faulted inner
/// deferred, since the call was attempted and the hooks are owed). Output
/// is the combined deferred, boxed for the pipeline to downcast.
pub type DispatcherFn = fn(
    Result<Box<dyn Any + Send>, BoxError>,
    Continuation,
) -> Result<Box<dyn Any + Send>, InterceptError>;

static DISPATCHERS: LazyLock<RwLock<HashMap<TypeId, DispatcherFn>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Get-or-create the cached dispatcher for `R`. `None` for shapes that do
/// not dispatch through the cache.
pub(crate) fn dispatcher_for<R: Returnable>() -> Option<DispatcherFn> {
    let key = TypeId::of::<R>();
    {
        let entries = DISPATCHERS.read().unwrap_or_else(|e| e.into_inner());
        if let Some(dispatcher) = entries.get(&key) {
            return Some(*dispatcher);
        }
    }
    let built = R::dispatcher()?;
    let mut entries = DISPATCHERS.write().unwrap_or_else(|e| e.into_inner());
    Some(*entries.entry(key).or_insert(built))
}

/// Number of dispatcher entries currently cached.
#[doc(hidden)]
pub fn cached_dispatcher_count() -> usize {
    DISPATCHERS.read().unwrap_or_else(|e| e.into_inner()).len()
}

pub(crate) fn deferred_dispatcher<T: Send + 'static>(
    raw: Result<Box<dyn Any + Send>, BoxError>,
    continuation: Continuation,
) -> Result<Box<dyn Any + Send>, InterceptError> {
    let inner: Deferred<T> = match raw {
        Ok(boxed) => *boxed
            .downcast()
            .map_err(|_| shape_mismatch::<Deferred<T>>(&continuation.invocation))?,
        Err(e) => Deferred::faulted(e),
    };
    Ok(Box::new(Deferred::new(run_value(inner, continuation))))
}

pub(crate) fn light_deferred_dispatcher<T: Send + 'static>(
    raw: Result<Box<dyn Any + Send>, BoxError>,
    continuation: Continuation,
) -> Result<Box<dyn Any + Send>, InterceptError> {
    let inner: LightDeferred<T> = match raw {
        Ok(boxed) => *boxed
            .downcast()
            .map_err(|_| shape_mismatch::<LightDeferred<T>>(&continuation.invocation))?,
        Err(e) => LightDeferred::faulted(e),
    };
    Ok(Box::new(LightDeferred::new(run_value(inner, continuation))))
}

pub(crate) fn shape_mismatch<R>(invocation: &Invocation) -> InterceptError {
    InterceptError::ShapeMismatch {
        method: invocation.method().to_string(),
        expected: type_name::<R>(),
    }
}

/// Await the inner completion, then run the remaining hooks around it.
/// This is the single suspension point of a deferred invocation; the
/// caller's combined deferred cannot complete before the hooks have run.
async fn run_value<T, F>(inner: F, continuation: Continuation) -> Result<T, BoxError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, BoxError>> + Send,
{
    let Continuation {
        aspect,
        mut invocation,
        state,
    } = continuation;
    let outcome = inner
        .await
        .map(|value| Some(Box::new(value) as Box<dyn Any + Send>));
    match settle(aspect.as_ref(), &mut invocation, &state, outcome) {
        Ok(Some(boxed)) => boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| shape_mismatch::<T>(&invocation).boxed()),
        Ok(None) => Err(shape_mismatch::<T>(&invocation).boxed()),
        Err(e) => Err(e.boxed()),
    }
}

/// Void twin of [`run_value`]: the transform sees no result and any
/// replacement it offers is discarded.
pub(crate) async fn run_void<F>(inner: F, continuation: Continuation) -> Result<(), BoxError>
where
    F: Future<Output = Result<(), BoxError>> + Send,
{
    let Continuation {
        aspect,
        mut invocation,
        state,
    } = continuation;
    let outcome = inner.await.map(|()| None);
    settle(aspect.as_ref(), &mut invocation, &state, outcome)
        .map(|_| ())
        .map_err(InterceptError::boxed)
}

/// Run the post-call half of the pipeline around one settled call outcome.
///
/// Exactly one of the transform/failure hooks runs, then cleanup, with
/// last-raised-wins supersession throughout. Shared by the synchronous
/// path and every deferred continuation.
pub(crate) fn settle(
    aspect: &dyn Aspect,
    invocation: &mut Invocation,
    state: &GateState,
    outcome: Result<Option<Box<dyn Any + Send>>, BoxError>,
) -> Result<Option<Box<dyn Any + Send>>, InterceptError> {
    let mut result = match outcome {
        Ok(original) => {
            let view = original.as_ref().map(|v| &**v as &dyn Any);
            match aspect.after_call(invocation, state, view) {
                Ok(Transform::Keep) => Ok(original),
                Ok(Transform::Replace(value)) => Ok(Some(value)),
                // A transform failure happens after a successful call;
                // the failure hook is not consulted for it.
                Err(e) => Err(InterceptError::AfterCall(e)),
            }
        }
        Err(e) => {
            let fault = InterceptError::Call(e);
            match aspect.on_failure(invocation, &fault, state) {
                Ok(()) => Err(fault),
                Err(e) => Err(InterceptError::OnFailure(e)),
            }
        }
    };
    if let Err(e) = aspect.cleanup(invocation, state) {
        result = Err(InterceptError::Cleanup(e));
    }
    result
}
