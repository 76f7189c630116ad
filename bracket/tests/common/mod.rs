#![allow(dead_code)]

use bracket::{Aspect, BoxError, Deferred, GateState, Invocation, LightDeferred, Transform};
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

// ============================================================================
// Invocation builders, one per shape
// ============================================================================

pub fn value_call(n: i32) -> Invocation {
    Invocation::new("value_call", move |inv| {
        inv.set_return(n);
        Ok(())
    })
}

pub fn failing_value_call(message: &'static str) -> Invocation {
    Invocation::new("value_call", move |_| Err(message.into()))
}

/// A void call that flips `performed` when the underlying action runs.
pub fn void_call(performed: Arc<AtomicBool>) -> Invocation {
    Invocation::new("void_call", move |_| {
        performed.store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    })
}

pub fn deferred_call(n: i32) -> Invocation {
    Invocation::new("deferred_call", move |inv| {
        inv.set_return(Deferred::new(async move { Ok(n) }));
        Ok(())
    })
}

pub fn faulted_deferred_call(message: &'static str) -> Invocation {
    Invocation::new("deferred_call", move |inv| {
        inv.set_return(Deferred::<i32>::new(async move { Err(message.into()) }));
        Ok(())
    })
}

pub fn deferred_void_call() -> Invocation {
    Invocation::new("deferred_void_call", |inv| {
        inv.set_return(Deferred::new(async { Ok(()) }));
        Ok(())
    })
}

pub fn light_call(n: i32) -> Invocation {
    Invocation::new("light_call", move |inv| {
        inv.set_return(LightDeferred::new(async move { Ok(n) }));
        Ok(())
    })
}

pub fn light_void_call() -> Invocation {
    Invocation::new("light_void_call", |inv| {
        inv.set_return(LightDeferred::new(async { Ok(()) }));
        Ok(())
    })
}

// ============================================================================
// Bespoke aspects
// ============================================================================

/// Replaces any `i32` result with its double; keeps everything else.
pub struct Doubling;

impl Aspect for Doubling {
    fn after_call(
        &self,
        _invocation: &mut Invocation,
        _state: &GateState,
        result: Option<&dyn Any>,
    ) -> Result<Transform, BoxError> {
        match result.and_then(|r| r.downcast_ref::<i32>()) {
            Some(n) => Ok(Transform::Replace(Box::new(n * 2))),
            None => Ok(Transform::Keep),
        }
    }
}
