//! Deferred results: handles to values that some execution context
//! produces later.
//!
//! Two variants exist, treated identically by the pipeline except for
//! which default-completed instance is synthesized on a veto:
//!
//! - [`Deferred<T>`] - the heap variant; always a boxed future
//! - [`LightDeferred<T>`] - the stack-friendly variant; an
//!   already-completed instance holds its result inline and allocates
//!   nothing
//!
//! Both complete with `Result<T, BoxError>`: a faulted deferred is the
//! asynchronous analog of a call that raised.

use crate::error::BoxError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

type BoxedCompletion<T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send>>;

/// The heap-allocated deferred result.
pub struct Deferred<T> {
    inner: BoxedCompletion<T>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Wrap a future as a deferred result.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        Self {
            inner: Box::pin(future),
        }
    }

    /// A deferred result that has already completed with `value`.
    pub fn completed(value: T) -> Self {
        Self::new(std::future::ready(Ok(value)))
    }

    /// A deferred result that has already faulted with `error`.
    pub fn faulted(error: BoxError) -> Self {
        Self::new(std::future::ready(Err(error)))
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

impl<T: Default + Send + 'static> Default for Deferred<T> {
    fn default() -> Self {
        Self::completed(T::default())
    }
}

impl<T> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Deferred(..)")
    }
}

enum LightState<T> {
    /// Result available inline. `None` once it has been taken by `poll`.
    Ready(Option<Result<T, BoxError>>),
    Pending(BoxedCompletion<T>),
}

/// The stack-friendly deferred result.
///
/// A completed instance carries its result inline; only a genuinely
/// pending completion boxes a future.
pub struct LightDeferred<T> {
    state: LightState<T>,
}

impl<T: Send + 'static> LightDeferred<T> {
    /// Wrap a future as a light deferred result.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        Self {
            state: LightState::Pending(Box::pin(future)),
        }
    }
}

impl<T> LightDeferred<T> {
    /// A light deferred result that has already completed with `value`.
    /// Does not allocate.
    pub fn completed(value: T) -> Self {
        Self {
            state: LightState::Ready(Some(Ok(value))),
        }
    }

    /// A light deferred result that has already faulted with `error`.
    pub fn faulted(error: BoxError) -> Self {
        Self {
            state: LightState::Ready(Some(Err(error))),
        }
    }

    /// Whether the result is available without awaiting.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, LightState::Ready(Some(_)))
    }
}

// The inline result is only ever moved out by value and the pending
// future is already boxed, so pinning a LightDeferred pins nothing
// structurally.
impl<T> Unpin for LightDeferred<T> {}

impl<T> Future for LightDeferred<T> {
    type Output = Result<T, BoxError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            LightState::Ready(slot) => match slot.take() {
                Some(result) => Poll::Ready(result),
                None => panic!("LightDeferred polled after completion"),
            },
            LightState::Pending(future) => future.as_mut().poll(cx),
        }
    }
}

impl<T: Default> Default for LightDeferred<T> {
    fn default() -> Self {
        Self::completed(T::default())
    }
}

impl<T> std::fmt::Debug for LightDeferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state {
            LightState::Ready(_) => f.write_str("LightDeferred(ready)"),
            LightState::Pending(_) => f.write_str("LightDeferred(pending)"),
        }
    }
}
