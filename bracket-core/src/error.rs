//! Error types for Bracket.
//!
//! Every failure on an intercepted call surfaces as exactly one
//! [`InterceptError`], tagged with the stage that raised it:
//!
//! - [`InterceptError::Gate`] - the pre-call gate failed; the call was never
//!   attempted and no other hook (cleanup included) runs
//! - [`InterceptError::Call`] - the underlying call failed; the failure hook
//!   observed it and the original error is re-raised here
//! - [`InterceptError::AfterCall`] - the post-success transform failed after
//!   a successful call; the failure hook is *not* consulted
//! - [`InterceptError::OnFailure`] - the failure hook itself failed while
//!   handling a call failure; its error supersedes the original
//! - [`InterceptError::Cleanup`] - cleanup failed; supersedes whatever was
//!   already in flight
//!
//! When several stages fail on one invocation's path, the most recent one
//! wins. Nothing is recovered locally and nothing is swallowed.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The single error type surfaced by an intercepted call.
#[derive(Error, Debug)]
pub enum InterceptError {
    /// The pre-call gate raised. The call was never attempted.
    #[error("pre-call gate failed")]
    Gate(#[source] BoxError),

    /// The underlying call raised, or its deferred result faulted.
    #[error("intercepted call failed")]
    Call(#[source] BoxError),

    /// The post-success transform raised after a successful call.
    #[error("post-call transform failed")]
    AfterCall(#[source] BoxError),

    /// The failure hook raised while handling a call failure.
    #[error("failure hook failed")]
    OnFailure(#[source] BoxError),

    /// The cleanup hook raised.
    #[error("cleanup hook failed")]
    Cleanup(#[source] BoxError),

    /// The return slot (or a transform replacement) did not hold the
    /// declared return type. This is a contract violation by the proxy
    /// layer or by an aspect, not a normal failure mode.
    #[error("return value for `{method}` did not match the declared shape `{expected}`")]
    ShapeMismatch {
        /// Name of the intercepted method.
        method: String,
        /// The declared return type the value failed to downcast to.
        expected: &'static str,
    },

    /// The invocation's trigger was already consumed.
    #[error("invocation `{method}` has no pending trigger")]
    MissingTrigger {
        /// Name of the intercepted method.
        method: String,
    },
}

impl InterceptError {
    /// Box this error for delivery through a deferred result.
    pub fn boxed(self) -> BoxError {
        Box::new(self)
    }
}
