//! # bracket - Call Interception Around Any Return Shape
//!
//! `bracket` wraps method calls — synchronous, or returning one of several
//! deferred-completion shapes — with four lifecycle hooks: a pre-call gate,
//! a post-success transform, an on-failure observer, and an always-run
//! cleanup. The caller never special-cases "is this async, and does it
//! carry a value": the pipeline classifies the declared return type once
//! and attaches the hooks on the right side of the completion.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bracket::{Aspect, Deferred, Interceptor, Invocation};
//!
//! #[derive(Default)]
//! struct Audit;
//! impl Aspect for Audit { /* override the hooks you care about */ }
//!
//! let interceptor = Interceptor::new(Audit);
//!
//! // A deferred-value call; the caller gets back a combined deferred
//! // whose completion subsumes the call and the hooks.
//! let invocation = Invocation::new("total", |inv| {
//!     inv.set_return(Deferred::new(async { Ok(compute().await?) }));
//!     Ok(())
//! });
//! let total: Deferred<u64> = interceptor.intercept(invocation)?;
//! ```

#![warn(missing_docs)]

pub use bracket_core::{
    // Hooks
    Aspect,
    // Errors
    BoxError,
    // Dispatch cache machinery
    Continuation,
    // Deferred results
    Deferred,
    DispatcherFn,
    // Gate
    GateDecision,
    GateState,
    InterceptError,
    // Pipeline
    Interceptor,
    // Invocation
    Invocation,
    LightDeferred,
    // Classification
    Returnable,
    ReturnShape,
    Transform,
    Trigger,
    cached_dispatcher_count,
    classify,
    synthesize,
};

/// Standard aspect implementations.
pub mod aspects {
    pub use bracket_std::aspects::{LoggingAspect, NoopAspect, Stacked, When};
}

/// Testing utilities.
pub mod testing {
    pub use bracket_std::testing::{InjectedFault, RecordingAspect, Stage};
}

/// Prelude module - common imports for Bracket.
///
/// # Usage
///
/// ```rust,ignore
/// use bracket::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Aspect,
        BoxError,
        Deferred,
        GateDecision,
        GateState,
        InterceptError,
        Interceptor,
        Invocation,
        LightDeferred,
        Returnable,
        ReturnShape,
        Transform,
    };
}
