//! # bracket-core
//!
//! Core types and the dispatch pipeline for the Bracket call-interception
//! framework.
//!
//! This crate has minimal dependencies and is what proxy layers and aspect
//! implementations import; standard aspects and testing utilities live in
//! `bracket-std`.
//!
//! # Architecture
//!
//! An intercepted call flows through four stages:
//!
//! ## Stage 1: Classification ([`Returnable`] / [`ReturnShape`])
//!
//! The declared return type is classified once, before the call, into one
//! of six shapes: void, value, and heap/stack deferred variants of each.
//! Classification is pure and closed — only the built-in [`Deferred`] and
//! [`LightDeferred`] types count as awaitable; everything else is an
//! ordinary value the pipeline hands back untouched.
//!
//! ## Stage 2: Gate ([`Aspect::before_call`] / [`GateDecision`])
//!
//! The gate runs before the call. A veto short-circuits the pipeline and
//! the caller receives the shape's default-completed value, synthesized by
//! [`synthesize`]; no other hook runs.
//!
//! ## Stage 3: Dispatch ([`Interceptor`])
//!
//! Inline shapes run the call and the remaining hooks before `intercept`
//! returns. Deferred shapes immediately hand back a combined deferred that
//! awaits the underlying completion exactly once and then runs the same
//! hooks; the value-carrying deferred shapes route through a process-wide,
//! write-once dispatcher cache keyed by the concrete return type.
//!
//! ## Stage 4: Settlement ([`Aspect::after_call`] et al.)
//!
//! Exactly one of the transform/failure hooks runs per invocation,
//! followed by cleanup, with last-raised-wins error supersession. Every
//! failure surfaces as one [`InterceptError`] tagged with the stage that
//! raised it.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod aspect;
mod deferred;
mod dispatch;
mod error;
mod gate;
mod invocation;
mod pipeline;
mod shape;
mod synth;

// Re-exports
pub use aspect::{Aspect, Transform};
pub use deferred::{Deferred, LightDeferred};
pub use dispatch::{Continuation, DispatcherFn, cached_dispatcher_count};
pub use error::{BoxError, InterceptError};
pub use gate::{GateDecision, GateState};
pub use invocation::{Invocation, Trigger};
pub use pipeline::Interceptor;
pub use shape::{Returnable, ReturnShape, classify};
pub use synth::synthesize;
