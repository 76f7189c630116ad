//! # bracket-std
//!
//! Standard implementations for the Bracket call-interception framework.
//!
//! This crate provides:
//! - **Standard aspects**: [`NoopAspect`], [`LoggingAspect`], [`When`],
//!   [`Stacked`]
//! - **Testing utilities**: [`RecordingAspect`] and friends in [`testing`]
//!
//! [`NoopAspect`]: aspects::NoopAspect
//! [`LoggingAspect`]: aspects::LoggingAspect
//! [`When`]: aspects::When
//! [`Stacked`]: aspects::Stacked
//! [`RecordingAspect`]: testing::RecordingAspect

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core
pub use bracket_core;

// Modules
pub mod aspects;
pub mod testing;
