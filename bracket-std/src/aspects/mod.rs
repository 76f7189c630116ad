//! Standard aspect implementations.

mod conditional;
mod logging;
mod stacked;

pub use conditional::When;
pub use logging::LoggingAspect;
pub use stacked::Stacked;

use bracket_core::Aspect;

/// An aspect with all four hooks left at their pass-through defaults.
///
/// Useful as a stacking identity and in tests that only exercise the
/// pipeline itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAspect;

impl Aspect for NoopAspect {}
