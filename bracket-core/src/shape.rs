//! Return-shape classification.
//!
//! Every intercepted call declares a return type, and the pipeline needs to
//! know — before the call is made — whether that type completes inline or
//! later, and whether it carries a value. [`Returnable`] answers both via a
//! pure, deterministic classification into one of six [`ReturnShape`]s.
//!
//! Only the built-in deferred types ([`Deferred`], [`LightDeferred`]) are
//! classified as awaitable. Any other type — including user-defined
//! deferred-like types and raw futures — classifies as [`ReturnShape::Value`]
//! and is handed back untouched: the pipeline does not await what it does
//! not own the semantics of.

use crate::deferred::{Deferred, LightDeferred};
use crate::dispatch::DispatcherFn;
use std::any::TypeId;

/// The classified category of a call's declared return type.
///
/// Computed once per invocation, immutable thereafter. The value-carrying
/// deferred shapes record the `TypeId` of the concrete inner type, which
/// keys the dispatch cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnShape {
    /// The call returns nothing (`()`).
    Void,
    /// The call returns an ordinary value, delivered inline.
    Value,
    /// The call returns a heap deferred with no value (`Deferred<()>`).
    DeferredVoid,
    /// The call returns a heap deferred carrying a value (`Deferred<T>`).
    DeferredValue(TypeId),
    /// The call returns a stack-friendly deferred with no value.
    LightDeferredVoid,
    /// The call returns a stack-friendly deferred carrying a value.
    LightDeferredValue(TypeId),
}

impl ReturnShape {
    /// Whether the pipeline must await a deferred completion.
    pub fn is_awaitable(self) -> bool {
        !matches!(self, ReturnShape::Void | ReturnShape::Value)
    }

    /// Whether the shape delivers a value to the post-call transform.
    pub fn carries_value(self) -> bool {
        matches!(
            self,
            ReturnShape::Value | ReturnShape::DeferredValue(_) | ReturnShape::LightDeferredValue(_)
        )
    }
}

/// A type that an intercepted call may declare as its return type.
///
/// The default `shape` body classifies as [`ReturnShape::Value`], so opting
/// a plain type in is one empty impl:
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Report { lines: Vec<String> }
///
/// impl Returnable for Report {}
/// ```
///
/// The `Default` bound is what a vetoed call falls back to: the caller
/// receives the declared shape's "nothing happened" value without the call
/// ever running.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be declared as an intercepted return type",
    label = "missing `Returnable` implementation",
    note = "Plain value types opt in with an empty impl: `impl Returnable for {Self} {{}}` (requires `Default + Send + 'static`)."
)]
pub trait Returnable: Default + Send + 'static {
    /// Classify this type into one of the six return shapes.
    fn shape() -> ReturnShape {
        ReturnShape::Value
    }

    /// The cached dispatcher for value-carrying deferred shapes.
    /// `None` for every other shape.
    #[doc(hidden)]
    fn dispatcher() -> Option<DispatcherFn> {
        None
    }
}

/// Classify a declared return type. Pure; no side effects.
pub fn classify<R: Returnable>() -> ReturnShape {
    R::shape()
}

impl Returnable for () {
    fn shape() -> ReturnShape {
        ReturnShape::Void
    }
}

impl<T: Default + Send + 'static> Returnable for Deferred<T> {
    fn shape() -> ReturnShape {
        if TypeId::of::<T>() == TypeId::of::<()>() {
            ReturnShape::DeferredVoid
        } else {
            ReturnShape::DeferredValue(TypeId::of::<T>())
        }
    }

    fn dispatcher() -> Option<DispatcherFn> {
        Self::shape()
            .carries_value()
            .then_some(crate::dispatch::deferred_dispatcher::<T> as DispatcherFn)
    }
}

impl<T: Default + Send + 'static> Returnable for LightDeferred<T> {
    fn shape() -> ReturnShape {
        if TypeId::of::<T>() == TypeId::of::<()>() {
            ReturnShape::LightDeferredVoid
        } else {
            ReturnShape::LightDeferredValue(TypeId::of::<T>())
        }
    }

    fn dispatcher() -> Option<DispatcherFn> {
        Self::shape()
            .carries_value()
            .then_some(crate::dispatch::light_deferred_dispatcher::<T> as DispatcherFn)
    }
}

// Common value types
impl Returnable for bool {}
impl Returnable for char {}
impl Returnable for i8 {}
impl Returnable for i16 {}
impl Returnable for i32 {}
impl Returnable for i64 {}
impl Returnable for i128 {}
impl Returnable for isize {}
impl Returnable for u8 {}
impl Returnable for u16 {}
impl Returnable for u32 {}
impl Returnable for u64 {}
impl Returnable for u128 {}
impl Returnable for usize {}
impl Returnable for f32 {}
impl Returnable for f64 {}
impl Returnable for String {}
impl Returnable for &'static str {}
impl<T: Default + Send + 'static> Returnable for Box<T> {}
impl<T: Send + 'static> Returnable for Vec<T> {}
impl<T: Send + 'static> Returnable for Option<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_all_six_shapes() {
        assert_eq!(classify::<()>(), ReturnShape::Void);
        assert_eq!(classify::<i32>(), ReturnShape::Value);
        assert_eq!(classify::<Deferred<()>>(), ReturnShape::DeferredVoid);
        assert_eq!(
            classify::<Deferred<i32>>(),
            ReturnShape::DeferredValue(TypeId::of::<i32>())
        );
        assert_eq!(
            classify::<LightDeferred<()>>(),
            ReturnShape::LightDeferredVoid
        );
        assert_eq!(
            classify::<LightDeferred<String>>(),
            ReturnShape::LightDeferredValue(TypeId::of::<String>())
        );
    }

    #[test]
    fn foreign_deferred_like_types_are_plain_values() {
        // A deferred wrapped in anything else is not awaited by the pipeline.
        assert_eq!(classify::<Option<Deferred<i32>>>(), ReturnShape::Value);
        assert_eq!(classify::<Vec<Deferred<()>>>(), ReturnShape::Value);
    }

    #[test]
    fn only_value_carrying_deferreds_have_dispatchers() {
        assert!(<Deferred<i32>>::dispatcher().is_some());
        assert!(<LightDeferred<i32>>::dispatcher().is_some());
        assert!(<Deferred<()>>::dispatcher().is_none());
        assert!(<LightDeferred<()>>::dispatcher().is_none());
        assert!(<i32 as Returnable>::dispatcher().is_none());
    }

    #[test]
    fn shape_predicates() {
        assert!(!ReturnShape::Void.is_awaitable());
        assert!(!ReturnShape::Void.carries_value());
        assert!(ReturnShape::Value.carries_value());
        assert!(ReturnShape::DeferredVoid.is_awaitable());
        assert!(ReturnShape::DeferredValue(TypeId::of::<u8>()).carries_value());
    }
}
