//! One intercepted call: method name, arguments, trigger, return slot.

use crate::error::{BoxError, InterceptError};
use std::any::Any;

/// The one-shot closure that performs the real underlying call.
///
/// Supplied by the proxy layer. It receives the invocation so it can read
/// arguments, and is expected to populate the return slot via
/// [`Invocation::set_return`] before returning (for `()`-returning calls
/// the slot stays empty).
pub type Trigger = Box<dyn FnOnce(&mut Invocation) -> Result<(), BoxError> + Send>;

/// A single intercepted call.
///
/// Owned by the proxy layer, handed to the pipeline by value for the
/// duration of one intercept. The pipeline threads it through the hooks
/// (mutably, so hooks may inspect or rewrite arguments) and drops it when
/// the invocation settles; on deferred paths it travels inside the combined
/// deferred result until completion.
///
/// # Example
///
/// ```rust,ignore
/// let invocation = Invocation::new("scale", |inv| {
///     let by = *inv.arg::<i32>(0).unwrap_or(&1);
///     inv.set_return(base * by);
///     Ok(())
/// })
/// .with_args(vec![Box::new(3i32)]);
/// ```
pub struct Invocation {
    method: String,
    args: Vec<Box<dyn Any + Send>>,
    slot: Option<Box<dyn Any + Send>>,
    trigger: Option<Trigger>,
}

impl Invocation {
    /// Create an invocation for `method` whose real call is performed by
    /// `trigger`.
    pub fn new<F>(method: impl Into<String>, trigger: F) -> Self
    where
        F: FnOnce(&mut Invocation) -> Result<(), BoxError> + Send + 'static,
    {
        Self {
            method: method.into(),
            args: Vec::new(),
            slot: None,
            trigger: Some(Box::new(trigger)),
        }
    }

    /// Attach the argument list.
    pub fn with_args(mut self, args: Vec<Box<dyn Any + Send>>) -> Self {
        self.args = args;
        self
    }

    /// Name of the intercepted method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The opaque argument list.
    pub fn args(&self) -> &[Box<dyn Any + Send>] {
        &self.args
    }

    /// Downcast argument `index`.
    pub fn arg<T: Any>(&self, index: usize) -> Option<&T> {
        self.args.get(index).and_then(|a| a.downcast_ref())
    }

    /// Populate the return slot. Called by the trigger.
    pub fn set_return<R: Any + Send>(&mut self, value: R) {
        self.slot = Some(Box::new(value));
    }

    /// Inspect the return slot without consuming it.
    pub fn return_value<R: Any>(&self) -> Option<&R> {
        self.slot.as_ref().and_then(|v| v.downcast_ref())
    }

    /// Perform the real call by consuming the trigger.
    ///
    /// Errs with [`InterceptError::MissingTrigger`] if the trigger was
    /// already consumed; any error from the trigger itself is passed
    /// through untouched for the pipeline to classify.
    pub(crate) fn proceed(&mut self) -> Result<(), BoxError> {
        let trigger = self.trigger.take().ok_or_else(|| {
            InterceptError::MissingTrigger {
                method: self.method.clone(),
            }
            .boxed()
        })?;
        trigger(self)
    }

    /// Take the populated return slot out of the invocation.
    pub(crate) fn take_return(&mut self) -> Option<Box<dyn Any + Send>> {
        self.slot.take()
    }
}

impl std::fmt::Debug for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invocation")
            .field("method", &self.method)
            .field("args", &self.args.len())
            .field("returned", &self.slot.is_some())
            .field("triggered", &self.trigger.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_populates_slot() {
        let mut inv = Invocation::new("double", |inv| {
            let n = *inv.arg::<i32>(0).unwrap();
            inv.set_return(n * 2);
            Ok(())
        })
        .with_args(vec![Box::new(21i32)]);

        inv.proceed().unwrap();
        assert_eq!(inv.return_value::<i32>(), Some(&42));
    }

    #[test]
    fn trigger_is_one_shot() {
        let mut inv = Invocation::new("noop", |_| Ok(()));
        inv.proceed().unwrap();
        let err = inv.proceed().unwrap_err();
        let err = err.downcast::<InterceptError>().unwrap();
        assert!(matches!(*err, InterceptError::MissingTrigger { .. }));
    }
}
