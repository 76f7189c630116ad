//! Aspect composition.

use bracket_core::{
    Aspect, BoxError, GateDecision, GateState, InterceptError, Invocation, Transform,
};
use std::any::Any;
use std::sync::Arc;

/// One gate state per stacked aspect, in registration order.
struct Frames(Vec<GateState>);

/// Composes several aspects into one.
///
/// Ordering follows the usual wrapping intuition: gates run in
/// registration order (outermost first) and the post-call hooks unwind in
/// reverse. Specifically:
///
/// - **Gates**: in order; the first veto vetoes the whole call, and
///   aspects whose gate never ran owe nothing downstream.
/// - **Transforms**: in reverse; a later-running (inner-registered)
///   replacement is what the earlier-registered aspects see.
/// - **Failure observers**: in reverse; the first error supersedes the
///   original and stops the chain.
/// - **Cleanups**: in reverse; all run, and the last error wins.
#[derive(Default)]
pub struct Stacked {
    aspects: Vec<Arc<dyn Aspect>>,
}

impl Stacked {
    /// An empty stack, which behaves as a pass-through aspect.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an aspect to the stack.
    pub fn push(mut self, aspect: impl Aspect) -> Self {
        self.aspects.push(Arc::new(aspect));
        self
    }

    /// Add an already-shared aspect to the stack.
    pub fn push_arc(mut self, aspect: Arc<dyn Aspect>) -> Self {
        self.aspects.push(aspect);
        self
    }

    fn unwound<'a>(
        &'a self,
        frames: &'a Frames,
    ) -> impl Iterator<Item = (&'a Arc<dyn Aspect>, &'a GateState)> {
        self.aspects.iter().zip(&frames.0).rev()
    }
}

impl Aspect for Stacked {
    fn before_call(&self, invocation: &mut Invocation) -> Result<GateDecision, BoxError> {
        let mut frames = Vec::with_capacity(self.aspects.len());
        for aspect in &self.aspects {
            let decision = aspect.before_call(invocation)?;
            if !decision.should_proceed() {
                return Ok(GateDecision::veto());
            }
            frames.push(decision.into_state());
        }
        Ok(GateDecision::proceed_with(Frames(frames)))
    }

    fn after_call(
        &self,
        invocation: &mut Invocation,
        state: &GateState,
        result: Option<&dyn Any>,
    ) -> Result<Transform, BoxError> {
        let Some(frames) = state.get::<Frames>() else {
            return Ok(Transform::Keep);
        };
        let mut replacement: Option<Box<dyn Any + Send>> = None;
        for (aspect, frame) in self.unwound(frames) {
            let view = replacement.as_ref().map(|v| &**v as &dyn Any).or(result);
            match aspect.after_call(invocation, frame, view)? {
                Transform::Keep => {}
                Transform::Replace(value) => replacement = Some(value),
            }
        }
        Ok(match replacement {
            Some(value) => Transform::Replace(value),
            None => Transform::Keep,
        })
    }

    fn on_failure(
        &self,
        invocation: &mut Invocation,
        fault: &InterceptError,
        state: &GateState,
    ) -> Result<(), BoxError> {
        let Some(frames) = state.get::<Frames>() else {
            return Ok(());
        };
        for (aspect, frame) in self.unwound(frames) {
            aspect.on_failure(invocation, fault, frame)?;
        }
        Ok(())
    }

    fn cleanup(&self, invocation: &mut Invocation, state: &GateState) -> Result<(), BoxError> {
        let Some(frames) = state.get::<Frames>() else {
            return Ok(());
        };
        let mut last_error = None;
        for (aspect, frame) in self.unwound(frames) {
            if let Err(e) = aspect.cleanup(invocation, frame) {
                last_error = Some(e);
            }
        }
        match last_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
