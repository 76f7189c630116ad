//! Testing utilities for Bracket.
//!
//! This module provides utilities to make testing aspects and pipelines
//! easier.
//!
//! # Features
//!
//! - [`RecordingAspect`]: records which hooks fired, in what order, with
//!   what gate state, and can veto or inject failures at any stage
//! - [`InjectedFault`]: the error type raised by injected failures, so
//!   tests can downcast and assert on provenance

use bracket_core::{
    Aspect, BoxError, GateDecision, GateState, InterceptError, Invocation, Transform,
};
use std::any::Any;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// One lifecycle stage of an intercepted call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The pre-call gate.
    Before,
    /// The post-success transform.
    After,
    /// The failure observer.
    OnFailure,
    /// The always-run cleanup.
    Cleanup,
}

/// The error raised by a [`RecordingAspect`] configured to fail at a stage.
#[derive(Error, Debug)]
#[error("injected fault at {0:?}")]
pub struct InjectedFault(
    /// The stage the fault was injected at.
    pub Stage,
);

/// An aspect that records every hook it runs.
///
/// Clones share the same recording, so a test can keep one handle while
/// the pipeline owns another.
///
/// # Example
///
/// ```rust,ignore
/// let probe = RecordingAspect::new().with_state(7);
/// let interceptor = Interceptor::new(probe.clone());
///
/// let _: i32 = interceptor.intercept(invocation)?;
///
/// assert_eq!(probe.stages(), vec![Stage::Before, Stage::After, Stage::Cleanup]);
/// assert_eq!(probe.observed_states(), vec![Some(7), Some(7)]);
/// ```
pub struct RecordingAspect {
    stages: Arc<Mutex<Vec<Stage>>>,
    observed: Arc<Mutex<Vec<Option<u64>>>>,
    veto: bool,
    gate_state: Option<u64>,
    fail_at: Option<Stage>,
}

impl RecordingAspect {
    /// A recording pass-through: proceeds with no state, keeps results.
    pub fn new() -> Self {
        Self {
            stages: Arc::new(Mutex::new(Vec::new())),
            observed: Arc::new(Mutex::new(Vec::new())),
            veto: false,
            gate_state: None,
            fail_at: None,
        }
    }

    /// Veto every call at the gate.
    pub fn vetoing(mut self) -> Self {
        self.veto = true;
        self
    }

    /// Proceed with `tag` as the gate state; later hooks record the tag
    /// they observe (see [`observed_states`](Self::observed_states)).
    pub fn with_state(mut self, tag: u64) -> Self {
        self.gate_state = Some(tag);
        self
    }

    /// Raise an [`InjectedFault`] whenever the given stage runs.
    pub fn failing_at(mut self, stage: Stage) -> Self {
        self.fail_at = Some(stage);
        self
    }

    /// The stages that have run, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.stages.lock().unwrap().clone()
    }

    /// How many times `stage` has run.
    pub fn count(&self, stage: Stage) -> usize {
        self.stages.lock().unwrap().iter().filter(|s| **s == stage).count()
    }

    /// The `u64` gate-state tag observed at each post-gate hook, in order.
    pub fn observed_states(&self) -> Vec<Option<u64>> {
        self.observed.lock().unwrap().clone()
    }

    fn record(&self, stage: Stage) -> Result<(), BoxError> {
        self.stages.lock().unwrap().push(stage);
        if self.fail_at == Some(stage) {
            return Err(Box::new(InjectedFault(stage)));
        }
        Ok(())
    }

    fn observe(&self, state: &GateState) {
        self.observed
            .lock()
            .unwrap()
            .push(state.get::<u64>().copied());
    }
}

impl Default for RecordingAspect {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordingAspect {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
            observed: self.observed.clone(),
            veto: self.veto,
            gate_state: self.gate_state,
            fail_at: self.fail_at,
        }
    }
}

impl Aspect for RecordingAspect {
    fn before_call(&self, _invocation: &mut Invocation) -> Result<GateDecision, BoxError> {
        self.record(Stage::Before)?;
        if self.veto {
            return Ok(GateDecision::veto());
        }
        Ok(match self.gate_state {
            Some(tag) => GateDecision::proceed_with(tag),
            None => GateDecision::proceed(),
        })
    }

    fn after_call(
        &self,
        _invocation: &mut Invocation,
        state: &GateState,
        _result: Option<&dyn Any>,
    ) -> Result<Transform, BoxError> {
        self.observe(state);
        self.record(Stage::After)?;
        Ok(Transform::Keep)
    }

    fn on_failure(
        &self,
        _invocation: &mut Invocation,
        _fault: &InterceptError,
        state: &GateState,
    ) -> Result<(), BoxError> {
        self.observe(state);
        self.record(Stage::OnFailure)?;
        Ok(())
    }

    fn cleanup(&self, _invocation: &mut Invocation, state: &GateState) -> Result<(), BoxError> {
        self.observe(state);
        self.record(Stage::Cleanup)?;
        Ok(())
    }
}
