//! The inline (`Void`/`Value`) pipeline paths: everything settles before
//! `intercept` returns.

use bracket::testing::{InjectedFault, RecordingAspect, Stage};
use bracket::{InterceptError, Interceptor, Invocation, Returnable};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

mod common;
use common::{Doubling, failing_value_call, value_call, void_call};

#[test]
fn value_success_passes_through() {
    let probe = RecordingAspect::new();
    let interceptor = Interceptor::new(probe.clone());

    let out: i32 = interceptor.intercept(value_call(42)).unwrap();

    assert_eq!(out, 42);
    assert_eq!(
        probe.stages(),
        vec![Stage::Before, Stage::After, Stage::Cleanup],
        "success path is before -> after -> cleanup, no failure hook"
    );
}

#[test]
fn void_success_runs_the_call_and_the_hooks() {
    let performed = Arc::new(AtomicBool::new(false));
    let probe = RecordingAspect::new();
    let interceptor = Interceptor::new(probe.clone());

    interceptor
        .intercept::<()>(void_call(performed.clone()))
        .unwrap();

    assert!(performed.load(Ordering::SeqCst));
    assert_eq!(
        probe.stages(),
        vec![Stage::Before, Stage::After, Stage::Cleanup]
    );
}

#[test]
fn veto_synthesizes_the_default_and_runs_nothing_else() {
    let probe = RecordingAspect::new().vetoing();
    let interceptor = Interceptor::new(probe.clone());

    let out: i32 = interceptor.intercept(value_call(42)).unwrap();

    assert_eq!(out, 0);
    assert_eq!(probe.stages(), vec![Stage::Before]);
}

#[test]
fn veto_never_performs_the_call() {
    let performed = Arc::new(AtomicBool::new(false));
    let interceptor = Interceptor::new(RecordingAspect::new().vetoing());

    interceptor
        .intercept::<()>(void_call(performed.clone()))
        .unwrap();

    assert!(!performed.load(Ordering::SeqCst));
}

#[test]
fn veto_of_a_custom_value_type_uses_its_default() {
    #[derive(Debug, Default, PartialEq)]
    struct Report {
        lines: Vec<String>,
    }
    impl Returnable for Report {}

    let interceptor = Interceptor::new(RecordingAspect::new().vetoing());
    let out: Report = interceptor
        .intercept(Invocation::new("report", |inv| {
            inv.set_return(Report {
                lines: vec!["never happens".into()],
            });
            Ok(())
        }))
        .unwrap();

    assert_eq!(out, Report::default());
}

#[test]
fn call_failure_runs_failure_then_cleanup_then_reraises() {
    let probe = RecordingAspect::new();
    let interceptor = Interceptor::new(probe.clone());

    let err = interceptor
        .intercept::<i32>(failing_value_call("db down"))
        .unwrap_err();

    let InterceptError::Call(source) = err else {
        panic!("expected the original call failure, got {err:?}");
    };
    assert_eq!(source.to_string(), "db down");
    assert_eq!(
        probe.stages(),
        vec![Stage::Before, Stage::OnFailure, Stage::Cleanup],
        "failure path is before -> (call) -> on_failure -> cleanup"
    );
    assert_eq!(probe.count(Stage::OnFailure), 1);
    assert_eq!(probe.count(Stage::Cleanup), 1);
}

#[test]
fn void_call_failure_runs_failure_then_cleanup() {
    let probe = RecordingAspect::new();
    let interceptor = Interceptor::new(probe.clone());

    let err = interceptor
        .intercept::<()>(Invocation::new("void_call", |_| Err("disk full".into())))
        .unwrap_err();

    let InterceptError::Call(source) = err else {
        panic!("expected the original call failure, got {err:?}");
    };
    assert_eq!(source.to_string(), "disk full");
    assert_eq!(
        probe.stages(),
        vec![Stage::Before, Stage::OnFailure, Stage::Cleanup],
        "a void call failure takes the same failure path as a value one"
    );
}

#[test]
fn mistyped_return_slot_is_a_shape_mismatch() {
    let interceptor = Interceptor::new(RecordingAspect::new());

    let err = interceptor
        .intercept::<i32>(Invocation::new("value_call", |inv| {
            inv.set_return("not an i32");
            Ok(())
        }))
        .unwrap_err();

    let InterceptError::ShapeMismatch { method, .. } = err else {
        panic!("expected a shape mismatch, got {err:?}");
    };
    assert_eq!(method, "value_call");
}

#[test]
fn gate_failure_skips_every_other_hook() {
    let probe = RecordingAspect::new().failing_at(Stage::Before);
    let interceptor = Interceptor::new(probe.clone());

    let err = interceptor.intercept::<i32>(value_call(1)).unwrap_err();

    assert!(matches!(err, InterceptError::Gate(_)));
    assert_eq!(
        probe.stages(),
        vec![Stage::Before],
        "no call, no cleanup when the gate itself fails"
    );
}

#[test]
fn transform_failure_skips_on_failure_but_not_cleanup() {
    let probe = RecordingAspect::new().failing_at(Stage::After);
    let interceptor = Interceptor::new(probe.clone());

    let err = interceptor.intercept::<i32>(value_call(1)).unwrap_err();

    assert!(matches!(err, InterceptError::AfterCall(_)));
    assert_eq!(
        probe.stages(),
        vec![Stage::Before, Stage::After, Stage::Cleanup],
        "on_failure is not consulted for a transform failure"
    );
}

#[test]
fn failure_hook_failure_supersedes_the_original() {
    let probe = RecordingAspect::new().failing_at(Stage::OnFailure);
    let interceptor = Interceptor::new(probe.clone());

    let err = interceptor
        .intercept::<i32>(failing_value_call("original"))
        .unwrap_err();

    let InterceptError::OnFailure(source) = err else {
        panic!("expected the failure hook's error to win, got {err:?}");
    };
    assert!(source.downcast_ref::<InjectedFault>().is_some());
    assert_eq!(
        probe.stages(),
        vec![Stage::Before, Stage::OnFailure, Stage::Cleanup],
        "cleanup still runs exactly once"
    );
}

#[test]
fn cleanup_failure_supersedes_everything() {
    let probe = RecordingAspect::new().failing_at(Stage::Cleanup);
    let interceptor = Interceptor::new(probe.clone());

    // Supersedes a success...
    let err = interceptor.intercept::<i32>(value_call(1)).unwrap_err();
    assert!(matches!(err, InterceptError::Cleanup(_)));

    // ...and supersedes a call failure.
    let err = interceptor
        .intercept::<i32>(failing_value_call("original"))
        .unwrap_err();
    assert!(matches!(err, InterceptError::Cleanup(_)));
}

#[test]
fn state_reaches_every_later_hook_unchanged() {
    let probe = RecordingAspect::new().with_state(7);
    let interceptor = Interceptor::new(probe.clone());

    let _: i32 = interceptor.intercept(value_call(1)).unwrap();
    let _ = interceptor.intercept::<i32>(failing_value_call("x"));

    // Success path observes at after + cleanup; failure path at
    // on_failure + cleanup. All four observations carry the tag.
    assert_eq!(
        probe.observed_states(),
        vec![Some(7), Some(7), Some(7), Some(7)]
    );
}

#[test]
fn transform_replaces_the_delivered_value() {
    let interceptor = Interceptor::new(Doubling);
    let out: i32 = interceptor.intercept(value_call(21)).unwrap();
    assert_eq!(out, 42);
}
