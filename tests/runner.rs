use std::sync::atomic::{AtomicUsize, Ordering};

use lazytest::{
    Detail,
    prelude::*,
    runner::{Outcome, Runner, RunnerConfig, Suite},
};

fn arithmetic_suite() -> Suite {
    let mut suite = Suite::new();
    suite
        .case("two plus two is five", || expect(2 + 2).to_equal(5))
        .and_then(|suite| suite.case("one is less than two", || expect(1 < 2).to_be_true()))
        .and_then(|suite| {
            suite.case("raised from a callback", || {
                let values = [3, 1, 2];
                let mut sorted = values;
                sorted.sort_by(|a, b| {
                    if a == b {
                        AssertionFailed::from(Detail::message("duplicate key")).raise()
                    }
                    a.cmp(b)
                });
                expect(sorted).to_equal([1, 2, 3])?;
                AssertionFailed::from(Detail::message("sorted without duplicates")).raise()
            })
        })
        .and_then(|suite| {
            suite.case("unrelated panic", || {
                let divisor = std::hint::black_box(0);
                expect(10 / divisor).to_equal(0)
            })
        })
        .unwrap();
    suite
}

#[test]
fn failing_comparison_is_reported_as_failed() {
    let summary = Runner::new(RunnerConfig::default()).run(&arithmetic_suite());

    let failure = summary
        .outcome("two plus two is five")
        .and_then(Outcome::failure)
        .unwrap();
    assert_eq!(failure.detail(), Some(&Detail::mismatch(&5, &4)));
    assert!(failure.location().file().ends_with("runner.rs"));
}

#[test]
fn passing_assertion_is_reported_as_passed() {
    let summary = Runner::new(RunnerConfig::default()).run(&arithmetic_suite());
    assert!(matches!(
        summary.outcome("one is less than two"),
        Some(Outcome::Passed)
    ));
}

#[test]
fn raised_failure_is_recovered_with_its_detail() {
    let summary = Runner::new(RunnerConfig::default()).run(&arithmetic_suite());
    let failure = summary
        .outcome("raised from a callback")
        .and_then(Outcome::failure)
        .unwrap();
    assert_eq!(
        failure.detail(),
        Some(&Detail::message("sorted without duplicates"))
    );
}

#[test]
fn unrelated_panic_is_not_an_assertion_failure() {
    let summary = Runner::new(RunnerConfig::default()).run(&arithmetic_suite());
    match summary.outcome("unrelated panic") {
        Some(Outcome::Errored(message)) => assert!(message.contains("divide by zero")),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(
        (summary.passed(), summary.failed(), summary.errored()),
        (1, 2, 1)
    );
}

#[test]
fn isolated_run_agrees_with_inline_run() {
    let inline = Runner::new(RunnerConfig::default()).run(&arithmetic_suite());
    let isolated = Runner::new(RunnerConfig::parse("isolate")).run(&arithmetic_suite());
    for ((name, left), (other, right)) in inline.iter().zip(isolated.iter()) {
        assert_eq!(name, other);
        assert_eq!(
            core::mem::discriminant(left),
            core::mem::discriminant(right),
            "{name}"
        );
    }
}

#[test]
fn case_bodies_run_only_when_evaluated() {
    static EVALUATIONS: AtomicUsize = AtomicUsize::new(0);

    let mut suite = Suite::new();
    for name in ["first", "second", "third"] {
        suite
            .case(name, || {
                EVALUATIONS.fetch_add(1, Ordering::SeqCst);
                fail!("always")
            })
            .unwrap();
    }
    assert_eq!(EVALUATIONS.load(Ordering::SeqCst), 0);

    let summary = Runner::new(RunnerConfig::parse("fail-fast")).run(&suite);
    assert_eq!(EVALUATIONS.load(Ordering::SeqCst), 1);
    assert_eq!((summary.failed(), summary.skipped()), (1, 2));

    let summary = Runner::new(RunnerConfig::parse("filter=ir")).run(&suite);
    assert_eq!(EVALUATIONS.load(Ordering::SeqCst), 3);
    assert!(matches!(summary.outcome("second"), Some(Outcome::Skipped)));
}

#[test]
fn summary_lists_what_went_wrong() {
    let summary = Runner::new(RunnerConfig::default()).run(&arithmetic_suite());
    let text = summary.to_string();
    assert!(text.contains("FAILED two plus two is five"));
    assert!(text.contains("assertion failed: expected 5, found 4"));
    assert!(text.contains("ERRORED unrelated panic"));
    assert!(!text.contains("one is less than two"));
    assert!(text.ends_with("result: FAILED. 1 passed; 2 failed; 1 errored; 0 skipped"));
}
