//! Registers a process-wide failure formatter, so it lives in its own test
//! binary with a single test.

use core::fmt;

use lazytest::{
    Detail,
    hooks::failure_formatter::{
        DefaultFailureFormatter, FailureFormatter, FailureView, register_failure_formatter,
        reset_failure_formatter,
    },
    prelude::*,
};

struct OneLine;

impl FailureFormatter for OneLine {
    fn format(&self, failure: FailureView<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FAIL line {}", failure.location().line())?;
        if let Some(detail) = failure.detail() {
            write!(f, ": {detail}")?;
        }
        for note in failure.notes() {
            write!(f, " [{note}]")?;
        }
        Ok(())
    }
}

#[test]
fn registered_formatter_replaces_the_default_layout() {
    let line = line!() + 1;
    let failure = expect(2 + 2).because("basic math").to_equal(5).unwrap_err();
    let default = failure.to_string();
    assert!(default.starts_with(" ● assertion failed: expected 5, found 4\n ├ "));

    register_failure_formatter(OneLine);
    assert_eq!(
        failure.to_string(),
        format!("FAIL line {line}: expected 5, found 4 [basic math]")
    );

    // The one-line alternate form and explicit layouts ignore the hook.
    assert_eq!(format!("{failure:#}"), "assertion failed: expected 5, found 4");
    let explicit = failure.format_with(&DefaultFailureFormatter::DEFAULT).to_string();
    assert_eq!(explicit, default);

    let bare = AssertionFailed::from(Detail::message("x")).note("n");
    assert!(bare.to_string().starts_with("FAIL line "));

    reset_failure_formatter();
    assert_eq!(failure.to_string(), default);
}
