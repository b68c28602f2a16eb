use alloc::string::String;
use core::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::Outcome;
use crate::SharedFailure;

/// The outcomes of one run, in suite order.
///
/// `Display` lists every case that failed or errored, followed by a result
/// line:
///
/// ```text
/// FAILED arithmetic
///  ● assertion failed: expected 5, found 4
///  ╰ tests/arithmetic.rs:12:5
///
/// result: FAILED. 3 passed; 1 failed; 0 errored; 0 skipped
/// ```
#[derive(Clone, Debug, Default)]
pub struct Summary {
    outcomes: IndexMap<String, Outcome, FxBuildHasher>,
}

impl Summary {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: IndexMap::with_capacity_and_hasher(capacity, FxBuildHasher),
        }
    }

    pub(super) fn record(&mut self, name: &str, outcome: Outcome) {
        self.outcomes.insert(String::from(name), outcome);
    }

    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.values().filter(|outcome| f(outcome)).count()
    }

    /// Number of cases that passed.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Passed))
    }

    /// Number of cases that produced an
    /// [`AssertionFailed`](crate::AssertionFailed).
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Failed(_)))
    }

    /// Number of cases that panicked with something other than an
    /// [`AssertionFailed`](crate::AssertionFailed).
    #[must_use]
    pub fn errored(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Errored(_)))
    }

    /// Number of cases that were not evaluated.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, Outcome::Skipped))
    }

    /// Total number of cases, evaluated or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` if the suite had no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns `true` if no case failed or errored.
    ///
    /// Skipped cases do not make a run unsuccessful.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.errored() == 0
    }

    /// The outcome of the case named `name`.
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.get(name)
    }

    /// Iterates over all cases and their outcomes in suite order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.outcomes
            .iter()
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    /// Iterates over the failures, in suite order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SharedFailure)> {
        self.iter().filter_map(|(name, outcome)| match outcome {
            Outcome::Failed(failure) => Some((name, failure)),
            _ => None,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, outcome) in self.iter() {
            match outcome {
                Outcome::Failed(failure) => writeln!(f, "FAILED {name}\n{}\n", &**failure)?,
                Outcome::Errored(message) => writeln!(f, "ERRORED {name}: {message}\n")?,
                Outcome::Passed | Outcome::Skipped => {}
            }
        }
        write!(
            f,
            "result: {}. {} passed; {} failed; {} errored; {} skipped",
            if self.is_success() { "ok" } else { "FAILED" },
            self.passed(),
            self.failed(),
            self.errored(),
            self.skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::{AssertionFailed, Detail};

    fn summary() -> Summary {
        let mut summary = Summary::with_capacity(4);
        summary.record("ok", Outcome::Passed);
        summary.record(
            "sum",
            Outcome::Failed(AssertionFailed::from(Detail::mismatch(&5, &4)).into_shared()),
        );
        summary.record("io", Outcome::Errored(String::from("disk on fire")));
        summary.record("later", Outcome::Skipped);
        summary
    }

    #[test]
    fn test_counts() {
        let summary = summary();
        assert_eq!(summary.len(), 4);
        assert_eq!(
            (summary.passed(), summary.failed(), summary.errored(), summary.skipped()),
            (1, 1, 1, 1)
        );
        assert!(!summary.is_success());
        assert!(matches!(summary.outcome("io"), Some(Outcome::Errored(_))));
        assert!(summary.outcome("missing").is_none());
    }

    #[test]
    fn test_iteration_keeps_suite_order() {
        let summary = summary();
        let names: alloc::vec::Vec<&str> = summary.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["ok", "sum", "io", "later"]);
        let failures: alloc::vec::Vec<&str> = summary.failures().map(|(name, _)| name).collect();
        assert_eq!(failures, ["sum"]);
    }

    #[test]
    fn test_display() {
        let text = summary().to_string();
        assert!(text.starts_with("FAILED sum\n"));
        assert!(text.contains("expected 5, found 4"));
        assert!(text.contains("ERRORED io: disk on fire\n"));
        assert!(!text.contains("later"));
        assert!(text.ends_with("result: FAILED. 1 passed; 1 failed; 1 errored; 1 skipped"));
    }

    #[test]
    fn test_empty_is_success() {
        let summary = Summary::default();
        assert!(summary.is_empty());
        assert!(summary.is_success());
        assert_eq!(
            summary.to_string(),
            "result: ok. 0 passed; 0 failed; 0 errored; 0 skipped"
        );
    }
}
