//! Lazily evaluated test cases and a runner for them.
//!
//! A [`TestCase`] pairs a name with a body that is not run when the case is
//! created. A [`Runner`] evaluates the cases of a [`Suite`] and sorts each
//! one into an [`Outcome`]:
//!
//! - The body returned `Ok(())`: [`Outcome::Passed`].
//! - The body returned an [`AssertionFailed`], or panicked with one through
//!   [`AssertionFailed::raise`]: [`Outcome::Failed`].
//! - The body panicked with anything else: [`Outcome::Errored`], with the
//!   panic message.
//!
//! ```
//! use lazytest::{
//!     prelude::*,
//!     runner::{Outcome, Runner, RunnerConfig, Suite},
//! };
//!
//! let mut suite = Suite::new();
//! suite
//!     .case("sum", || expect(2 + 2).to_equal(5))?
//!     .case("order", || expect(1 < 2).to_be_true())?
//!     .case("overflow", || {
//!         let values: Vec<u8> = Vec::new();
//!         let fourth = values[3];
//!         expect(fourth).to_equal(0)
//!     })?;
//!
//! let summary = Runner::new(RunnerConfig::default()).run(&suite);
//! assert!(matches!(summary.outcome("sum"), Some(Outcome::Failed(_))));
//! assert!(matches!(summary.outcome("order"), Some(Outcome::Passed)));
//! assert!(matches!(summary.outcome("overflow"), Some(Outcome::Errored(_))));
//! # Ok::<(), lazytest::runner::DuplicateCase>(())
//! ```
//!
//! Panics are caught with [`std::panic::catch_unwind`], so the panic hook
//! still prints them to stderr. Bodies that abort the process cannot be
//! reported.

mod config;
mod summary;

use alloc::{borrow::ToOwned, boxed::Box, format, string::String};
use core::{any::Any, fmt, panic::AssertUnwindSafe};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

pub use self::{config::RunnerConfig, summary::Summary};
use crate::{AssertionFailed, SharedFailure};

type Body = dyn Fn() -> Result<(), AssertionFailed> + Send + Sync;

/// A named test body that runs only when a [`Runner`] evaluates it.
pub struct TestCase {
    name: String,
    body: Box<Body>,
}

impl TestCase {
    /// Creates a case without running `body`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::{AtomicBool, Ordering};
    ///
    /// use lazytest::{prelude::*, runner::TestCase};
    ///
    /// static RAN: AtomicBool = AtomicBool::new(false);
    ///
    /// let case = TestCase::new("lazy", || {
    ///     RAN.store(true, Ordering::SeqCst);
    ///     Ok(())
    /// });
    /// assert!(!RAN.load(Ordering::SeqCst));
    ///
    /// assert!(case.evaluate().is_passed());
    /// assert!(RAN.load(Ordering::SeqCst));
    /// ```
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> Result<(), AssertionFailed> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Box::new(body),
        }
    }

    /// The name of the case.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the body on the current thread and classifies the result.
    #[must_use]
    pub fn evaluate(&self) -> Outcome {
        match std::panic::catch_unwind(AssertUnwindSafe(|| (self.body)())) {
            Ok(Ok(())) => Outcome::Passed,
            Ok(Err(failure)) => Outcome::Failed(failure.into_shared()),
            Err(payload) => Outcome::from_panic(payload),
        }
    }

    fn evaluate_isolated(&self) -> Outcome {
        let thread_name = format!("lazytest:{}", self.name.replace('\0', ""));
        std::thread::scope(|scope| {
            match std::thread::Builder::new()
                .name(thread_name)
                .spawn_scoped(scope, || self.evaluate())
            {
                Ok(handle) => handle.join().unwrap_or_else(Outcome::from_panic),
                Err(error) => Outcome::Errored(format!("failed to spawn a thread: {error}")),
            }
        })
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Returned by [`Suite::add`] when a case with the same name already exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateCase {
    name: String,
}

impl DuplicateCase {
    /// The name that was already taken.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DuplicateCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a case named {:?} is already in the suite", self.name)
    }
}

impl core::error::Error for DuplicateCase {}

/// An ordered collection of uniquely named test cases.
#[derive(Debug, Default)]
pub struct Suite {
    cases: IndexMap<String, TestCase, FxBuildHasher>,
}

impl Suite {
    /// Creates an empty suite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `case` after the cases already in the suite.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateCase`] and leaves the suite unchanged if a case
    /// with the same name was added before.
    pub fn add(&mut self, case: TestCase) -> Result<&mut Self, DuplicateCase> {
        match self.cases.entry(case.name.clone()) {
            indexmap::map::Entry::Occupied(entry) => Err(DuplicateCase {
                name: entry.key().clone(),
            }),
            indexmap::map::Entry::Vacant(entry) => {
                entry.insert(case);
                Ok(self)
            }
        }
    }

    /// Shorthand for `add(TestCase::new(name, body))`.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateCase`] if the name is taken.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::runner::Suite;
    ///
    /// let mut suite = Suite::new();
    /// suite.case("once", || Ok(())).unwrap();
    /// let error = suite.case("once", || Ok(())).unwrap_err();
    /// assert_eq!(error.name(), "once");
    /// assert_eq!(suite.len(), 1);
    /// ```
    pub fn case<F>(&mut self, name: impl Into<String>, body: F) -> Result<&mut Self, DuplicateCase>
    where
        F: Fn() -> Result<(), AssertionFailed> + Send + Sync + 'static,
    {
        self.add(TestCase::new(name, body))
    }

    /// Number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if the suite has no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// The case named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TestCase> {
        self.cases.get(name)
    }

    /// Iterates over the cases in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        self.cases.values()
    }
}

/// How the evaluation of one case ended.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// The body returned `Ok(())`.
    Passed,
    /// The body returned or raised an [`AssertionFailed`].
    Failed(SharedFailure),
    /// The body panicked with something other than an [`AssertionFailed`].
    /// Holds the panic message.
    Errored(String),
    /// The case was filtered out, or came after a failure with
    /// [`fail_fast`](RunnerConfig::fail_fast) set.
    Skipped,
}

impl Outcome {
    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        match payload.downcast::<AssertionFailed>() {
            Ok(failure) => Self::Failed(SharedFailure::new(*failure)),
            Err(payload) => Self::Errored(panic_message(&*payload)),
        }
    }

    /// Returns `true` for [`Outcome::Passed`].
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// The failure, for [`Outcome::Failed`].
    #[must_use]
    pub fn failure(&self) -> Option<&SharedFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked with a non-string payload".to_owned()
    }
}

/// Observes a run as it happens.
///
/// Every method has an empty default, so implementors only pick the events
/// they care about.
pub trait Reporter {
    /// Called once before any case is evaluated.
    fn on_start(&mut self, suite: &Suite) {
        let _ = suite;
    }

    /// Called right before a case is evaluated. Not called for skipped cases.
    fn on_case_start(&mut self, name: &str) {
        let _ = name;
    }

    /// Called once per case, in suite order, skipped cases included.
    fn on_outcome(&mut self, name: &str, outcome: &Outcome) {
        let _ = (name, outcome);
    }

    /// Called once after the last case.
    fn on_finish(&mut self, summary: &Summary) {
        let _ = summary;
    }
}

struct Silent;

impl Reporter for Silent {}

/// Evaluates the cases of a [`Suite`].
#[derive(Clone, Debug, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    /// Creates a runner with `config`.
    #[must_use]
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Creates a runner configured by the `LAZYTEST` environment variable.
    ///
    /// See [`RunnerConfig::from_env`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(RunnerConfig::from_env())
    }

    /// The configuration of this runner.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Evaluates `suite`.
    #[must_use]
    pub fn run(&self, suite: &Suite) -> Summary {
        self.run_reporting(suite, &mut Silent)
    }

    /// Evaluates `suite`, telling `reporter` about every step.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::{
    ///     prelude::*,
    ///     runner::{Outcome, Reporter, Runner, RunnerConfig, Suite},
    /// };
    ///
    /// #[derive(Default)]
    /// struct Names(Vec<String>);
    ///
    /// impl Reporter for Names {
    ///     fn on_outcome(&mut self, name: &str, outcome: &Outcome) {
    ///         if !outcome.is_passed() {
    ///             self.0.push(name.to_owned());
    ///         }
    ///     }
    /// }
    ///
    /// let mut suite = Suite::new();
    /// suite.case("a", || Ok(()))?.case("b", || fail!("nope"))?;
    ///
    /// let mut names = Names::default();
    /// Runner::new(RunnerConfig::default()).run_reporting(&suite, &mut names);
    /// assert_eq!(names.0, ["b"]);
    /// # Ok::<(), lazytest::runner::DuplicateCase>(())
    /// ```
    pub fn run_reporting(&self, suite: &Suite, reporter: &mut dyn Reporter) -> Summary {
        let mut summary = Summary::with_capacity(suite.len());
        let mut stopped = false;
        reporter.on_start(suite);

        for case in suite.iter() {
            let outcome = if stopped || !self.config.selects(case.name()) {
                Outcome::Skipped
            } else {
                reporter.on_case_start(case.name());
                let outcome = if self.config.isolate {
                    case.evaluate_isolated()
                } else {
                    case.evaluate()
                };
                stopped = self.config.fail_fast && !outcome.is_passed();
                outcome
            };
            reporter.on_outcome(case.name(), &outcome);
            summary.record(case.name(), outcome);
        }

        reporter.on_finish(&summary);
        summary
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec::Vec};
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{Detail, expect};

    fn sample_suite() -> Suite {
        let mut suite = Suite::new();
        suite
            .case("passes", || expect(1 + 1).to_equal(2))
            .and_then(|suite| suite.case("fails", || expect(2 + 2).to_equal(5)))
            .and_then(|suite| {
                suite.case("raises", || {
                    AssertionFailed::from(Detail::message("raised")).raise()
                })
            })
            .and_then(|suite| suite.case("panics", || panic!("unrelated {}", 7)))
            .unwrap();
        suite
    }

    fn kinds(summary: &Summary) -> Vec<(&str, &'static str)> {
        summary
            .iter()
            .map(|(name, outcome)| {
                let kind = match outcome {
                    Outcome::Passed => "passed",
                    Outcome::Failed(_) => "failed",
                    Outcome::Errored(_) => "errored",
                    Outcome::Skipped => "skipped",
                };
                (name, kind)
            })
            .collect()
    }

    #[test]
    fn test_suite_send_sync() {
        static_assertions::assert_impl_all!(Suite: Send, Sync);
        static_assertions::assert_impl_all!(Outcome: Send, Sync, Clone);
    }

    #[test]
    fn test_classification() {
        let summary = Runner::default().run(&sample_suite());
        assert_eq!(
            kinds(&summary),
            [
                ("passes", "passed"),
                ("fails", "failed"),
                ("raises", "failed"),
                ("panics", "errored"),
            ]
        );
        let raised = summary.outcome("raises").and_then(Outcome::failure).unwrap();
        assert_eq!(raised.detail(), Some(&Detail::message("raised")));
        assert!(matches!(
            summary.outcome("panics"),
            Some(Outcome::Errored(message)) if message == "unrelated 7"
        ));
    }

    #[test]
    fn test_isolated_matches_inline() {
        let config = RunnerConfig {
            isolate: true,
            ..RunnerConfig::default()
        };
        let isolated = Runner::new(config).run(&sample_suite());
        let inline = Runner::default().run(&sample_suite());
        assert_eq!(kinds(&isolated), kinds(&inline));
    }

    #[test]
    fn test_isolated_thread_is_named() {
        let mut suite = Suite::new();
        suite
            .case("named", || {
                let thread = std::thread::current();
                expect(thread.name()).to_equal(Some("lazytest:named"))
            })
            .unwrap();
        let config = RunnerConfig::parse("isolate");
        assert!(Runner::new(config).run(&suite).is_success());
    }

    #[test]
    fn test_fail_fast_skips_the_rest() {
        let config = RunnerConfig {
            fail_fast: true,
            ..RunnerConfig::default()
        };
        let summary = Runner::new(config).run(&sample_suite());
        assert_eq!(
            kinds(&summary),
            [
                ("passes", "passed"),
                ("fails", "failed"),
                ("raises", "skipped"),
                ("panics", "skipped"),
            ]
        );
    }

    #[test]
    fn test_filtered_cases_are_not_evaluated() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let mut suite = Suite::new();
        suite
            .case("math::add", || {
                CALLS.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .and_then(|suite| {
                suite.case("io::read", || {
                    CALLS.fetch_add(100, Ordering::SeqCst);
                    Ok(())
                })
            })
            .unwrap();

        let summary = Runner::new(RunnerConfig::parse("filter=math")).run(&suite);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(kinds(&summary), [("math::add", "passed"), ("io::read", "skipped")]);
        assert!(summary.is_success());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut suite = Suite::new();
        suite.case("twice", || Ok(())).unwrap();
        let error = suite.case("twice", || fail!("second")).unwrap_err();
        assert_eq!(error.to_string(), "a case named \"twice\" is already in the suite");
        assert_eq!(suite.len(), 1);
        assert!(suite.get("twice").unwrap().evaluate().is_passed());
    }

    #[test]
    fn test_reporter_sees_every_event() {
        #[derive(Default)]
        struct Events(Vec<String>);

        impl Reporter for Events {
            fn on_start(&mut self, suite: &Suite) {
                self.0.push(format!("start {}", suite.len()));
            }

            fn on_case_start(&mut self, name: &str) {
                self.0.push(format!("case {name}"));
            }

            fn on_outcome(&mut self, name: &str, outcome: &Outcome) {
                self.0.push(format!("{name} passed={}", outcome.is_passed()));
            }

            fn on_finish(&mut self, summary: &Summary) {
                self.0.push(format!("finish {}", summary.failed()));
            }
        }

        let mut suite = Suite::new();
        suite
            .case("a", || Ok(()))
            .and_then(|suite| suite.case("b", || fail!()))
            .unwrap();

        let mut events = Events::default();
        let config = RunnerConfig {
            filter: Some("b".to_owned()),
            ..RunnerConfig::default()
        };
        Runner::new(config).run_reporting(&suite, &mut events);
        assert_eq!(
            events.0,
            ["start 2", "a passed=false", "case b", "b passed=false", "finish 1"]
        );
    }
}
