#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Tracing integration for lazytest.
//!
//! This crate connects lazytest to `tracing` in two directions:
//!
//! - [`TracingReporter`] logs a test run as `tracing` events, one per case,
//!   and evaluates every case inside a `case` span.
//! - [`SpanExt::attach_span`] records the active spans on a failure as a
//!   note, so a failure shows which operation was running when it happened.
//!
//! # Quick Start
//!
//! ```
//! use lazytest::{
//!     prelude::*,
//!     runner::{Runner, RunnerConfig, Suite},
//! };
//! use lazytest_tracing::{LazytestLayer, SpanExt, TracingReporter};
//! use tracing_subscriber::{Registry, layer::SubscriberExt};
//!
//! // 1. Set up tracing with LazytestLayer (required for span fields)
//! let subscriber = Registry::default()
//!     .with(LazytestLayer)
//!     .with(tracing_subscriber::fmt::layer());
//! tracing::subscriber::set_global_default(subscriber).expect("failed to set subscriber");
//!
//! // 2. Attach spans where failures are created
//! #[tracing::instrument(fields(row = 3))]
//! fn check_row() -> Result<(), AssertionFailed> {
//!     expect(2 + 2).to_equal(5).attach_span()
//! }
//!
//! // 3. Run with the tracing reporter
//! let mut suite = Suite::new();
//! suite.case("rows", check_row).unwrap();
//! let summary = Runner::new(RunnerConfig::default())
//!     .run_reporting(&suite, &mut TracingReporter::new());
//! assert_eq!(summary.failed(), 1);
//! ```
//!
//! The failure then reads:
//!
//! ```text
//!  ● assertion failed: expected 5, found 4
//!  ├ src/rows.rs:9:5
//!  ╰ tracing spans:
//!    check_row{row=3}
//!    case{name="rows"}
//! ```
//!
//! # Environment Variables
//!
//! - `LAZYTEST_TRACING` - Comma-separated options:
//!   - `ascii` - Render failures in logged events with the ASCII layout

use std::{
    fmt::{self, Write},
    sync::OnceLock,
};

use lazytest::{
    AssertionFailed,
    hooks::failure_formatter::DefaultFailureFormatter,
    runner::{Outcome, Reporter, Suite, Summary},
};
use tracing::{
    Span,
    field::{Field, Visit},
    span::EnteredSpan,
};
use tracing_subscriber::registry::LookupSpan;

/// Captured field values for a span.
#[derive(Clone, Debug)]
struct CapturedFields(String);

struct FieldVisitor<'a> {
    output: &'a mut String,
}

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if !self.output.is_empty() {
            self.output.push(' ');
        }
        let _ = write!(self.output, "{}={:?}", field.name(), value);
    }
}

/// A tracing layer that captures span field values for failures.
///
/// **Required for span fields.** Without it, [`describe_span`] and
/// [`SpanExt::attach_span`] still list span names but not their fields. Add
/// it to your subscriber next to your other layers; it does not affect them.
///
/// # Examples
///
/// ```
/// use lazytest_tracing::LazytestLayer;
/// use tracing_subscriber::{Registry, layer::SubscriberExt};
///
/// let subscriber = Registry::default()
///     .with(LazytestLayer)
///     .with(tracing_subscriber::fmt::layer());
///
/// tracing::subscriber::set_global_default(subscriber).expect("failed to set subscriber");
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct LazytestLayer;

impl<S> tracing_subscriber::Layer<S> for LazytestLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = String::new();
        attrs.record(&mut FieldVisitor {
            output: &mut fields,
        });
        span.extensions_mut().insert(CapturedFields(fields));
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<CapturedFields>() {
            values.record(&mut FieldVisitor {
                output: &mut fields.0,
            });
        }
    }
}

/// Describes `span` and its parents, innermost first, one per line.
///
/// Each line is the span name followed by the field values captured by
/// [`LazytestLayer`], if any. Returns `None` for a disabled span or when the
/// subscriber is not built on a `tracing_subscriber::Registry`.
///
/// # Examples
///
/// ```
/// use lazytest_tracing::{LazytestLayer, describe_span};
/// use tracing_subscriber::{Registry, layer::SubscriberExt};
///
/// let subscriber = Registry::default().with(LazytestLayer);
/// tracing::subscriber::with_default(subscriber, || {
///     let outer = tracing::info_span!("request", id = 7);
///     let _outer = outer.enter();
///     let inner = tracing::info_span!("parse");
///     let _inner = inner.enter();
///
///     let description = describe_span(&tracing::Span::current());
///     assert_eq!(description.as_deref(), Some("parse\nrequest{id=7}"));
/// });
/// ```
#[must_use]
pub fn describe_span(span: &Span) -> Option<String> {
    span.with_subscriber(|(id, dispatch)| {
        let registry = dispatch.downcast_ref::<tracing_subscriber::Registry>()?;
        let span_ref = registry.span(id)?;

        let mut description = String::new();
        for ancestor in span_ref.scope() {
            if !description.is_empty() {
                description.push('\n');
            }
            description.push_str(ancestor.name());
            if let Some(fields) = ancestor.extensions().get::<CapturedFields>()
                && !fields.0.is_empty()
            {
                let _ = write!(description, "{{{}}}", fields.0);
            }
        }
        Some(description)
    })
    .flatten()
}

/// Extension trait for recording the active tracing spans on failures.
///
/// # Examples
///
/// ```
/// use lazytest::prelude::*;
/// use lazytest_tracing::SpanExt;
///
/// #[tracing::instrument]
/// fn load(id: u32) -> Result<(), AssertionFailed> {
///     expect(id).to_not_equal(0).attach_span()
/// }
///
/// assert!(load(0).is_err());
/// ```
pub trait SpanExt: Sized {
    /// Attaches the current span stack as a note.
    ///
    /// Nothing is attached when no span is active.
    fn attach_span(self) -> Self;
}

impl<D> SpanExt for AssertionFailed<D> {
    fn attach_span(self) -> Self {
        match describe_span(&Span::current()) {
            Some(description) => self.note(format!("tracing spans:\n{description}")),
            None => self,
        }
    }
}

impl<V, D> SpanExt for Result<V, AssertionFailed<D>> {
    fn attach_span(self) -> Self {
        self.map_err(SpanExt::attach_span)
    }
}

#[derive(Debug)]
struct LazytestTracingEnvOptions {
    ascii: bool,
}

impl LazytestTracingEnvOptions {
    fn get() -> &'static Self {
        static LAZYTEST_TRACING_FLAGS: OnceLock<LazytestTracingEnvOptions> = OnceLock::new();

        LAZYTEST_TRACING_FLAGS.get_or_init(|| {
            let mut ascii = false;

            if let Some(var) = std::env::var_os("LAZYTEST_TRACING") {
                for v in var.to_string_lossy().split(',') {
                    if v.trim().eq_ignore_ascii_case("ascii") {
                        ascii = true;
                    }
                }
            }

            LazytestTracingEnvOptions { ascii }
        })
    }
}

/// A [`Reporter`] that logs a test run through `tracing`.
///
/// | Event                | Level   | Fields                             |
/// |----------------------|---------|------------------------------------|
/// | run started          | `INFO`  | `cases`                            |
/// | case started         | `DEBUG` | `case`                             |
/// | case passed          | `INFO`  | `case`                             |
/// | case failed          | `WARN`  | `case`, `detail`, `location`, `failure` |
/// | case errored         | `ERROR` | `case`, `panic`                    |
/// | case skipped         | `DEBUG` | `case`                             |
/// | run finished         | `INFO` or `WARN` | counts per outcome        |
///
/// Between the start and the outcome of a case the reporter keeps a `case`
/// span entered, so failures created by the case body can record it with
/// [`SpanExt::attach_span`]. Cases run by an isolating runner execute on
/// another thread and do not see this span.
#[derive(Debug)]
pub struct TracingReporter {
    layout: DefaultFailureFormatter,
    case_span: Option<EnteredSpan>,
}

impl TracingReporter {
    /// Creates a reporter configured by the `LAZYTEST_TRACING` environment
    /// variable.
    #[must_use]
    pub fn new() -> Self {
        let layout = if LazytestTracingEnvOptions::get().ascii {
            DefaultFailureFormatter::ASCII
        } else {
            DefaultFailureFormatter::DEFAULT
        };
        Self::with_layout(layout)
    }

    /// Creates a reporter that renders failures with `layout`.
    #[must_use]
    pub fn with_layout(layout: DefaultFailureFormatter) -> Self {
        Self {
            layout,
            case_span: None,
        }
    }
}

impl Default for TracingReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TracingReporter {
    fn on_start(&mut self, suite: &Suite) {
        tracing::info!(cases = suite.len(), "starting test run");
    }

    fn on_case_start(&mut self, name: &str) {
        self.case_span = Some(tracing::info_span!("case", name = name).entered());
        tracing::debug!(case = name, "running case");
    }

    fn on_outcome(&mut self, name: &str, outcome: &Outcome) {
        match outcome {
            Outcome::Passed => tracing::info!(case = name, "case passed"),
            Outcome::Failed(failure) => {
                let failure: &AssertionFailed = failure;
                let detail = match failure.detail() {
                    Some(detail) => detail.to_string(),
                    None => String::new(),
                };
                tracing::warn!(
                    case = name,
                    detail = %detail,
                    location = %failure.location(),
                    failure = %failure.format_with(&self.layout),
                    "case failed"
                );
            }
            Outcome::Errored(message) => tracing::error!(case = name, panic = %message, "case errored"),
            Outcome::Skipped => tracing::debug!(case = name, "case skipped"),
        }
        self.case_span = None;
    }

    fn on_finish(&mut self, summary: &Summary) {
        if summary.is_success() {
            tracing::info!(
                passed = summary.passed(),
                skipped = summary.skipped(),
                "test run succeeded"
            );
        } else {
            tracing::warn!(
                passed = summary.passed(),
                failed = summary.failed(),
                errored = summary.errored(),
                skipped = summary.skipped(),
                "test run failed"
            );
        }
    }
}
