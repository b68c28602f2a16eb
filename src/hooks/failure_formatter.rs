//! Formatting of whole failures.
//!
//! Unlike [`detail_formatter`](crate::hooks::detail_formatter), which controls
//! how one detail type renders, this module controls the **layout** of every
//! failure: the headline, where the location goes and how notes are listed.
//!
//! # Default Formatter
//!
//! By default failures use [`DefaultFailureFormatter::UNICODE`]:
//!
//! ```text
//!  ● assertion failed: expected 5, found 4
//!  ├ tests/arithmetic.rs:12:5
//!  ╰ while summing the second row
//! ```
//!
//! Switch layouts globally with [`register_failure_formatter`], or render one
//! failure with a specific formatter using
//! [`AssertionFailed::format_with`](crate::AssertionFailed::format_with):
//!
//! ```
//! use lazytest::{hooks::failure_formatter::DefaultFailureFormatter, prelude::*};
//!
//! let failure = expect(2 + 2).to_equal(5).unwrap_err();
//! let text = failure.format_with(&DefaultFailureFormatter::ASCII).to_string();
//! assert!(text.starts_with("o  assertion failed: expected 5, found 4\n|- "));
//! ```

use alloc::{borrow::Cow, string::ToString};
use core::{fmt, panic::Location};

use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::{handlers::FormattingFunction, hooks::HookCell};

static FORMATTER: HookCell<Arc<dyn FailureFormatter>> = HookCell::new();

/// The parts of a failure handed to a [`FailureFormatter`].
#[derive(Copy, Clone)]
pub struct FailureView<'a> {
    detail: Option<&'a dyn fmt::Display>,
    location: &'static Location<'static>,
    notes: &'a [Cow<'static, str>],
    function: FormattingFunction,
}

impl<'a> FailureView<'a> {
    pub(crate) fn new(
        detail: Option<&'a dyn fmt::Display>,
        location: &'static Location<'static>,
        notes: &'a [Cow<'static, str>],
        function: FormattingFunction,
    ) -> Self {
        Self {
            detail,
            location,
            notes,
            function,
        }
    }

    /// The detail, already routed through its handler and any registered
    /// [`DetailFormatter`](crate::hooks::detail_formatter::DetailFormatter).
    #[must_use]
    pub fn detail(&self) -> Option<&'a dyn fmt::Display> {
        self.detail
    }

    /// Where the failure was created.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The notes attached to the failure, oldest first.
    #[must_use]
    pub fn notes(&self) -> &'a [Cow<'static, str>] {
        self.notes
    }

    /// Whether the failure is being formatted with `Display` or `Debug`.
    #[must_use]
    pub fn formatting_function(&self) -> FormattingFunction {
        self.function
    }
}

/// Renders the layout of a failure.
pub trait FailureFormatter: 'static + Send + Sync {
    /// Writes `failure` to `f`.
    fn format(&self, failure: FailureView<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Installs `formatter` for every failure rendered from now on.
///
/// # Examples
///
/// ```no_run
/// use core::fmt;
///
/// use lazytest::hooks::failure_formatter::{
///     FailureFormatter, FailureView, register_failure_formatter,
/// };
///
/// struct OneLine;
///
/// impl FailureFormatter for OneLine {
///     fn format(&self, failure: FailureView<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "FAIL at {}", failure.location())
///     }
/// }
///
/// register_failure_formatter(OneLine);
/// ```
pub fn register_failure_formatter<H: FailureFormatter>(formatter: H) {
    let formatter = Arc::new(formatter).unsize(unsize::Coercion!(to dyn FailureFormatter));
    FORMATTER.update(|slot| *slot = Some(formatter));
}

/// Removes the installed formatter, going back to
/// [`DefaultFailureFormatter::DEFAULT`].
pub fn reset_failure_formatter() {
    FORMATTER.update(|slot| *slot = None);
}

pub(crate) fn format_failure(failure: FailureView<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let formatter = FORMATTER.with(|formatter| formatter.cloned());
    match formatter {
        Some(formatter) => formatter.format(failure, f),
        None => DefaultFailureFormatter::DEFAULT.format(failure, f),
    }
}

/// The built-in layout: a headline with the detail, followed by the location
/// and the notes as a list.
///
/// Multi-line details and notes are continued with the matching prefix so the
/// list stays aligned.
#[derive(Copy, Clone, Debug)]
pub struct DefaultFailureFormatter {
    /// Written before the headline.
    pub headline_prefix: &'static str,
    /// The headline text, followed by `": "` and the detail when there is one.
    pub headline: &'static str,
    /// Prefix of a list item that has more items below it.
    pub item_middle: &'static str,
    /// Prefix of the last list item.
    pub item_last: &'static str,
    /// Prefix of continuation lines when more items follow.
    pub continuation_middle: &'static str,
    /// Prefix of continuation lines after the last item.
    pub continuation_last: &'static str,
}

impl DefaultFailureFormatter {
    /// Unicode box-drawing layout.
    pub const UNICODE: Self = Self {
        headline_prefix: " ● ",
        headline: "assertion failed",
        item_middle: " ├ ",
        item_last: " ╰ ",
        continuation_middle: " │ ",
        continuation_last: "   ",
    };

    /// ASCII-only layout for logs and terminals without Unicode support.
    pub const ASCII: Self = Self {
        headline_prefix: "o  ",
        headline: "assertion failed",
        item_middle: "|- ",
        item_last: "|- ",
        continuation_middle: "|  ",
        continuation_last: "   ",
    };

    /// The layout used when no formatter is registered, an alias for
    /// [`UNICODE`](Self::UNICODE).
    pub const DEFAULT: Self = Self::UNICODE;

    fn write_item(
        &self,
        text: &str,
        is_last: bool,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let (prefix, continuation) = if is_last {
            (self.item_last, self.continuation_last)
        } else {
            (self.item_middle, self.continuation_middle)
        };
        for (index, line) in lines(text).enumerate() {
            let prefix = if index == 0 { prefix } else { continuation };
            write!(f, "\n{prefix}{line}")?;
        }
        Ok(())
    }
}

/// Like [`str::lines`], but an empty text is one empty line.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.is_empty().then_some("").into_iter().chain(text.lines())
}

impl Default for DefaultFailureFormatter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FailureFormatter for DefaultFailureFormatter {
    fn format(&self, failure: FailureView<'_>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.headline_prefix, self.headline)?;

        // The location always follows the headline, so detail continuation
        // lines use the middle prefix.
        if let Some(detail) = failure.detail() {
            let detail = detail.to_string();
            let mut lines = lines(&detail);
            if let Some(first) = lines.next() {
                write!(f, ": {first}")?;
            }
            for line in lines {
                write!(f, "\n{}{line}", self.continuation_middle)?;
            }
        }

        let location = failure.location();
        let location = alloc::format!(
            "{}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        );
        self.write_item(&location, failure.notes().is_empty(), f)?;

        let count = failure.notes().len();
        for (index, note) in failure.notes().iter().enumerate() {
            self.write_item(note, index + 1 == count, f)?;
        }
        Ok(())
    }
}
