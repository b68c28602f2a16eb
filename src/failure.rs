//! The failure signal produced by assertions.
//!
//! See [`AssertionFailed`] for the full description.

use alloc::{borrow::Cow, boxed::Box, vec::Vec};
use core::{fmt, panic::Location};

use crate::{
    Detail,
    handlers::{self, DetailHandler, FormattingFunction},
    hooks::{
        detail_formatter,
        failure_formatter::{self, FailureFormatter, FailureView},
    },
};

/// A failed-assertion signal shared through [`triomphe::Arc`].
///
/// Created by [`AssertionFailed::into_shared`]. The runner stores failures
/// this way so that reporters and the final summary can hold the same
/// failure without copying its detail.
pub type SharedFailure<D = Detail> = triomphe::Arc<AssertionFailed<D>>;

struct Formatting<D> {
    display: fn(&D, &mut fmt::Formatter<'_>) -> fmt::Result,
    debug: fn(&D, &mut fmt::Formatter<'_>) -> fmt::Result,
}

impl<D> Formatting<D> {
    fn of<H: DetailHandler<D>>() -> Self {
        Self {
            display: H::display,
            debug: H::debug,
        }
    }
}

impl<D> Clone for Formatting<D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Formatting<D> {}

/// Signals that an assertion did not hold.
///
/// An `AssertionFailed` optionally carries a **detail** of type `D` describing
/// why the assertion failed. The detail is fixed at construction: no method
/// changes it, and [`map_detail`](Self::map_detail) builds a new failure
/// instead. The type does not implement `PartialEq`; compare details through
/// [`detail`](Self::detail) with whatever notion of equality fits them.
///
/// Failures travel as the `Err` of a `Result`. Propagating one with `?`
/// unwinds the intervening scopes normally, so their `Drop` implementations
/// run before the handler sees the failure.
///
/// # Absent detail versus empty detail
///
/// The detail is stored as an `Option<D>`. A failure created with
/// [`new`](Self::new) has no detail at all, while a failure created with
/// `with_detail(None::<T>)` has the detail `None`. The two stay
/// distinguishable:
///
/// ```
/// use lazytest::AssertionFailed;
///
/// let absent: AssertionFailed<Option<u8>> = AssertionFailed::new();
/// let empty: AssertionFailed<Option<u8>> = AssertionFailed::with_detail(None);
///
/// assert_eq!(absent.detail(), None);
/// assert_eq!(empty.detail(), Some(&None));
/// ```
///
/// # Examples
///
/// ```
/// use lazytest::{Detail, prelude::*};
///
/// fn lookup(id: u32) -> Result<&'static str, AssertionFailed> {
///     match id {
///         1 => Ok("one"),
///         _ => Err(AssertionFailed::from(Detail::message("unknown id"))),
///     }
/// }
///
/// let failure = lookup(7).unwrap_err();
/// assert_eq!(failure.detail(), Some(&Detail::message("unknown id")));
/// assert!(failure.location().file().ends_with(".rs"));
/// ```
pub struct AssertionFailed<D = Detail> {
    inner: Box<Inner<D>>,
}

// The `Err` side of `Result<T, AssertionFailed>` is one pointer.
struct Inner<D> {
    detail: Option<D>,
    formatting: Formatting<D>,
    location: &'static Location<'static>,
    notes: Vec<Cow<'static, str>>,
}

impl<D> AssertionFailed<D> {
    fn from_parts(
        detail: Option<D>,
        formatting: Formatting<D>,
        location: &'static Location<'static>,
        notes: Vec<Cow<'static, str>>,
    ) -> Self {
        Self {
            inner: Box::new(Inner {
                detail,
                formatting,
                location,
                notes,
            }),
        }
    }
}

impl<D> AssertionFailed<D> {
    /// Creates a failure without a detail.
    ///
    /// The location of the caller is recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::AssertionFailed;
    ///
    /// let failure: AssertionFailed = AssertionFailed::new();
    /// assert!(!failure.has_detail());
    /// assert_eq!(failure.location().line(), line!() - 2);
    /// ```
    #[must_use]
    #[track_caller]
    pub fn new() -> Self {
        Self::from_parts(
            None,
            Formatting::of::<handlers::Any>(),
            Location::caller(),
            Vec::new(),
        )
    }

    /// Creates a failure carrying `detail`, rendered by the handler `H`.
    ///
    /// The detail is stored as given; it is neither validated nor
    /// transformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::{handlers, prelude::*};
    ///
    /// let failure: AssertionFailed<&str> =
    ///     AssertionFailed::with_detail_custom::<handlers::Display>("disk full");
    /// assert!(failure.to_string().contains("disk full"));
    /// ```
    #[must_use]
    #[track_caller]
    pub fn with_detail_custom<H>(detail: D) -> Self
    where
        H: DetailHandler<D>,
    {
        Self::from_parts(
            Some(detail),
            Formatting::of::<H>(),
            Location::caller(),
            Vec::new(),
        )
    }

    /// Returns the detail, or `None` if the failure was created without one.
    #[must_use]
    pub fn detail(&self) -> Option<&D> {
        self.inner.detail.as_ref()
    }

    /// Returns `true` if the failure was created with a detail.
    #[must_use]
    pub fn has_detail(&self) -> bool {
        self.inner.detail.is_some()
    }

    /// Consumes the failure and returns its detail.
    #[must_use]
    pub fn into_detail(self) -> Option<D> {
        self.inner.detail
    }

    /// The source location where the failure was created.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.inner.location
    }

    /// The notes attached so far, oldest first.
    #[must_use]
    pub fn notes(&self) -> &[Cow<'static, str>] {
        &self.inner.notes
    }

    /// Attaches a note to the failure.
    ///
    /// Notes do not touch the detail; they record context gathered while the
    /// failure propagates, such as which input was being checked.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// let failure = expect(1).to_equal(2).unwrap_err().note("while checking row 3");
    /// assert_eq!(failure.notes(), ["while checking row 3"]);
    /// ```
    #[must_use]
    pub fn note(mut self, note: impl Into<Cow<'static, str>>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Builds a new failure whose detail is `f` applied to this one's.
    ///
    /// The location and notes are carried over. A failure without a detail
    /// stays without one. The new detail is rendered with
    /// [`handlers::Debug`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::AssertionFailed;
    ///
    /// let failure = AssertionFailed::with_detail(21).map_detail(|n| n * 2);
    /// assert_eq!(failure.detail(), Some(&42));
    /// ```
    #[must_use]
    pub fn map_detail<E, F>(self, f: F) -> AssertionFailed<E>
    where
        E: fmt::Debug,
        F: FnOnce(D) -> E,
    {
        let Inner {
            detail,
            location,
            notes,
            ..
        } = *self.inner;
        AssertionFailed::from_parts(
            detail.map(f),
            Formatting::of::<handlers::Debug>(),
            location,
            notes,
        )
    }

    /// Moves the failure into a [`SharedFailure`].
    #[must_use]
    pub fn into_shared(self) -> SharedFailure<D> {
        triomphe::Arc::new(self)
    }
}

impl<D> AssertionFailed<D>
where
    D: fmt::Debug,
{
    /// Creates a failure carrying `detail`, rendered with its `Debug`
    /// implementation.
    ///
    /// Use [`with_detail_custom`](Self::with_detail_custom) or the
    /// [`failure!`](crate::failure!) macro for other renderings.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::AssertionFailed;
    ///
    /// let failure = AssertionFailed::with_detail(vec![1, 2]);
    /// assert_eq!(failure.detail(), Some(&vec![1, 2]));
    /// assert!(failure.to_string().contains("[1, 2]"));
    /// ```
    #[must_use]
    #[track_caller]
    pub fn with_detail(detail: D) -> Self {
        Self::with_detail_custom::<handlers::Debug>(detail)
    }
}

#[cfg(feature = "std")]
impl<D> AssertionFailed<D>
where
    D: Send + 'static,
{
    /// Raises the failure as a panic.
    ///
    /// This is for code that cannot return a `Result`, such as callbacks
    /// with a fixed signature. The panic payload is the failure itself, and
    /// [`Runner`](crate::runner::Runner) recovers it and reports the case as
    /// failed rather than errored. Outside a runner the thread unwinds like
    /// any other panic, and the rendered failure is printed by the hook from
    /// [`panic_hook`](crate::hooks::panic_hook), which the first call
    /// installs. Prefer returning the failure as `Err` whenever possible.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::{Detail, prelude::*};
    ///
    /// let result: std::thread::Result<()> = std::panic::catch_unwind(|| {
    ///     AssertionFailed::from(Detail::message("callback saw a stale value")).raise()
    /// });
    /// let caught = result.unwrap_err();
    ///
    /// let failure = caught.downcast::<AssertionFailed>().unwrap();
    /// assert_eq!(failure.detail(), Some(&Detail::message("callback saw a stale value")));
    /// ```
    #[track_caller]
    pub fn raise(self) -> ! {
        crate::hooks::panic_hook::arm::<D>();
        std::panic::panic_any(self)
    }
}

impl<D> AssertionFailed<D>
where
    D: 'static,
{
    /// Renders the failure with `formatter` instead of the installed one.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::{hooks::failure_formatter::DefaultFailureFormatter, prelude::*};
    ///
    /// let failure = expect("a").to_equal("b").unwrap_err();
    /// let text = failure.format_with(&DefaultFailureFormatter::ASCII).to_string();
    /// assert!(text.starts_with("o  assertion failed: expected \"b\", found \"a\""));
    /// ```
    #[must_use]
    pub fn format_with<'a, H>(&'a self, formatter: &'a H) -> impl fmt::Display + 'a
    where
        H: FailureFormatter,
    {
        struct FormatWith<'a, D, H>(&'a AssertionFailed<D>, &'a H);

        impl<D: 'static, H: FailureFormatter> fmt::Display for FormatWith<'_, D, H> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.render(FormattingFunction::Display, Some(self.1), f)
            }
        }

        FormatWith(self, formatter)
    }

    /// Converts the failure into one whose detail is a [`Detail::Message`]
    /// holding this failure's rendered detail.
    ///
    /// The location and notes are carried over, and a failure without a
    /// detail stays without one. This lets failures with custom details flow
    /// into code that expects the default detail type, such as a
    /// [`Runner`](crate::runner::Runner).
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::{Detail, prelude::*};
    ///
    /// #[derive(Debug)]
    /// struct Overdraft(u32);
    ///
    /// let failure = AssertionFailed::with_detail(Overdraft(12)).note("account 7");
    /// let failure: AssertionFailed = failure.into_message();
    /// assert_eq!(failure.detail(), Some(&Detail::message("Overdraft(12)")));
    /// assert_eq!(failure.notes(), ["account 7"]);
    /// ```
    #[must_use]
    pub fn into_message(self) -> AssertionFailed<Detail> {
        use alloc::string::ToString;

        let Inner {
            detail,
            formatting,
            location,
            notes,
        } = *self.inner;
        let detail = detail.map(|detail| {
            Detail::message(
                DetailFormat {
                    detail: &detail,
                    formatting,
                    function: FormattingFunction::Display,
                }
                .to_string(),
            )
        });
        AssertionFailed::from_parts(
            detail,
            Formatting::of::<handlers::Display>(),
            location,
            notes,
        )
    }

    fn render(
        &self,
        function: FormattingFunction,
        formatter: Option<&dyn FailureFormatter>,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let inner = &*self.inner;
        let detail = inner.detail.as_ref().map(|detail| DetailFormat {
            detail,
            formatting: inner.formatting,
            function,
        });
        let detail = detail.as_ref().map(|detail| detail as &dyn fmt::Display);

        if f.alternate() {
            return match detail {
                Some(detail) => write!(f, "assertion failed: {detail}"),
                None => f.write_str("assertion failed"),
            };
        }

        let view = FailureView::new(detail, inner.location, &inner.notes, function);
        match formatter {
            Some(formatter) => formatter.format(view, f),
            None => failure_formatter::format_failure(view, f),
        }
    }
}

struct DetailFormat<'a, D> {
    detail: &'a D,
    formatting: Formatting<D>,
    function: FormattingFunction,
}

impl<D: 'static> fmt::Display for DetailFormat<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fallback = match self.function {
            FormattingFunction::Display => self.formatting.display,
            FormattingFunction::Debug => self.formatting.debug,
        };
        detail_formatter::format_detail(self.detail, fallback, self.function, f)
    }
}

impl<D> Default for AssertionFailed<D> {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone> Clone for AssertionFailed<D> {
    fn clone(&self) -> Self {
        Self::from_parts(
            self.inner.detail.clone(),
            self.inner.formatting,
            self.inner.location,
            self.inner.notes.clone(),
        )
    }
}

impl From<Detail> for AssertionFailed<Detail> {
    #[track_caller]
    fn from(detail: Detail) -> Self {
        Self::with_detail_custom::<handlers::Display>(detail)
    }
}

/// Renders the failure through the installed
/// [`FailureFormatter`](crate::hooks::failure_formatter::FailureFormatter).
///
/// The alternate flag (`{:#}`) renders a single line without location or
/// notes.
impl<D: 'static> fmt::Display for AssertionFailed<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(FormattingFunction::Display, None, f)
    }
}

impl<D: 'static> fmt::Debug for AssertionFailed<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(FormattingFunction::Debug, None, f)
    }
}

impl<D: 'static> core::error::Error for AssertionFailed<D> {}
