//! The failure reasons produced by the built-in assertions.
//!
//! [`AssertionFailed`](crate::AssertionFailed) accepts any detail type, but
//! the matchers in [`expect`](crate::expect), the macros and the extension
//! traits all produce a [`Detail`]. Values under test are captured as
//! [`Rendered`] text at the moment of failure, so a `Detail` owns everything
//! it needs and is `Send + Sync` regardless of the values it describes.

use alloc::{borrow::Cow, format, string::String};
use core::fmt;

/// A value captured as its [`Debug`](core::fmt::Debug) rendering.
///
/// # Examples
///
/// ```
/// use lazytest::Rendered;
///
/// let rendered = Rendered::of(&Some(4));
/// assert_eq!(rendered.as_str(), "Some(4)");
/// assert_eq!(rendered.type_name(), "core::option::Option<i32>");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rendered {
    text: String,
    type_name: &'static str,
}

impl Rendered {
    /// Captures the `Debug` rendering and type name of `value`.
    #[must_use]
    pub fn of<T: ?Sized + fmt::Debug>(value: &T) -> Self {
        Self {
            text: format!("{value:?}"),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// The captured rendering.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The name of the type the value had when it was captured.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// The text already is a `Debug` rendering; quoting it again would double
// escape strings.
impl fmt::Debug for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Why an assertion failed.
///
/// # Examples
///
/// ```
/// use lazytest::{Detail, prelude::*};
///
/// let failure = expect(2 + 2).to_equal(5).unwrap_err();
/// let detail = failure.detail().unwrap();
/// assert_eq!(detail, &Detail::mismatch(&5, &4));
/// assert_eq!(detail.to_string(), "expected 5, found 4");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Detail {
    /// A free-form explanation.
    Message(Cow<'static, str>),
    /// The value under test differs from the expected one.
    Mismatch {
        /// The value the assertion asked for.
        expected: Rendered,
        /// The value that was found.
        actual: Rendered,
    },
    /// A condition over the value under test does not hold.
    Unsatisfied {
        /// What the value was expected to do, for example `be even`, or the
        /// source text of a condition.
        predicate: Cow<'static, str>,
        /// The value the condition was checked against, if there was one.
        actual: Option<Rendered>,
    },
}

impl Detail {
    /// Creates a [`Detail::Message`].
    #[must_use]
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Message(message.into())
    }

    /// Creates a [`Detail::Mismatch`] from the expected and actual values.
    #[must_use]
    pub fn mismatch<E, A>(expected: &E, actual: &A) -> Self
    where
        E: ?Sized + fmt::Debug,
        A: ?Sized + fmt::Debug,
    {
        Self::Mismatch {
            expected: Rendered::of(expected),
            actual: Rendered::of(actual),
        }
    }

    /// Creates a [`Detail::Unsatisfied`].
    #[must_use]
    pub fn unsatisfied(predicate: impl Into<Cow<'static, str>>, actual: Option<Rendered>) -> Self {
        Self::Unsatisfied {
            predicate: predicate.into(),
            actual,
        }
    }

    /// The expected value, for a [`Detail::Mismatch`].
    #[must_use]
    pub fn expected(&self) -> Option<&Rendered> {
        match self {
            Self::Mismatch { expected, .. } => Some(expected),
            Self::Message(_) | Self::Unsatisfied { .. } => None,
        }
    }

    /// The value that was found, when the detail recorded one.
    #[must_use]
    pub fn actual(&self) -> Option<&Rendered> {
        match self {
            Self::Mismatch { actual, .. } => Some(actual),
            Self::Unsatisfied { actual, .. } => actual.as_ref(),
            Self::Message(_) => None,
        }
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_str(message),
            Self::Mismatch { expected, actual } => write!(f, "expected {expected}, found {actual}"),
            Self::Unsatisfied {
                predicate,
                actual: Some(actual),
            } => write!(f, "expected {actual} to {predicate}"),
            Self::Unsatisfied {
                predicate,
                actual: None,
            } => write!(f, "condition `{predicate}` does not hold"),
        }
    }
}
