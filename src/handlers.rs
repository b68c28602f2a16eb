//! Handlers that control how failure details are rendered.
//!
//! A handler is a zero-sized type implementing [`DetailHandler`] for some
//! detail type. When an [`AssertionFailed`] is created, the handler's
//! functions are stored next to the detail, so rendering never needs more
//! from the detail type than what its handler asked for at construction time.
//!
//! # Built-in Handlers
//!
//! ## [`Display`]
//!
//! For types implementing both [`Display`](core::fmt::Display) and
//! [`Debug`](core::fmt::Debug). This is what the built-in assertions use for
//! [`Detail`](crate::Detail).
//!
//! ## [`struct@Debug`]
//!
//! For types implementing [`Debug`](core::fmt::Debug). Both renderings use the
//! `Debug` implementation. [`AssertionFailed::with_detail`] uses this handler.
//!
//! ## [`Any`]
//!
//! For any type. Shows "a value of type `TypeName`" in both renderings.
//!
//! # When Handlers Are Selected
//!
//! The [`failure!`](crate::failure!) macro picks the most informative handler
//! available for the value it is given. You can also choose one explicitly
//! with [`AssertionFailed::with_detail_custom`].
//!
//! ```
//! use lazytest::{handlers, prelude::*};
//!
//! struct Secret(&'static str);
//!
//! let failure: AssertionFailed<Secret> =
//!     AssertionFailed::with_detail_custom::<handlers::Any>(Secret("hunter2"));
//! let text = failure.to_string();
//! assert!(text.contains("Secret"));
//! assert!(!text.contains("hunter2"));
//! ```
//!
//! [`AssertionFailed`]: crate::AssertionFailed
//! [`AssertionFailed::with_detail`]: crate::AssertionFailed::with_detail
//! [`AssertionFailed::with_detail_custom`]: crate::AssertionFailed::with_detail_custom

use core::fmt;

/// Which formatting trait a failure is currently being rendered with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormattingFunction {
    /// The failure is rendered with [`Display`](core::fmt::Display).
    Display,
    /// The failure is rendered with [`Debug`](core::fmt::Debug).
    Debug,
}

/// Renders a detail of type `D`.
///
/// Implementations are usually zero-sized marker types. The functions take
/// no `self` so that they can be stored as plain function pointers.
pub trait DetailHandler<D>: 'static {
    /// Renders the detail when the failure is formatted with `Display`.
    fn display(detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Renders the detail when the failure is formatted with `Debug`.
    fn debug(detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Handler for types implementing [`Display`](core::fmt::Display) and
/// [`Debug`](core::fmt::Debug).
///
/// # Example
///
/// ```
/// use lazytest::{handlers, prelude::*};
///
/// let failure: AssertionFailed<String> =
///     AssertionFailed::with_detail_custom::<handlers::Display>("cache was cold".to_string());
/// assert!(failure.to_string().contains("cache was cold"));
/// assert!(format!("{failure:?}").contains("\"cache was cold\""));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Display;

impl<D> DetailHandler<D> for Display
where
    D: fmt::Display + fmt::Debug,
{
    fn display(detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(detail, f)
    }

    fn debug(detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(detail, f)
    }
}

/// Handler for types implementing [`Debug`](core::fmt::Debug).
///
/// Both renderings use the `Debug` implementation, since a detail without a
/// `Display` implementation is usually a data structure whose fields are the
/// interesting part.
///
/// # Example
///
/// ```
/// use lazytest::{handlers, prelude::*};
///
/// #[derive(Debug)]
/// struct Counts {
///     seen: u32,
/// }
///
/// let failure: AssertionFailed<Counts> =
///     AssertionFailed::with_detail_custom::<handlers::Debug>(Counts { seen: 3 });
/// assert!(failure.to_string().contains("Counts { seen: 3 }"));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Debug;

impl<D> DetailHandler<D> for Debug
where
    D: fmt::Debug,
{
    fn display(detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(detail, f)
    }

    fn debug(detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(detail, f)
    }
}

/// Handler for any type, regardless of implemented traits.
///
/// Both renderings show "a value of type `TypeName`" using
/// [`type_name`](core::any::type_name). Useful as a fallback, or to keep the
/// contents of a detail out of rendered output.
#[derive(Copy, Clone, Debug)]
pub struct Any;

impl<D> DetailHandler<D> for Any {
    fn display(_detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a value of type `{}`", core::any::type_name::<D>())
    }

    fn debug(detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::display(detail, f)
    }
}
