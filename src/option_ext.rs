//! Extension traits for `Option` types in assertions.
//!
//! [`OptionExt`] turns a missing value into an [`AssertionFailed`] instead of
//! a panic, so tests can use `?` where they would otherwise reach for
//! `unwrap()`.
//!
//! ```
//! use lazytest::prelude::*;
//!
//! fn first_word(text: &str) -> Result<&str, AssertionFailed> {
//!     text.split_whitespace().next().some_or_fail()
//! }
//!
//! assert_eq!(first_word("hello world").ok(), Some("hello"));
//!
//! let failure = first_word("   ").unwrap_err();
//! assert_eq!(
//!     failure.detail().unwrap().to_string(),
//!     "expected Some(&str), found None"
//! );
//! ```
//!
//! Unlike [`expect(..).to_be_some()`](crate::Expectation::to_be_some), these
//! methods do not require the value to implement `Debug`.

use alloc::format;
use core::any::type_name;

use crate::{AssertionFailed, Detail};

/// Extension trait for `Option` that fails the assertion on `None`.
pub trait OptionExt<T> {
    /// Returns the contained value, or a failure naming the expected type.
    ///
    /// The failure carries a [`Detail::Message`] and points at the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// let port = Some(8080).some_or_fail().unwrap();
    /// assert_eq!(port, 8080);
    ///
    /// let line = line!() + 1;
    /// let failure = None::<u16>.some_or_fail().unwrap_err();
    /// assert_eq!(failure.location().line(), line);
    /// ```
    #[track_caller]
    fn some_or_fail(self) -> Result<T, AssertionFailed>;

    /// Returns the contained value, or a failure carrying `detail`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct MissingKey(&'static str);
    ///
    /// let failure = None::<u8>.some_or_fail_with(MissingKey("timeout")).unwrap_err();
    /// assert_eq!(failure.detail(), Some(&MissingKey("timeout")));
    /// ```
    #[track_caller]
    fn some_or_fail_with<D>(self, detail: D) -> Result<T, AssertionFailed<D>>
    where
        D: core::fmt::Debug;
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    fn some_or_fail(self) -> Result<T, AssertionFailed> {
        match self {
            Some(value) => Ok(value),
            None => Err(AssertionFailed::from(Detail::message(format!(
                "expected Some({}), found None",
                type_name::<T>()
            )))),
        }
    }

    #[track_caller]
    fn some_or_fail_with<D>(self, detail: D) -> Result<T, AssertionFailed<D>>
    where
        D: core::fmt::Debug,
    {
        match self {
            Some(value) => Ok(value),
            None => Err(AssertionFailed::with_detail(detail)),
        }
    }
}
