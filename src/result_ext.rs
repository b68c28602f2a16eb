//! Extension traits for `Result` types in assertions.
//!
//! - [`ResultExt::ok_or_fail`] turns the `Err` of an ordinary `Result` into
//!   an [`AssertionFailed`].
//! - [`FailureExt`] adds notes to a failure while it propagates, without
//!   unwrapping the `Result` first.
//!
//! ```
//! use lazytest::prelude::*;
//!
//! fn parse_all(rows: &[&str]) -> Result<Vec<u32>, AssertionFailed> {
//!     rows.iter()
//!         .enumerate()
//!         .map(|(index, row)| {
//!             row.parse::<u32>()
//!                 .ok_or_fail()
//!                 .note_with(|| format!("row {index} was {row:?}"))
//!         })
//!         .collect()
//! }
//!
//! assert_eq!(parse_all(&["1", "2"]).ok(), Some(vec![1, 2]));
//!
//! let failure = parse_all(&["1", "two"]).unwrap_err();
//! assert_eq!(failure.notes(), ["row 1 was \"two\""]);
//! ```

use alloc::borrow::Cow;
use core::fmt;

use crate::{AssertionFailed, Detail, Rendered};

/// Extension trait for `Result` that fails the assertion on `Err`.
pub trait ResultExt<V, E> {
    /// Returns the `Ok` value, or a failure describing the error.
    ///
    /// The failure carries a [`Detail::Unsatisfied`] whose actual value is
    /// the rendered `Err`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// let failure = "-1".parse::<u8>().ok_or_fail().unwrap_err();
    /// assert_eq!(
    ///     failure.detail().unwrap().to_string(),
    ///     "expected Err(ParseIntError { kind: InvalidDigit }) to be Ok"
    /// );
    /// ```
    #[track_caller]
    fn ok_or_fail(self) -> Result<V, AssertionFailed>
    where
        E: fmt::Debug;
}

impl<V, E> ResultExt<V, E> for Result<V, E> {
    #[track_caller]
    fn ok_or_fail(self) -> Result<V, AssertionFailed>
    where
        E: fmt::Debug,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let actual = Rendered::of(&Err::<(), _>(&error));
                Err(AssertionFailed::from(Detail::unsatisfied("be Ok", Some(actual))))
            }
        }
    }
}

/// Extension trait for results that already carry an [`AssertionFailed`].
pub trait FailureExt<V, D> {
    /// Attaches `note` to the failure, if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// let result = expect(1).to_equal(2).note("checking the retry count");
    /// assert_eq!(result.unwrap_err().notes(), ["checking the retry count"]);
    /// ```
    fn note(self, note: impl Into<Cow<'static, str>>) -> Result<V, AssertionFailed<D>>;

    /// Attaches the note returned by `f` to the failure, if there is one.
    ///
    /// `f` only runs on failure.
    fn note_with<N, F>(self, f: F) -> Result<V, AssertionFailed<D>>
    where
        N: Into<Cow<'static, str>>,
        F: FnOnce() -> N;
}

impl<V, D> FailureExt<V, D> for Result<V, AssertionFailed<D>> {
    fn note(self, note: impl Into<Cow<'static, str>>) -> Result<V, AssertionFailed<D>> {
        self.map_err(|failure| failure.note(note))
    }

    fn note_with<N, F>(self, f: F) -> Result<V, AssertionFailed<D>>
    where
        N: Into<Cow<'static, str>>,
        F: FnOnce() -> N,
    {
        self.map_err(|failure| failure.note(f()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use core::cell::Cell;

    use super::*;
    use crate::expect;

    #[test]
    fn test_ok_passes_through() {
        assert_eq!(Ok::<_, ()>(5).ok_or_fail().ok(), Some(5));
    }

    #[test]
    fn test_err_is_rendered() {
        let line = line!() + 1;
        let failure = Err::<(), _>("timed out").ok_or_fail().unwrap_err();
        assert_eq!(failure.location().line(), line);
        assert_eq!(
            failure.detail().unwrap().to_string(),
            "expected Err(\"timed out\") to be Ok"
        );
    }

    #[test]
    fn test_note_with_is_lazy() {
        let calls = Cell::new(0);
        let passed = expect(1).to_equal(1).note_with(|| {
            calls.set(calls.get() + 1);
            "unused"
        });
        assert!(passed.is_ok());
        assert_eq!(calls.get(), 0);

        let failed = expect(1).to_equal(2).note_with(|| {
            calls.set(calls.get() + 1);
            "used"
        });
        assert_eq!(failed.unwrap_err().notes(), ["used"]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_notes_work_for_custom_details() {
        let result: Result<(), AssertionFailed<u8>> = Err(AssertionFailed::with_detail(3));
        let failure = result.note("a").note("b").unwrap_err();
        assert_eq!(failure.notes(), ["a", "b"]);
        assert_eq!(failure.detail(), Some(&3));
    }
}
