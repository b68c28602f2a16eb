//! Expectations: the assertion vocabulary that produces failures.
//!
//! [`expect`] wraps the value under test. A matcher then checks it and
//! returns `Ok` or an [`AssertionFailed`] describing the difference. Nothing
//! is constructed when the check passes.
//!
//! ```
//! use lazytest::prelude::*;
//!
//! fn parse_header(line: &str) -> Result<(), AssertionFailed> {
//!     let (key, value) = expect(line.split_once(':')).to_be_some()?;
//!     expect(key).to_equal("Content-Length")?;
//!     expect(value.trim().parse::<u32>()).to_be_ok()?;
//!     Ok(())
//! }
//!
//! assert!(parse_header("Content-Length: 42").is_ok());
//! assert!(parse_header("Content-Length 42").is_err());
//! ```
//!
//! Every matcher is `#[track_caller]`, so the failure points at the line of
//! the check, not at this module.

use alloc::{borrow::Cow, format, vec::Vec};
use core::fmt;

use crate::{AssertionFailed, Detail, Rendered};

/// Starts an expectation about `subject`.
#[must_use]
pub fn expect<T>(subject: T) -> Expectation<T> {
    Expectation {
        subject,
        notes: Vec::new(),
    }
}

/// A value under test, waiting for a matcher.
///
/// Matchers consume the expectation. Notes added with
/// [`because`](Self::because) are attached to the failure if the matcher
/// fails, and discarded otherwise.
#[must_use = "an expectation does nothing until a matcher is called"]
pub struct Expectation<T> {
    subject: T,
    notes: Vec<Cow<'static, str>>,
}

impl<T> Expectation<T> {
    /// Adds a note explaining what the check is about.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// let failure = expect(3).because("retries are capped").to_equal(5).unwrap_err();
    /// assert_eq!(failure.notes(), ["retries are capped"]);
    /// ```
    pub fn because(mut self, note: impl Into<Cow<'static, str>>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Returns the value under test without checking anything.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.subject
    }

    #[track_caller]
    fn fail(self, detail: Detail) -> AssertionFailed {
        failure_with_notes(detail, self.notes)
    }

    /// Checks that the value equals `expected`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::{Detail, prelude::*};
    ///
    /// assert!(expect(2 + 2).to_equal(4).is_ok());
    ///
    /// let failure = expect(2 + 2).to_equal(5).unwrap_err();
    /// assert_eq!(failure.detail(), Some(&Detail::mismatch(&5, &4)));
    /// ```
    #[track_caller]
    pub fn to_equal<U>(self, expected: U) -> Result<(), AssertionFailed>
    where
        T: PartialEq<U> + fmt::Debug,
        U: fmt::Debug,
    {
        if self.subject == expected {
            Ok(())
        } else {
            let detail = Detail::mismatch(&expected, &self.subject);
            Err(self.fail(detail))
        }
    }

    /// Checks that the value differs from `unexpected`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// assert!(expect("b").to_not_equal("a").is_ok());
    ///
    /// let failure = expect(1).to_not_equal(1).unwrap_err();
    /// assert_eq!(failure.detail().unwrap().to_string(), "expected 1 to differ from 1");
    /// ```
    #[track_caller]
    pub fn to_not_equal<U>(self, unexpected: U) -> Result<(), AssertionFailed>
    where
        T: PartialEq<U> + fmt::Debug,
        U: fmt::Debug,
    {
        if self.subject != unexpected {
            Ok(())
        } else {
            let detail = Detail::unsatisfied(
                format!("differ from {unexpected:?}"),
                Some(Rendered::of(&self.subject)),
            );
            Err(self.fail(detail))
        }
    }

    /// Checks that `predicate` holds for the value.
    ///
    /// `description` completes the sentence "expected the value to ...".
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// assert!(expect(4).to_satisfy("be even", |n| n % 2 == 0).is_ok());
    ///
    /// let failure = expect(3).to_satisfy("be even", |n| n % 2 == 0).unwrap_err();
    /// assert_eq!(failure.detail().unwrap().to_string(), "expected 3 to be even");
    /// ```
    #[track_caller]
    pub fn to_satisfy<P>(
        self,
        description: impl Into<Cow<'static, str>>,
        predicate: P,
    ) -> Result<(), AssertionFailed>
    where
        T: fmt::Debug,
        P: FnOnce(&T) -> bool,
    {
        if predicate(&self.subject) {
            Ok(())
        } else {
            let detail = Detail::unsatisfied(description, Some(Rendered::of(&self.subject)));
            Err(self.fail(detail))
        }
    }

    /// Checks that the collection contains `item`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// assert!(expect(vec![1, 2, 3]).to_contain(2).is_ok());
    /// assert!(expect(["a", "b"]).to_contain("c").is_err());
    /// ```
    #[track_caller]
    pub fn to_contain<E, I>(self, item: I) -> Result<(), AssertionFailed>
    where
        T: AsRef<[E]> + fmt::Debug,
        E: PartialEq<I>,
        I: fmt::Debug,
    {
        if self.subject.as_ref().iter().any(|element| *element == item) {
            Ok(())
        } else {
            let detail = Detail::unsatisfied(
                format!("contain {item:?}"),
                Some(Rendered::of(&self.subject)),
            );
            Err(self.fail(detail))
        }
    }
}

impl Expectation<bool> {
    /// Checks that the value is `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// assert!(expect(true).to_be_true().is_ok());
    /// assert!(expect(1 > 2).to_be_true().is_err());
    /// ```
    #[track_caller]
    pub fn to_be_true(self) -> Result<(), AssertionFailed> {
        self.to_equal(true)
    }

    /// Checks that the value is `false`.
    #[track_caller]
    pub fn to_be_false(self) -> Result<(), AssertionFailed> {
        self.to_equal(false)
    }
}

impl<V> Expectation<Option<V>>
where
    V: fmt::Debug,
{
    /// Checks that the value is `Some`, returning its contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// # fn main() -> Result<(), AssertionFailed> {
    /// let first = expect([5, 6].first()).to_be_some()?;
    /// expect(*first).to_equal(5)?;
    /// # Ok(())
    /// # }
    /// ```
    #[track_caller]
    pub fn to_be_some(self) -> Result<V, AssertionFailed> {
        match self.subject {
            Some(value) => Ok(value),
            None => {
                let detail = Detail::unsatisfied("be Some", Some(Rendered::of(&None::<V>)));
                Err(failure_with_notes(detail, self.notes))
            }
        }
    }

    /// Checks that the value is `None`.
    #[track_caller]
    pub fn to_be_none(self) -> Result<(), AssertionFailed> {
        if self.subject.is_none() {
            return Ok(());
        }
        let detail = Detail::unsatisfied("be None", Some(Rendered::of(&self.subject)));
        Err(self.fail(detail))
    }
}

impl<V, E> Expectation<Result<V, E>>
where
    V: fmt::Debug,
    E: fmt::Debug,
{
    /// Checks that the value is `Ok`, returning its contents.
    ///
    /// # Examples
    ///
    /// ```
    /// use lazytest::prelude::*;
    ///
    /// let failure = expect("x".parse::<u8>()).to_be_ok().unwrap_err();
    /// assert!(failure.detail().unwrap().to_string().starts_with("expected Err(ParseIntError"));
    /// ```
    #[track_caller]
    pub fn to_be_ok(self) -> Result<V, AssertionFailed> {
        match self.subject {
            Ok(value) => Ok(value),
            Err(error) => {
                let actual = Rendered::of(&Err::<V, E>(error));
                let detail = Detail::unsatisfied("be Ok", Some(actual));
                Err(failure_with_notes(detail, self.notes))
            }
        }
    }

    /// Checks that the value is `Err`, returning the error.
    #[track_caller]
    pub fn to_be_err(self) -> Result<E, AssertionFailed> {
        match self.subject {
            Err(error) => Ok(error),
            Ok(value) => {
                let actual = Rendered::of(&Ok::<V, E>(value));
                let detail = Detail::unsatisfied("be Err", Some(actual));
                Err(failure_with_notes(detail, self.notes))
            }
        }
    }
}

#[track_caller]
fn failure_with_notes(detail: Detail, notes: Vec<Cow<'static, str>>) -> AssertionFailed {
    let mut failure = AssertionFailed::from(detail);
    for note in notes {
        failure = failure.note(note);
    }
    failure
}
