#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Lazy assertions that signal failure through a typed, inspectable error
//! value.
//!
//! ## Overview
//!
//! The center of this crate is [`AssertionFailed`], the value produced when
//! an assertion does not hold. It optionally carries a **detail**: any value
//! describing why the assertion failed. Assertions return
//! `Result<_, AssertionFailed>`, so a failing check propagates with `?` up to
//! whoever runs the test, and every scope in between is unwound normally.
//!
//! ```
//! use lazytest::prelude::*;
//!
//! fn arithmetic() -> Result<(), AssertionFailed> {
//!     expect(2 + 2).to_equal(4)?;
//!     expect(vec![1, 2, 3]).to_contain(2)?;
//!     ensure!(1 < 2);
//!     Ok(())
//! }
//!
//! assert!(arithmetic().is_ok());
//! ```
//!
//! ## Core Concepts
//!
//! A failure holds three things:
//! - An optional **detail**. The built-in assertions use [`Detail`], a small
//!   closed set of failure reasons, but the type parameter accepts any value.
//!   "No detail" and "a detail that happens to be `None`" stay
//!   distinguishable.
//! - The source **location** where the failure was created, captured with
//!   `#[track_caller]`.
//! - Any number of **notes**, free-form annotations added while the failure
//!   travels towards its handler.
//!
//! How a detail is rendered is decided by a [handler](crate::handlers) when
//! the failure is created, and can be overridden process-wide through
//! [hooks](crate::hooks).
//!
//! ## Running Tests
//!
//! With the `std` feature (on by default) the [`runner`] module provides
//! lazily evaluated test cases and a runner that catches failures, whether
//! they were returned as `Err` or raised with [`AssertionFailed::raise`], and
//! tells them apart from unrelated panics.
//!
//! ```
//! # #[cfg(feature = "std")] {
//! use lazytest::{prelude::*, runner::{Runner, RunnerConfig, Suite}};
//!
//! let mut suite = Suite::new();
//! suite.case("addition", || expect(2 + 2).to_equal(5)).unwrap();
//!
//! let summary = Runner::new(RunnerConfig::default()).run(&suite);
//! assert_eq!(summary.failed(), 1);
//! assert!(summary.to_string().contains("expected 5, found 4"));
//! # }
//! ```
//!
//! ## Ecosystem
//!
//! - **[`lazytest-tracing`]** - Logs runner events through `tracing` and
//!   attaches the active span to failures.
//!
//! [`lazytest-tracing`]: https://docs.rs/lazytest-tracing

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod detail;
pub mod expect;
pub mod failure;
pub mod handlers;
pub mod hooks;
pub mod option_ext;
pub mod prelude;
pub mod result_ext;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod runner;

pub use self::{
    detail::{Detail, Rendered},
    expect::{Expectation, expect},
    failure::{AssertionFailed, SharedFailure},
};

/// A [`Result`](core::result::Result) type alias where the error is
/// [`AssertionFailed`].
///
/// The detail type defaults to [`Detail`].
///
/// # Examples
///
/// ```
/// use lazytest::prelude::*;
///
/// fn check_len(items: &[u8]) -> lazytest::Result<()> {
///     expect(items.len()).to_equal(3)
/// }
///
/// assert!(check_len(&[1, 2, 3]).is_ok());
/// ```
pub type Result<T, D = Detail> = core::result::Result<T, AssertionFailed<D>>;

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    use alloc::{borrow::Cow, fmt};
    #[doc(hidden)]
    pub use core::{format_args, result::Result::Err, stringify};

    use crate::{AssertionFailed, Detail};

    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    #[track_caller]
    pub fn format_failure(args: fmt::Arguments<'_>) -> AssertionFailed<Detail> {
        if let Some(message) = args.as_str() {
            AssertionFailed::from(Detail::message(message))
        } else {
            AssertionFailed::from(Detail::message(fmt::format(args)))
        }
    }

    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    #[track_caller]
    pub fn unsatisfied(condition: &'static str) -> AssertionFailed<Detail> {
        AssertionFailed::from(Detail::unsatisfied(Cow::Borrowed(condition), None))
    }

    #[doc(hidden)]
    pub mod kind {
        use crate::{AssertionFailed, handlers};

        #[doc(hidden)]
        pub struct Wrap<'a, T>(pub &'a T);

        #[doc(hidden)]
        pub trait HandlerDisplayKind {
            #[inline(always)]
            fn handler(&self) -> handlers::Display {
                handlers::Display
            }
        }

        impl<D> HandlerDisplayKind for &&Wrap<'_, D> where handlers::Display: handlers::DetailHandler<D> {}

        #[doc(hidden)]
        pub trait HandlerDebugKind {
            #[inline(always)]
            fn handler(&self) -> handlers::Debug {
                handlers::Debug
            }
        }

        impl<D> HandlerDebugKind for &Wrap<'_, D> where handlers::Debug: handlers::DetailHandler<D> {}

        #[doc(hidden)]
        pub trait HandlerAnyKind {
            #[inline(always)]
            fn handler(&self) -> handlers::Any {
                handlers::Any
            }
        }

        impl<D> HandlerAnyKind for Wrap<'_, D> where handlers::Any: handlers::DetailHandler<D> {}

        #[doc(hidden)]
        #[must_use]
        #[track_caller]
        pub fn macro_helper_new_failure<H, D>(_handler: H, detail: D) -> AssertionFailed<D>
        where
            H: handlers::DetailHandler<D>,
        {
            AssertionFailed::with_detail_custom::<H>(detail)
        }
    }
}
