//! Commonly used items for convenient importing.
//!
//! ```rust
//! use lazytest::prelude::*;
//!
//! fn halves(n: u32) -> Result<u32, AssertionFailed> {
//!     ensure!(n % 2 == 0, "{n} is odd");
//!     Ok(n / 2)
//! }
//!
//! fn main() {
//!     assert_eq!(halves(10).unwrap(), 5);
//!     assert!(halves(3).is_err());
//! }
//! ```
//!
//! # What's Included
//!
//! - **[`AssertionFailed`]** and **[`Detail`]**: The failure signal and the
//!   detail used by built-in assertions
//! - **[`expect`]**: Entry point of the expectation matchers
//! - **[`OptionExt`]**, **[`ResultExt`]** and **[`FailureExt`]**: Extension
//!   methods for `Option` and `Result`
//! - **[`failure!`]**, **[`fail!`]** and **[`ensure!`]**: Macros for creating
//!   and returning failures
//! - **[`handlers`]**: Built-in detail handlers

pub use crate::{
    AssertionFailed, Detail, Expectation, Rendered, ensure, expect, fail, failure, handlers,
    option_ext::OptionExt,
    result_ext::{FailureExt, ResultExt},
};
