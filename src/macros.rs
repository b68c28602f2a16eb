/// Macro to create an [`AssertionFailed`](crate::AssertionFailed).
///
/// This macro can be invoked in three different ways.
///
/// ## Without arguments
///
/// `failure!()` creates a failure without a detail, exactly like
/// [`AssertionFailed::new`](crate::AssertionFailed::new).
///
/// ## Using a format string
///
/// When invoked with a literal as the first argument, this macro interprets
/// the arguments in the same way as the [`format!()`] macro. The resulting
/// string becomes a [`Detail::Message`](crate::Detail::Message). When the
/// format string contains no arguments it is stored without allocating.
///
/// [`format!()`]: alloc::format
///
/// ## Using a detail value
///
/// Any other expression becomes the detail. The handler used to render it is
/// picked from the traits the value implements: [`Display`] when available,
/// then [`Debug`], and finally [`Any`], which only shows the type name.
///
/// [`Display`]: crate::handlers::Display
/// [`Debug`]: crate::handlers::Debug
/// [`Any`]: crate::handlers::Any
///
/// # Examples
///
/// ```
/// use lazytest::{Detail, prelude::*};
///
/// let failure: AssertionFailed = failure!("values drifted by {}", 3);
/// assert_eq!(failure.detail(), Some(&Detail::message("values drifted by 3")));
///
/// #[derive(Debug)]
/// struct Snapshot {
///     rows: usize,
/// }
///
/// let failure = failure!(Snapshot { rows: 2 });
/// assert_eq!(failure.detail().map(|s| s.rows), Some(2));
/// assert!(format!("{failure}").contains("Snapshot { rows: 2 }"));
/// ```
#[macro_export]
macro_rules! failure {
    () => {
        $crate::AssertionFailed::new()
    };
    ($msg:literal $(,)?) => {
        $crate::__private::format_failure($crate::__private::format_args!($msg))
    };
    ($detail:expr $(,)?) => {
        {
            use $crate::__private::kind::*;
            let detail = $detail;
            let handler = (&&&Wrap(&detail)).handler();
            macro_helper_new_failure(handler, detail)
        }
    };
    ($fmt:literal, $($arg:tt)*) => {
        $crate::__private::format_failure($crate::__private::format_args!($fmt, $($arg)*))
    };
}

/// Return early with an [`AssertionFailed`](crate::AssertionFailed).
///
/// This constructs a failure with the same arguments as [`failure!`] and
/// returns it wrapped in an `Err`. It is equivalent to writing
/// `return Err(failure!(...).into());`.
///
/// # Examples
///
/// ```
/// use lazytest::prelude::*;
///
/// fn check_port(port: u16) -> Result<(), AssertionFailed> {
///     if port < 1024 {
///         fail!("port {} is privileged", port);
///     }
///     Ok(())
/// }
///
/// assert!(check_port(80).is_err());
/// assert!(check_port(8080).is_ok());
/// ```
#[macro_export]
macro_rules! fail {
    () => {
        return $crate::__private::Err($crate::AssertionFailed::new())
    };
    ($($args:tt)+) => {
        return $crate::__private::Err($crate::failure!($($args)+).into())
    };
}

/// Return early with an [`AssertionFailed`](crate::AssertionFailed) unless a
/// condition holds.
///
/// With a single argument the failure carries a
/// [`Detail::Unsatisfied`](crate::Detail::Unsatisfied) naming the condition's
/// source text. Any further arguments are passed to [`fail!`].
///
/// # Examples
///
/// ```
/// use lazytest::{Detail, prelude::*};
///
/// fn positive(value: i32) -> Result<(), AssertionFailed> {
///     ensure!(value > 0);
///     Ok(())
/// }
///
/// let failure = positive(-1).unwrap_err();
/// assert!(matches!(
///     failure.detail(),
///     Some(Detail::Unsatisfied { predicate, actual: None }) if predicate == "value > 0"
/// ));
///
/// fn short(name: &str) -> Result<(), AssertionFailed> {
///     ensure!(name.len() < 4, "{name:?} is too long");
///     Ok(())
/// }
///
/// assert!(short("lazytest").is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr $(,)?) => {
        if !$cond {
            return $crate::__private::Err(
                $crate::__private::unsatisfied($crate::__private::stringify!($cond)).into(),
            );
        }
    };
    ($cond:expr, $($args:tt)+) => {
        if !$cond {
            $crate::fail!($($args)+);
        }
    };
}
