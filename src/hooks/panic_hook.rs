//! Printing of raised failures that nothing catches.
//!
//! [`AssertionFailed::raise`](crate::AssertionFailed::raise) panics with the
//! failure itself as payload. The standard panic hook only prints string
//! payloads, so a raised failure that escapes every
//! [`Runner`](crate::runner::Runner) would show up as `Box<dyn Any>`. The hook
//! installed here prints the rendered failure instead:
//!
//! ```text
//! thread 'worker' panicked at src/sync.rs:40:9:
//!  ● assertion failed: stale value 42
//!  ╰ src/sync.rs:38:23
//! ```
//!
//! The first call to `raise` installs the hook. Call [`install_panic_hook`]
//! up front to install it earlier, for example before replacing the panic
//! hook with your own. Panics that do not come from `raise` are passed to the
//! hook that was installed before.

use alloc::{
    boxed::Box,
    string::{String, ToString},
};
use core::{any::Any, cell::Cell};
use std::{panic, sync::Once};

use crate::AssertionFailed;

type RenderPayload = fn(&(dyn Any + Send)) -> Option<String>;

std::thread_local! {
    static RAISED: Cell<Option<RenderPayload>> = const { Cell::new(None) };
}

static INSTALL: Once = Once::new();

/// Installs the panic hook that prints raised failures.
///
/// The current hook is kept and receives every panic that was not raised
/// with [`AssertionFailed::raise`](crate::AssertionFailed::raise). Calling
/// this more than once has no further effect.
///
/// # Examples
///
/// ```
/// lazytest::hooks::panic_hook::install_panic_hook();
/// ```
pub fn install_panic_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let rendered = RAISED
                .try_with(Cell::take)
                .ok()
                .flatten()
                .and_then(|render| render(info.payload()));
            let Some(rendered) = rendered else {
                return previous(info);
            };

            let thread = std::thread::current();
            let name = thread.name().unwrap_or("<unnamed>");
            match info.location() {
                Some(location) => std::eprintln!("thread '{name}' panicked at {location}:\n{rendered}"),
                None => std::eprintln!("thread '{name}' panicked:\n{rendered}"),
            }
        }));
    });
}

/// Marks the next panic on this thread as a raised `AssertionFailed<D>`.
pub(crate) fn arm<D: 'static>() {
    install_panic_hook();
    let _ = RAISED.try_with(|raised| raised.set(Some(render_payload::<D>)));
}

fn render_payload<D: 'static>(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<AssertionFailed<D>>()
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Detail;

    #[test]
    fn test_render_payload_shows_the_detail() {
        let payload: Box<dyn Any + Send> =
            Box::new(AssertionFailed::from(Detail::message("stale value 42")).note("sync"));
        let text = render_payload::<Detail>(&*payload).unwrap();
        assert!(text.contains("assertion failed: stale value 42"));
        assert!(text.contains("sync"));
    }

    #[test]
    fn test_render_payload_ignores_other_payloads() {
        let message: Box<dyn Any + Send> = Box::new("plain panic");
        assert!(render_payload::<Detail>(&*message).is_none());

        let other: Box<dyn Any + Send> = Box::new(AssertionFailed::with_detail(7u8));
        assert!(render_payload::<Detail>(&*other).is_none());
        assert!(render_payload::<u8>(&*other).is_some_and(|text| text.contains(": 7")));
    }
}
