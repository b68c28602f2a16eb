//! Process-wide configuration of how failures are rendered.
//!
//! # When to Use Hooks
//!
//! **Most users don't need hooks** - the defaults work well. Use hooks when you
//! need to:
//! - Render a detail type from another crate more readably
//! - Redact values before failures reach shared logs
//! - Change the layout of every failure (ASCII-only output, a single line, a
//!   different headline)
//!
//! **If you just need to customize a single failure**, pick a
//! [handler](crate::handlers) when creating it, or render it with
//! [`AssertionFailed::format_with`](crate::AssertionFailed::format_with).
//!
//! # Hook Types
//!
//! - **[`detail_formatter`]**: Format the details of one specific type.
//! - **[`failure_formatter`]**: Format the layout of every failure.
//! - **`panic_hook`** (`std` only): Print raised failures that nothing
//!   catches.
//!
//! Hooks are meant to be registered once, at the start of a test binary.
//! Registering one while failures are being rendered on other threads is
//! safe, but those threads may still use the previous hook.

pub mod detail_formatter;
pub mod failure_formatter;
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod panic_hook;

pub use self::{
    detail_formatter::{DetailFormatter, register_detail_formatter},
    failure_formatter::{DefaultFailureFormatter, FailureFormatter, register_failure_formatter},
};

#[cfg(not(feature = "std"))]
use spin::RwLock;
#[cfg(feature = "std")]
use std::sync::{PoisonError, RwLock};

/// A process-wide hook slot, empty until something is registered.
///
/// Without `std` the lock spins. With `std` a poisoned lock is recovered:
/// every update either replaces the slot or makes one map insert or removal,
/// so a panic while the lock is held cannot leave the slot half-updated.
pub(crate) struct HookCell<T: 'static + Send + Sync>(RwLock<Option<T>>);

impl<T: 'static + Send + Sync> HookCell<T> {
    pub(crate) const fn new() -> Self {
        Self(RwLock::new(None))
    }

    /// Runs `f` on the current hook while holding the read lock.
    pub(crate) fn with<R>(&'static self, f: impl FnOnce(Option<&T>) -> R) -> R {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();
        #[cfg(feature = "std")]
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);

        f(guard.as_ref())
    }

    /// Runs `f` on the slot while holding the write lock.
    pub(crate) fn update<R>(&'static self, f: impl FnOnce(&mut Option<T>) -> R) -> R {
        #[cfg(not(feature = "std"))]
        let mut guard = self.0.write();
        #[cfg(feature = "std")]
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);

        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::HookCell;

    static SLOT: HookCell<u32> = HookCell::new();

    #[test]
    fn test_hook_cell_starts_empty_and_updates() {
        assert_eq!(SLOT.with(|value| value.copied()), None);
        let previous = SLOT.update(|slot| slot.replace(3));
        assert_eq!(previous, None);
        assert_eq!(SLOT.with(|value| value.copied()), Some(3));
        SLOT.update(|slot| *slot = None);
        assert_eq!(SLOT.with(|value| value.copied()), None);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_hook_cell_recovers_from_poison() {
        static POISONED: HookCell<u32> = HookCell::new();
        let result = std::panic::catch_unwind(|| POISONED.update(|_| -> () { panic!("while updating") }));
        assert!(result.is_err());
        POISONED.update(|slot| *slot = Some(9));
        assert_eq!(POISONED.with(|value| value.copied()), Some(9));
    }
}
