//! Process-wide formatting overrides for specific detail types.
//!
//! A [`DetailFormatter`] registered for a type `D` replaces the handler of
//! every `AssertionFailed<D>` when the failure is rendered. This is useful for
//! detail types from other crates whose `Debug` output is unreadable, or to
//! redact values in shared logs.
//!
//! ```
//! use core::fmt;
//!
//! use lazytest::{
//!     AssertionFailed,
//!     hooks::detail_formatter::{DetailFormatter, register_detail_formatter},
//! };
//!
//! #[derive(Debug)]
//! struct Token(String);
//!
//! struct RedactTokens;
//!
//! impl DetailFormatter<Token> for RedactTokens {
//!     fn display(&self, token: &Token, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "Token(<{} bytes>)", token.0.len())
//!     }
//! }
//!
//! register_detail_formatter::<Token, _>(RedactTokens);
//!
//! let failure = AssertionFailed::with_detail(Token("s3cr3t".to_string()));
//! let text = failure.to_string();
//! assert!(text.contains("Token(<6 bytes>)"));
//! assert!(!text.contains("s3cr3t"));
//! ```
//!
//! Closures with the signature `Fn(&D, &mut fmt::Formatter<'_>) -> fmt::Result`
//! implement [`DetailFormatter`] as well.

use alloc::fmt;
use core::{
    any::{Any, TypeId},
    marker::PhantomData,
    panic::Location,
};

use hashbrown::HashMap;
use triomphe::Arc;
use unsize::CoerceUnsize;

use crate::{handlers::FormattingFunction, hooks::HookCell};

type HookMap = HashMap<TypeId, Arc<dyn UntypedDetailFormatter>, rustc_hash::FxBuildHasher>;

static HOOKS: HookCell<HookMap> = HookCell::new();

fn get_hook(type_id: TypeId) -> Option<Arc<dyn UntypedDetailFormatter>> {
    HOOKS.with(|hooks| hooks?.get(&type_id).cloned())
}

/// Overrides how details of type `D` are rendered.
pub trait DetailFormatter<D>: 'static + Send + Sync {
    /// Renders the detail when the failure is formatted with `Display`.
    fn display(&self, detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Renders the detail when the failure is formatted with `Debug`.
    ///
    /// Defaults to [`display`](DetailFormatter::display).
    fn debug(&self, detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display(detail, f)
    }
}

impl<D, F> DetailFormatter<D> for F
where
    F: Fn(&D, &mut fmt::Formatter<'_>) -> fmt::Result + Send + Sync + 'static,
{
    fn display(&self, detail: &D, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self(detail, f)
    }
}

struct Hook<D, H> {
    hook: H,
    added_at: &'static Location<'static>,
    _hooked_type: PhantomData<fn(&D)>,
}

impl<D, H> core::fmt::Display for Hook<D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Detail formatter {} for detail type {} registered at {}:{}",
            core::any::type_name::<H>(),
            core::any::type_name::<D>(),
            self.added_at.file(),
            self.added_at.line()
        )
    }
}

trait UntypedDetailFormatter: 'static + Send + Sync + core::fmt::Display {
    fn format(
        &self,
        detail: &dyn Any,
        function: FormattingFunction,
        f: &mut fmt::Formatter<'_>,
    ) -> Option<fmt::Result>;
}

impl<D, H> UntypedDetailFormatter for Hook<D, H>
where
    D: 'static,
    H: DetailFormatter<D>,
{
    fn format(
        &self,
        detail: &dyn Any,
        function: FormattingFunction,
        f: &mut fmt::Formatter<'_>,
    ) -> Option<fmt::Result> {
        let detail = detail.downcast_ref::<D>()?;
        Some(match function {
            FormattingFunction::Display => self.hook.display(detail, f),
            FormattingFunction::Debug => self.hook.debug(detail, f),
        })
    }
}

/// Registers `hook` for every detail of type `D`.
///
/// A later registration for the same type replaces the earlier one.
#[track_caller]
pub fn register_detail_formatter<D, H>(hook: H)
where
    D: 'static,
    H: DetailFormatter<D>,
{
    let hook: Hook<D, H> = Hook {
        hook,
        added_at: Location::caller(),
        _hooked_type: PhantomData,
    };
    let hook: Arc<Hook<D, H>> = Arc::new(hook);
    let hook = hook.unsize(unsize::Coercion!(to dyn UntypedDetailFormatter));

    HOOKS.update(|hooks| {
        hooks
            .get_or_insert_default()
            .insert(TypeId::of::<D>(), hook);
    });
}

/// Removes the formatter registered for `D`, returning whether there was one.
pub fn unregister_detail_formatter<D: 'static>() -> bool {
    HOOKS.update(|hooks| {
        hooks
            .as_mut()
            .is_some_and(|hooks| hooks.remove(&TypeId::of::<D>()).is_some())
    })
}

/// Describes the formatter registered for `D`, if any.
///
/// The description names the formatter type and where it was registered.
#[must_use]
pub fn describe_detail_formatter<D: 'static>() -> Option<alloc::string::String> {
    use alloc::string::ToString;

    get_hook(TypeId::of::<D>()).map(|hook| hook.to_string())
}

pub(crate) fn format_detail<D: 'static>(
    detail: &D,
    fallback: fn(&D, &mut fmt::Formatter<'_>) -> fmt::Result,
    function: FormattingFunction,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    if let Some(hook) = get_hook(TypeId::of::<D>())
        && let Some(result) = hook.format(detail, function, f)
    {
        result
    } else {
        fallback(detail, f)
    }
}
