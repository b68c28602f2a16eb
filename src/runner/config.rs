use alloc::{borrow::ToOwned, string::String};
use std::sync::OnceLock;

/// Settings of a [`Runner`](super::Runner).
///
/// # Examples
///
/// ```
/// use lazytest::runner::RunnerConfig;
///
/// let config = RunnerConfig::parse("fail-fast, filter=parser");
/// assert!(config.fail_fast);
/// assert!(!config.isolate);
/// assert!(config.selects("parser::empty_input"));
/// assert!(!config.selects("lexer::empty_input"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Stop after the first case that does not pass. The remaining cases are
    /// reported as skipped.
    pub fail_fast: bool,
    /// Run every case on its own thread.
    pub isolate: bool,
    /// Only run cases whose name contains this substring.
    pub filter: Option<String>,
}

impl RunnerConfig {
    /// Parses a comma-separated option list.
    ///
    /// Recognized options are `fail-fast`, `isolate` and `filter=<substring>`.
    /// Option names are case-insensitive and unknown options are ignored.
    #[must_use]
    pub fn parse(options: &str) -> Self {
        let mut config = Self::default();
        for option in options.split(',').map(str::trim) {
            if option.eq_ignore_ascii_case("fail-fast") {
                config.fail_fast = true;
            } else if option.eq_ignore_ascii_case("isolate") {
                config.isolate = true;
            } else if let Some((key, value)) = option.split_once('=')
                && key.trim().eq_ignore_ascii_case("filter")
            {
                let value = value.trim();
                config.filter = (!value.is_empty()).then(|| value.to_owned());
            }
        }
        config
    }

    /// The configuration given by the `LAZYTEST` environment variable.
    ///
    /// The variable uses the format accepted by [`parse`](Self::parse). It is
    /// read once per process; later changes to the environment are not
    /// seen.
    #[must_use]
    pub fn from_env() -> Self {
        static LAZYTEST_FLAGS: OnceLock<RunnerConfig> = OnceLock::new();

        LAZYTEST_FLAGS
            .get_or_init(|| match std::env::var_os("LAZYTEST") {
                Some(var) => Self::parse(&var.to_string_lossy()),
                None => Self::default(),
            })
            .clone()
    }

    /// Returns `true` if a case named `name` passes the filter.
    #[must_use]
    pub fn selects(&self, name: &str) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|filter| name.contains(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options() {
        assert_eq!(RunnerConfig::parse(""), RunnerConfig::default());
        assert!(RunnerConfig::default().selects("anything"));
    }

    #[test]
    fn test_all_options() {
        let config = RunnerConfig::parse("ISOLATE,fail-fast , filter = math::");
        assert_eq!(
            config,
            RunnerConfig {
                fail_fast: true,
                isolate: true,
                filter: Some("math::".to_owned()),
            }
        );
    }

    #[test]
    fn test_unknown_and_empty_filter_are_ignored() {
        let config = RunnerConfig::parse("verbose,filter=");
        assert_eq!(config, RunnerConfig::default());
    }
}
