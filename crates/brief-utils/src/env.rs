//! Environment variable helpers

use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Errors raised while resolving environment configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// A mandatory variable is absent or blank
    #[error("{0} is not set. Update your .env or environment variables.")]
    Missing(String),
}

/// Value of a non-blank environment variable, if any
fn non_blank(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Return the value of a required environment variable or fail
pub fn require_env(name: &str) -> Result<String, EnvError> {
    non_blank(name).ok_or_else(|| EnvError::Missing(name.to_string()))
}

/// Emit a warning when an optional credential is absent
///
/// Returns whether the variable is present.
pub fn warn_if_missing(name: &str) -> bool {
    let present = non_blank(name).is_some();
    if !present {
        warn!("{name} is not configured; related data sources may be limited");
    }
    present
}

/// Parse `name` into `T`
///
/// Unset yields `None`. A value that does not parse is logged and also
/// yields `None`, so callers fall back to their defaults.
pub fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = non_blank(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("{name}='{raw}' is invalid; using the default instead");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_missing() {
        let err = require_env("BRIEF_UTILS_TEST_NEVER_SET").unwrap_err();
        assert_eq!(err, EnvError::Missing("BRIEF_UTILS_TEST_NEVER_SET".to_string()));
        assert!(err.to_string().starts_with("BRIEF_UTILS_TEST_NEVER_SET is not set"));
    }

    #[test]
    fn test_require_env_present() {
        // SAFETY: unique variable name, not read by any other test
        unsafe {
            std::env::set_var("BRIEF_UTILS_TEST_PRESENT", "value");
        }
        assert_eq!(require_env("BRIEF_UTILS_TEST_PRESENT").unwrap(), "value");
        assert!(warn_if_missing("BRIEF_UTILS_TEST_PRESENT"));
    }

    #[test]
    fn test_blank_counts_as_missing() {
        // SAFETY: unique variable name, not read by any other test
        unsafe {
            std::env::set_var("BRIEF_UTILS_TEST_BLANK", "   ");
        }
        assert!(require_env("BRIEF_UTILS_TEST_BLANK").is_err());
        assert!(!warn_if_missing("BRIEF_UTILS_TEST_BLANK"));
    }

    #[test]
    fn test_env_parse() {
        // SAFETY: unique variable names, not read by any other test
        unsafe {
            std::env::set_var("BRIEF_UTILS_TEST_NUM", "365");
            std::env::set_var("BRIEF_UTILS_TEST_BAD_NUM", "a year");
        }
        assert_eq!(env_parse::<u32>("BRIEF_UTILS_TEST_NUM"), Some(365));
        assert_eq!(env_parse::<u32>("BRIEF_UTILS_TEST_BAD_NUM"), None);
        assert_eq!(env_parse::<u32>("BRIEF_UTILS_TEST_UNSET_NUM"), None);
    }
}
