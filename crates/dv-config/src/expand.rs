//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("DV_TEST_DOCS_ROOT", "/srv/docs");
        }
        let result = expand_env("${DV_TEST_DOCS_ROOT}/framework", "entities.path").unwrap();
        assert_eq!(result, "/srv/docs/framework");
        unsafe {
            std::env::remove_var("DV_TEST_DOCS_ROOT");
        }
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("DV_TEST_MISSING");
        }
        let err = expand_env("${DV_TEST_MISSING}", "server.host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("DV_TEST_MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_expand_literal_unchanged() {
        let result = expand_env("docs/v2.4", "entities.path").unwrap();
        assert_eq!(result, "docs/v2.4");
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("$HOME/docs", "entities.path").unwrap();
        assert_eq!(result, "$HOME/docs");
    }
}
