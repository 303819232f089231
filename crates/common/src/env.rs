//! Environment lookups shared by the service configs.
//!
//! An unset variable, an empty one and one that fails to parse all read as
//! absent, so callers fall back to their default.

use std::str::FromStr;

/// Returns the value of `key` if it is set and non-empty.
pub fn var(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok())
}

/// Parses the value of `key`, treating parse failures as unset.
pub fn parse<T: FromStr>(key: &str) -> Option<T> {
    parse_value(var(key))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_value<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_is_absent() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }

    #[test]
    fn unparsable_value_is_absent() {
        assert_eq!(parse_value::<u16>(Some("9090".to_string())), Some(9090));
        assert_eq!(parse_value::<u16>(Some("ninety".to_string())), None);
        assert_eq!(parse_value::<u16>(Some("70000".to_string())), None);
        assert_eq!(parse_value::<u32>(None), None);
    }

    #[test]
    fn missing_variable_is_absent() {
        assert_eq!(var("COMMON_ENV_TEST_SURELY_UNSET"), None);
        assert_eq!(parse::<u32>("COMMON_ENV_TEST_SURELY_UNSET"), None);
    }
}
