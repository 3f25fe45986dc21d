//! Helpers for the broker and registry URL strings.

use crate::keys::CONFLUENT_COMPAT_PATH;

/// Remove a single trailing `/`, if present.
pub fn trim_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}

/// Append the Confluent-compatible API path to an already normalized registry URL.
pub fn compat_endpoint(registry_url: &str) -> String {
    format!("{registry_url}{CONFLUENT_COMPAT_PATH}")
}

/// Whether the broker URL asks for TLS.
pub fn is_secured(url: &str) -> bool {
    url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_trailing_slash() {
        assert_eq!(trim_trailing_slash("http://registry:8080/"), "http://registry:8080");
        assert_eq!(trim_trailing_slash("http://registry:8080"), "http://registry:8080");
        // only one slash is removed
        assert_eq!(trim_trailing_slash("http://registry//"), "http://registry/");
        assert_eq!(trim_trailing_slash(""), "");
    }

    #[test]
    fn test_compat_endpoint() {
        assert_eq!(
            compat_endpoint("http://registry:8080"),
            "http://registry:8080/apis/ccompat/v6"
        );
    }

    #[test]
    fn test_is_secured() {
        assert!(is_secured("https://broker:9093"));
        assert!(!is_secured("http://broker:9092"));
        assert!(!is_secured("broker:9092"));
        assert!(!is_secured("HTTPS://broker:9093"));
    }
}
