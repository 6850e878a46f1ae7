#![allow(clippy::unwrap_used)]
use rstest::rstest;

use crate::config::{AnalyzerConfig, NameKind, default_name_kind};
use crate::error::ConfigError;

#[rstest]
#[case("Session", NameKind::Class)]
#[case("Request", NameKind::Class)]
#[case("get", NameKind::Function)]
#[case("parse_url", NameKind::Function)]
#[case("HTTP_Error", NameKind::Function)]
fn default_heuristic(#[case] name: &str, #[case] expected: NameKind) {
    assert_eq!(default_name_kind(name), expected);
}

#[test]
fn invalid_namespace_is_fatal() {
    let result = AnalyzerConfig::new(["not a path"]);
    assert!(matches!(result, Err(ConfigError::InvalidNamespace(_))));
}

#[test]
fn members_require_allowlisted_namespace() {
    let config = AnalyzerConfig::new(["sqlkit"]).unwrap();
    let result = config.with_members("webkit", ["get"]);
    assert!(matches!(result, Err(ConfigError::UnknownNamespace(_))));
}

#[test]
fn members_require_nonempty_allowlist() {
    let config = AnalyzerConfig::new(Vec::<String>::new()).unwrap();
    let result = config.with_members("sqlkit", ["connect"]);
    assert!(matches!(result, Err(ConfigError::EmptyAllowlist)));
}

#[test]
fn namespace_matching_respects_dotted_boundaries() {
    let config = AnalyzerConfig::new(["webkit.http"]).unwrap();
    assert_eq!(
        config.matching_namespace("webkit.http.Request"),
        Some("webkit.http")
    );
    assert!(config.matching_namespace("webkit.httpx.Request").is_none());
    assert!(config.matching_namespace("webkit").is_none());
}

#[test]
fn longest_namespace_wins_when_nested() {
    let config = AnalyzerConfig::new(["webkit", "webkit.http"]).unwrap();
    assert_eq!(
        config.matching_namespace("webkit.http.Request"),
        Some("webkit.http")
    );
    assert_eq!(config.matching_namespace("webkit.Page"), Some("webkit"));
}

#[test]
fn unknown_external_members_are_rejected() {
    let config = AnalyzerConfig::new(["sqlkit"])
        .unwrap()
        .with_members("sqlkit", ["connect", "execute"])
        .unwrap();
    assert!(config.is_known_external_member("sqlkit.Connection", "execute"));
    assert!(!config.is_known_external_member("sqlkit.Connection", "drop_all"));
}

#[test]
fn swapped_classifier_is_used() {
    fn everything_is_a_function(_name: &str) -> NameKind {
        NameKind::Function
    }
    let config = AnalyzerConfig::new(["sqlkit"])
        .unwrap()
        .with_kind_classifier(everything_is_a_function);
    assert_eq!(config.classify_name("Session"), NameKind::Function);
}
