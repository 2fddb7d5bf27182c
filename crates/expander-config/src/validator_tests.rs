use super::*;

#[test]
fn test_validate_default_config() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_zero_bounds() {
    let mut config = Config::default();
    config.engine.max_rounds = 0;
    config.engine.idle_round_limit = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "engine.max_rounds"));
    assert!(result.errors.iter().any(|e| e.path == "engine.idle_round_limit"));
}

#[test]
fn test_validate_high_max_rounds_warning() {
    let mut config = Config::default();
    config.engine.max_rounds = 5000;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "engine.max_rounds"));
}

#[test]
fn test_validate_content_timeout() {
    let mut config = Config::default();
    config.engine.content_timeout_ms = 45_000;
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "engine.content_timeout_ms"));

    config.engine.content_timeout_ms = 0;
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "engine.content_timeout_ms"));
}

#[test]
fn test_validate_endpoint_scheme() {
    let mut config = Config::default();
    config.browser.endpoint = "ws://localhost:9222".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.endpoint"));
}

#[test]
fn test_validate_empty_url_filter_warning() {
    let mut config = Config::default();
    config.browser.url_filter.clear();

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_validate_empty_patterns() {
    let mut config = Config::default();
    config.scanner.more_patterns.clear();
    assert!(!ConfigValidator::validate(&config).is_valid());

    config.scanner.more_patterns = vec![String::new()];
    assert!(!ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_validate_bad_selector_and_pattern() {
    let mut config = Config::default();
    config.scanner.exclusion_zones.push("nav >".to_string());
    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "scanner" && e.message.contains("nav >")));

    let mut config = Config::default();
    config.scanner.action_label_patterns.push("(unclosed".to_string());
    assert!(!ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_into_result() {
    let mut config = Config::default();
    config.engine.max_rounds = 5000;
    let warnings = ConfigValidator::validate(&config).into_result().unwrap();
    assert_eq!(warnings.len(), 1);

    config.engine.max_passes = 0;
    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "engine.max_passes"));
}

#[test]
fn test_validation_result_default() {
    let result = ValidationResult::default();
    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}
