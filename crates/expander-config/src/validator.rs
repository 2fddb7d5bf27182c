//! Configuration validation.

use expander_core::RuleLocator;

use crate::error::ConfigError;
use crate::schema::Config;

/// Above this many rounds a run on a huge thread can take very long.
const MAX_ROUNDS_WARNING: u32 = 1000;

/// Page scripts are bounded by the 30 s CDP request timeout.
const CONTENT_TIMEOUT_LIMIT_MS: u64 = 30_000;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError::InvalidValue`]; keep the
    /// warnings otherwise.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_engine(config, &mut result);
        Self::validate_scanner(config, &mut result);

        result
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let endpoint = &config.browser.endpoint;
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            result.add_error(ValidationError::new(
                "browser.endpoint",
                "endpoint must start with http:// or https://",
            ));
        }

        if config.browser.url_filter.is_empty() {
            result.add_warning(ValidationWarning::new(
                "browser.url_filter",
                "url_filter is empty, every tab will match",
            ));
        }
    }

    fn validate_engine(config: &Config, result: &mut ValidationResult) {
        let engine = &config.engine;
        let bounds = [
            ("engine.max_rounds", engine.max_rounds),
            ("engine.max_probe_attempts", engine.max_probe_attempts),
            ("engine.max_passes", engine.max_passes),
            ("engine.idle_pass_limit", engine.idle_pass_limit),
            ("engine.idle_round_limit", engine.idle_round_limit),
        ];
        for (path, value) in bounds {
            if value == 0 {
                result.add_error(ValidationError::new(path, "must be greater than 0"));
            }
        }

        if engine.max_rounds > MAX_ROUNDS_WARNING {
            result.add_warning(ValidationWarning::new(
                "engine.max_rounds",
                "max_rounds is very high (>1000), a run may take very long to settle",
            ));
        }

        if engine.idle_pass_limit > engine.max_passes {
            result.add_warning(ValidationWarning::new(
                "engine.idle_pass_limit",
                "idle_pass_limit exceeds max_passes and will never be reached",
            ));
        }

        if engine.content_timeout_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "engine.content_timeout_ms",
                "content_timeout_ms is 0, new content will never be awaited",
            ));
        } else if engine.content_timeout_ms >= CONTENT_TIMEOUT_LIMIT_MS {
            result.add_error(ValidationError::new(
                "engine.content_timeout_ms",
                "content_timeout_ms must be below the 30000 ms CDP request timeout",
            ));
        }
    }

    fn validate_scanner(config: &Config, result: &mut ValidationResult) {
        let scanner = &config.scanner;
        if scanner.more_patterns.is_empty() {
            result.add_error(ValidationError::new(
                "scanner.more_patterns",
                "at least one label pattern is required",
            ));
        }
        if scanner.more_patterns.iter().any(|p| p.is_empty()) {
            result.add_error(ValidationError::new(
                "scanner.more_patterns",
                "patterns cannot be empty, they would match every control",
            ));
        }

        if scanner.text_controls.is_empty() {
            result.add_warning(ValidationWarning::new(
                "scanner.text_controls",
                "no text controls configured, only collapsed hosts and legacy controls will be expanded",
            ));
        }

        if scanner.comment_tags.is_empty() && scanner.comment_classes.is_empty() {
            result.add_warning(ValidationWarning::new(
                "scanner",
                "no comment tags or classes, every content wait will time out",
            ));
        }

        if let Err(e) = RuleLocator::new(scanner) {
            result.add_error(ValidationError::new("scanner", e.to_string()));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
