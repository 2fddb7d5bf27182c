//! # Expander Config
//!
//! TOML configuration for the comment expander: browser endpoint, engine
//! thresholds and scanner rules.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{BrowserConfig, Config};
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
