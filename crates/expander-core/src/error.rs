//! Engine, page and locator error types.

use thiserror::Error;

/// Errors returned by [`ExpansionEngine`](crate::ExpansionEngine) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A run is already active on this engine.
    #[error("Already running")]
    AlreadyRunning,

    /// The page could not be read.
    #[error("Page error: {0}")]
    Page(#[from] PageError),
}

/// Errors reported by an [`ExpansionPage`](crate::ExpansionPage) backend.
#[derive(Debug, Error)]
pub enum PageError {
    /// The connection to the page failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// An in-page script threw.
    #[error("Script error: {0}")]
    Script(String),

    /// The page did not answer in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A handle from the last snapshot no longer resolves. Nothing was marked.
    #[error("Stale node {0}")]
    StaleNode(String),

    /// The page is gone.
    #[error("Page closed")]
    Closed,

    /// The page answered with something unexpected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors building a [`RuleLocator`](crate::RuleLocator) from configuration.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// A CSS selector failed to parse.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// A label pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
