//! # Expander Core
//!
//! Reveals collapsed and lazy-loaded comment threads on a discussion page by
//! alternating two activities until the page stops changing:
//!
//! - scrolling to the bottom so the page loads more content, and
//! - activating every "more replies" / "load more" style control.
//!
//! The engine never talks to a browser itself. It drives anything that
//! implements [`ExpansionPage`]; the `expander-cdp` crate provides a Chrome
//! DevTools Protocol implementation.
//!
//! ```rust,ignore
//! let engine = ExpansionEngine::new(page, EngineConfig::default(), &ScannerConfig::default())?;
//! let result = engine.start(Some(Arc::new(|msg: &str| println!("{msg}")))).await?;
//! println!("expanded {} (aborted: {})", result.expanded_count, result.aborted);
//! ```

mod config;
mod controller;
mod engine;
mod error;
mod locator;
mod page;
mod prober;
mod progress;
mod scanner;
pub mod snapshot;
mod watcher;

#[cfg(test)]
mod fixture;

pub use config::{EngineConfig, ScannerConfig};
pub use controller::ExpansionResult;
pub use engine::{ExpansionEngine, QuickExpandResult, StopOutcome};
pub use error::{EngineError, LocatorError, PageError};
pub use locator::{ControlLocator, RuleLocator};
pub use page::{Activation, ActivationAction, ControlKind, ExpansionPage, InsertedNode};
pub use prober::GrowthProber;
pub use progress::ProgressSink;
pub use scanner::ClickScanner;
pub use snapshot::{DomSnapshot, NodeHandle};
pub use watcher::{wait_for_signal, CommentLike, ContentPredicate, ContentWatcher};
