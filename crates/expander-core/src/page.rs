//! The page capability the engine drives.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PageError;
use crate::snapshot::NodeHandle;

/// Which rule made a control eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    /// A collapsed shadow-hosted comment.
    CollapsedHost,
    /// A plain control whose label reads like "more replies".
    MoreLabel,
    /// An old-layout "load more children" or collapsed-thread control.
    Legacy,
}

/// What the backend does after marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "node", rename_all = "snake_case")]
pub enum ActivationAction {
    /// Simulate a user click on the element.
    Click(NodeHandle),
    /// Put the marked host into its open state directly.
    SetOpen,
}

/// One control to activate.
///
/// The backend sets the activation mark on `mark` (and on a distinct click
/// target) before performing `action`, so a throwing click still leaves the
/// control marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub kind: ControlKind,
    pub mark: NodeHandle,
    pub action: ActivationAction,
}

impl Activation {
    /// Click `target` and mark it.
    pub fn click(kind: ControlKind, target: NodeHandle) -> Self {
        Self {
            kind,
            mark: target,
            action: ActivationAction::Click(target),
        }
    }
}

/// Summary of an element the page reported as inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedNode {
    /// Lowercase tag name.
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Distinct tag names found below the node.
    #[serde(default)]
    pub nested_tags: Vec<String>,
    /// Distinct classes found below the node.
    #[serde(default)]
    pub nested_classes: Vec<String>,
}

/// A live document the engine can scroll, inspect and click.
///
/// Implementations are driven strictly sequentially by one engine.
#[async_trait]
pub trait ExpansionPage: Send + Sync {
    /// Serialize the document as snapshot markup (see [`crate::snapshot`]).
    async fn snapshot(&self) -> Result<String, PageError>;

    /// Resolve, mark, then perform one activation from the latest snapshot.
    ///
    /// A stale handle yields [`PageError::StaleNode`] with nothing marked.
    async fn activate(&self, activation: &Activation) -> Result<(), PageError>;

    /// Total scrollable height of the document.
    async fn scroll_height(&self) -> Result<f64, PageError>;

    async fn scroll_to_bottom(&self) -> Result<(), PageError>;

    async fn scroll_to_top(&self) -> Result<(), PageError>;

    /// Begin queueing inserted elements, replacing any earlier observation.
    async fn start_observing(&self) -> Result<(), PageError>;

    /// Drain the queued insertions, or wait up to `window` for the next
    /// batch. Returns an empty batch when the window elapses.
    ///
    /// Elements inserted between two calls stay queued for the next one.
    async fn observe_insertions(&self, window: Duration) -> Result<Vec<InsertedNode>, PageError>;

    /// Tear down the observation and drop anything still queued.
    async fn stop_observing(&self) -> Result<(), PageError>;
}
