//! Event-driven wait for newly inserted comment content.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::ScannerConfig;
use crate::page::{ExpansionPage, InsertedNode};

/// Decides whether an inserted element counts as new content.
pub trait ContentPredicate: Send + Sync {
    fn matches(&self, node: &InsertedNode) -> bool;
}

/// Matches comment elements by tag or class, on the node or below it.
#[derive(Debug, Clone)]
pub struct CommentLike {
    tags: Vec<String>,
    classes: Vec<String>,
}

impl CommentLike {
    pub fn new(tags: Vec<String>, classes: Vec<String>) -> Self {
        Self {
            tags: tags.into_iter().map(|t| t.to_lowercase()).collect(),
            classes,
        }
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self::new(config.comment_tags.clone(), config.comment_classes.clone())
    }
}

impl ContentPredicate for CommentLike {
    fn matches(&self, node: &InsertedNode) -> bool {
        let tag_hit = |tag: &String| self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag));
        let class_hit = |class: &String| self.classes.contains(class);

        tag_hit(&node.tag)
            || node.classes.iter().any(class_hit)
            || node.nested_tags.iter().any(tag_hit)
            || node.nested_classes.iter().any(class_hit)
    }
}

/// Resolve `true` if `signal` yields `true` before `timeout`, else `false`.
///
/// The signal future is dropped on timeout.
pub async fn wait_for_signal<F>(signal: F, timeout: Duration) -> bool
where
    F: Future<Output = bool>,
{
    tokio::time::timeout(timeout, signal).await.unwrap_or(false)
}

/// Waits for the page to report comment-like insertions.
pub struct ContentWatcher {
    predicate: Box<dyn ContentPredicate>,
}

impl ContentWatcher {
    pub fn new(predicate: Box<dyn ContentPredicate>) -> Self {
        Self { predicate }
    }

    /// Suspend until new comment content appears or `timeout` elapses.
    ///
    /// One observation spans the whole wait, so content inserted while a
    /// non-comment batch is being checked is still seen. It is torn down
    /// on both outcomes.
    pub async fn wait_for_new_content<P>(&self, page: &P, timeout: Duration) -> bool
    where
        P: ExpansionPage + ?Sized,
    {
        if let Err(e) = page.start_observing().await {
            warn!("Failed to start observing insertions: {}", e);
            return false;
        }

        let deadline = Instant::now() + timeout;
        let signal = async {
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    return false;
                }
                match page.observe_insertions(remaining).await {
                    Ok(batch) if batch.is_empty() => return false,
                    Ok(batch) => {
                        if batch.iter().any(|node| self.predicate.matches(node)) {
                            return true;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to observe insertions: {}", e);
                        return false;
                    }
                }
            }
        };

        let found = wait_for_signal(signal, timeout).await;
        if let Err(e) = page.stop_observing().await {
            warn!("Failed to stop observing insertions: {}", e);
        }
        debug!(found, "Content wait finished");
        found
    }
}

impl std::fmt::Debug for ContentWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentWatcher").finish_non_exhaustive()
    }
}
