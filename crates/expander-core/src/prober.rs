//! Scroll-to-bottom growth detection.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::page::ExpansionPage;

/// Scrolls to the bottom and reports whether the document grew.
#[derive(Debug, Clone)]
pub struct GrowthProber {
    settle: Duration,
}

impl GrowthProber {
    pub fn new(settle: Duration) -> Self {
        Self { settle }
    }

    /// One probe. Returns `false` without scrolling when already cancelled.
    ///
    /// The settle delay always runs to completion once started.
    pub async fn probe_once<P>(&self, page: &P, cancel: &CancellationToken) -> bool
    where
        P: ExpansionPage + ?Sized,
    {
        if cancel.is_cancelled() {
            return false;
        }

        let before = match page.scroll_height().await {
            Ok(height) => height,
            Err(e) => {
                warn!("Failed to read scroll height: {}", e);
                return false;
            }
        };

        if let Err(e) = page.scroll_to_bottom().await {
            warn!("Failed to scroll to bottom: {}", e);
            return false;
        }

        tokio::time::sleep(self.settle).await;

        match page.scroll_height().await {
            Ok(after) => {
                trace!(before, after, "Probe finished");
                after > before
            }
            Err(e) => {
                warn!("Failed to read scroll height: {}", e);
                false
            }
        }
    }
}
