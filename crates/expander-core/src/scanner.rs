//! One pass over the page: locate eligible controls and activate them.

use tracing::{debug, warn};

use crate::error::PageError;
use crate::locator::ControlLocator;
use crate::page::ExpansionPage;
use crate::snapshot::DomSnapshot;

/// Finds and activates every not-yet-activated "reveal more" control.
///
/// Marks make repeated scans idempotent: a control activated by an earlier
/// pass is never activated again.
pub struct ClickScanner {
    locator: Box<dyn ControlLocator>,
}

impl ClickScanner {
    pub fn new(locator: Box<dyn ControlLocator>) -> Self {
        Self { locator }
    }

    /// Run one pass and return the number of successful activations.
    ///
    /// A failing activation is logged and skipped; only a failed snapshot
    /// is reported to the caller.
    pub async fn scan<P>(&self, page: &P) -> Result<usize, PageError>
    where
        P: ExpansionPage + ?Sized,
    {
        let markup = page.snapshot().await?;
        let plan = {
            let snapshot = DomSnapshot::parse(&markup);
            self.locator.locate(&snapshot)
        };

        let mut activated = 0;
        for activation in &plan {
            match page.activate(activation).await {
                Ok(()) => activated += 1,
                Err(PageError::StaleNode(node)) => {
                    debug!(control = %activation.mark, "Stale node {}, left for the next pass", node);
                }
                Err(e) => {
                    warn!(
                        control = %activation.mark,
                        kind = ?activation.kind,
                        "Activation failed: {}",
                        e
                    );
                }
            }
        }

        debug!(candidates = plan.len(), activated, "Scan pass finished");
        Ok(activated)
    }
}

impl std::fmt::Debug for ClickScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickScanner").finish_non_exhaustive()
    }
}
