//! Page-scoped engine exposing start/stop/status/quick-expand.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{EngineConfig, ScannerConfig};
use crate::controller::{ExpansionResult, RoundController};
use crate::error::{EngineError, LocatorError};
use crate::locator::{ControlLocator, RuleLocator};
use crate::page::ExpansionPage;
use crate::progress::{ProgressReporter, ProgressSink};
use crate::scanner::ClickScanner;
use crate::watcher::{CommentLike, ContentPredicate, ContentWatcher};

/// Result of [`ExpansionEngine::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopOutcome {
    pub stopped: bool,
}

/// Result of [`ExpansionEngine::quick_expand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickExpandResult {
    pub expanded_count: usize,
}

/// Run slot. `running` is exactly `cancel.is_some()`.
#[derive(Debug, Default)]
struct EngineState {
    cancel: Option<CancellationToken>,
}

impl EngineState {
    fn is_running(&self) -> bool {
        self.cancel.is_some()
    }
}

/// Releases the run slot when a run ends, however it ends.
struct RunGuard<'a> {
    state: &'a Mutex<EngineState>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.state.lock().cancel = None;
    }
}

/// Expansion engine bound to one page.
///
/// At most one run is active per engine; a second `start` while one runs is
/// rejected rather than queued.
pub struct ExpansionEngine<P: ExpansionPage + ?Sized> {
    page: Arc<P>,
    controller: RoundController,
    state: Mutex<EngineState>,
}

impl<P: ExpansionPage + ?Sized> ExpansionEngine<P> {
    /// Build an engine with the rule-based locator and comment predicate.
    pub fn new(
        page: Arc<P>,
        config: EngineConfig,
        scanner: &ScannerConfig,
    ) -> Result<Self, LocatorError> {
        let locator = RuleLocator::new(scanner)?;
        let predicate = CommentLike::from_config(scanner);
        Ok(Self::with_parts(
            page,
            config,
            Box::new(locator),
            Box::new(predicate),
        ))
    }

    /// Build an engine with a custom locator and content predicate.
    pub fn with_parts(
        page: Arc<P>,
        config: EngineConfig,
        locator: Box<dyn ControlLocator>,
        predicate: Box<dyn ContentPredicate>,
    ) -> Self {
        let controller = RoundController::new(
            config,
            ClickScanner::new(locator),
            ContentWatcher::new(predicate),
        );
        Self {
            page,
            controller,
            state: Mutex::new(EngineState::default()),
        }
    }

    pub fn page(&self) -> &Arc<P> {
        &self.page
    }

    /// Run a full expansion.
    ///
    /// Returns [`EngineError::AlreadyRunning`] without side effects when a run
    /// is active. Cancellation via [`stop`](Self::stop) is not an error; it
    /// yields a result with `aborted: true`.
    pub async fn start(
        &self,
        progress: Option<ProgressSink>,
    ) -> Result<ExpansionResult, EngineError> {
        let (cancel, _guard) = self.acquire()?;
        let reporter = ProgressReporter::new(progress);
        Ok(self.controller.run(self.page.as_ref(), &cancel, &reporter).await)
    }

    /// Signal cancellation of the active run.
    pub fn stop(&self) -> StopOutcome {
        let state = self.state.lock();
        match &state.cancel {
            Some(token) => {
                token.cancel();
                info!("Stop requested");
                StopOutcome { stopped: true }
            }
            None => StopOutcome { stopped: false },
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().is_running()
    }

    /// One scan pass without scrolling.
    ///
    /// Occupies the run slot for the duration of the pass.
    pub async fn quick_expand(&self) -> Result<QuickExpandResult, EngineError> {
        let (_cancel, _guard) = self.acquire()?;
        let expanded_count = self.controller.scanner().scan(self.page.as_ref()).await?;
        debug!(expanded_count, "Quick expand finished");
        Ok(QuickExpandResult { expanded_count })
    }

    fn acquire(&self) -> Result<(CancellationToken, RunGuard<'_>), EngineError> {
        let mut state = self.state.lock();
        if state.is_running() {
            return Err(EngineError::AlreadyRunning);
        }
        let token = CancellationToken::new();
        state.cancel = Some(token.clone());
        drop(state);
        Ok((token, RunGuard { state: &self.state }))
    }
}

impl<P: ExpansionPage + ?Sized> std::fmt::Debug for ExpansionEngine<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpansionEngine")
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
