//! The run loop: scroll and expand rounds until the page stops changing.
//!
//! ```text
//! Idle -> Scrolling -> Expanding -> (Idle | Scrolling) ... -> Done
//! ```
//!
//! Each round probes for lazy-loaded growth, then scans for expand controls
//! until a few passes in a row find nothing. Consecutive unproductive rounds
//! trigger one forced probe plus scan; if that finds nothing either the run
//! ends. Every loop is bounded, so a run always settles.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::page::ExpansionPage;
use crate::progress::ProgressReporter;
use crate::prober::GrowthProber;
use crate::scanner::ClickScanner;
use crate::watcher::ContentWatcher;

/// Outcome of one expansion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionResult {
    /// Activations performed during the run.
    pub expanded_count: usize,
    /// Whether the run stopped because it was cancelled.
    pub aborted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunPhase {
    Idle,
    Scrolling,
    Expanding,
    Done,
}

/// Drives the scanner, prober and watcher through rounds.
#[derive(Debug)]
pub struct RoundController {
    config: EngineConfig,
    scanner: ClickScanner,
    prober: GrowthProber,
    watcher: ContentWatcher,
}

impl RoundController {
    pub fn new(config: EngineConfig, scanner: ClickScanner, watcher: ContentWatcher) -> Self {
        let prober = GrowthProber::new(config.probe_settle());
        Self {
            config,
            scanner,
            prober,
            watcher,
        }
    }

    pub fn scanner(&self) -> &ClickScanner {
        &self.scanner
    }

    /// Run until the page stops changing, a bound is hit, or `cancel` fires.
    pub(crate) async fn run<P>(
        &self,
        page: &P,
        cancel: &CancellationToken,
        progress: &ProgressReporter,
    ) -> ExpansionResult
    where
        P: ExpansionPage + ?Sized,
    {
        let mut total = 0usize;
        let mut idle_rounds = 0u32;
        let mut phase = RunPhase::Idle;

        info!("Expansion run started");

        for round in 1..=self.config.max_rounds {
            if cancel.is_cancelled() {
                return Self::stopped(total, progress);
            }

            transition(&mut phase, RunPhase::Scrolling, round);
            let Some(grew) = self.scroll_phase(page, cancel, round, progress).await else {
                return Self::stopped(total, progress);
            };
            if let Err(e) = page.scroll_to_top().await {
                warn!("Failed to scroll to top: {}", e);
            }

            transition(&mut phase, RunPhase::Expanding, round);
            let Some(activated) = self.expand_phase(page, cancel, &mut total, progress).await else {
                return Self::stopped(total, progress);
            };

            transition(&mut phase, RunPhase::Idle, round);
            if grew || activated > 0 {
                idle_rounds = 0;
                continue;
            }

            idle_rounds += 1;
            debug!(round, idle_rounds, "Round was unproductive");
            if idle_rounds < self.config.idle_round_limit {
                continue;
            }

            if cancel.is_cancelled() {
                return Self::stopped(total, progress);
            }
            progress.report("Double-checking for more comments...");
            let grew = self.prober.probe_once(page, cancel).await;
            if cancel.is_cancelled() {
                return Self::stopped(total, progress);
            }
            let activated = self.scan_pass(page).await;
            total += activated;

            if !grew && activated == 0 {
                debug!(round, "Double-check found nothing");
                break;
            }
            idle_rounds = 0;
        }

        transition(&mut phase, RunPhase::Done, 0);
        if let Err(e) = page.scroll_to_top().await {
            warn!("Failed to scroll to top: {}", e);
        }
        progress.report("Done");
        info!(expanded = total, "Expansion run finished");

        ExpansionResult {
            expanded_count: total,
            aborted: false,
        }
    }

    /// Probe until the page stops growing. `None` when cancelled.
    async fn scroll_phase<P>(
        &self,
        page: &P,
        cancel: &CancellationToken,
        round: u32,
        progress: &ProgressReporter,
    ) -> Option<bool>
    where
        P: ExpansionPage + ?Sized,
    {
        let mut grew = false;
        for attempt in 1..=self.config.max_probe_attempts {
            if cancel.is_cancelled() {
                return None;
            }
            progress.report(&format!(
                "Scrolling to load comments... (round {}, probe {})",
                round, attempt
            ));
            if !self.prober.probe_once(page, cancel).await {
                break;
            }
            grew = true;
        }

        if cancel.is_cancelled() {
            return None;
        }
        Some(grew)
    }

    /// Scan until the idle pass limit or the pass bound. Adds every
    /// activation to `total` as it happens; `None` when cancelled.
    async fn expand_phase<P>(
        &self,
        page: &P,
        cancel: &CancellationToken,
        total: &mut usize,
        progress: &ProgressReporter,
    ) -> Option<usize>
    where
        P: ExpansionPage + ?Sized,
    {
        let mut activated = 0usize;
        let mut idle_passes = 0u32;

        for pass in 1..=self.config.max_passes {
            if cancel.is_cancelled() {
                return None;
            }

            let count = self.scan_pass(page).await;
            *total += count;
            activated += count;
            debug!(pass, count, total = *total, "Expand pass");
            progress.report(&format!("Expanding... ({} expanded)", total));

            if count == 0 {
                idle_passes += 1;
            } else {
                idle_passes = 0;
                if cancel.is_cancelled() {
                    return None;
                }
                self.watcher
                    .wait_for_new_content(page, self.config.content_timeout())
                    .await;
            }

            if cancel.is_cancelled() {
                return None;
            }
            tokio::time::sleep(self.config.pass_settle()).await;
            if idle_passes >= self.config.idle_pass_limit {
                break;
            }
        }

        Some(activated)
    }

    async fn scan_pass<P>(&self, page: &P) -> usize
    where
        P: ExpansionPage + ?Sized,
    {
        match self.scanner.scan(page).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Scan pass failed: {}", e);
                0
            }
        }
    }

    fn stopped(total: usize, progress: &ProgressReporter) -> ExpansionResult {
        progress.report("Stopped");
        info!(expanded = total, "Expansion run cancelled");
        ExpansionResult {
            expanded_count: total,
            aborted: true,
        }
    }
}

fn transition(phase: &mut RunPhase, next: RunPhase, round: u32) {
    if *phase != next {
        debug!(round, from = ?*phase, to = ?next, "Phase transition");
        *phase = next;
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
