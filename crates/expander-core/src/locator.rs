//! Control recognition: which elements of a snapshot get activated.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use scraper::{ElementRef, Selector};

use crate::config::ScannerConfig;
use crate::error::LocatorError;
use crate::page::{Activation, ActivationAction, ControlKind};
use crate::snapshot::{DomSnapshot, NodeHandle, SnapshotElement};

/// Produces the ordered activations for one snapshot.
///
/// Implementations are pure; swapping one in adapts the scanner to a
/// different site structure.
pub trait ControlLocator: Send + Sync {
    fn locate(&self, snapshot: &DomSnapshot) -> Vec<Activation>;
}

/// Selector and label-pattern rules compiled from a [`ScannerConfig`].
#[derive(Debug)]
pub struct RuleLocator {
    exclusion_zones: Vec<Selector>,
    collapsed_hosts: Vec<Selector>,
    text_controls: Vec<Selector>,
    more_patterns: Vec<Regex>,
    action_rows: Vec<Selector>,
    action_labels: Vec<Regex>,
    legacy_controls: Vec<Selector>,
    summary: Selector,
    button: Selector,
}

impl RuleLocator {
    pub fn new(config: &ScannerConfig) -> Result<Self, LocatorError> {
        Ok(Self {
            exclusion_zones: compile_selectors(&config.exclusion_zones)?,
            collapsed_hosts: compile_selectors(&config.collapsed_hosts)?,
            text_controls: compile_selectors(&config.text_controls)?,
            more_patterns: compile_patterns(&config.more_patterns)?,
            action_rows: compile_selectors(&config.action_row_selectors)?,
            action_labels: compile_patterns(&config.action_label_patterns)?,
            legacy_controls: compile_selectors(&config.legacy_controls)?,
            summary: compile_selector("details > summary")?,
            button: compile_selector("button")?,
        })
    }

    /// Whether a plain control's label asks for more replies or comments.
    pub fn is_more_label(&self, label: &str) -> bool {
        if self.action_labels.iter().any(|p| p.is_match(label)) {
            return false;
        }
        self.more_patterns.iter().any(|p| p.is_match(label))
    }

    fn collapsed_host(&self, host: &ElementRef<'_>) -> Option<Activation> {
        let mark = host.handle()?;
        let region = host.shadow_root().unwrap_or(*host);

        let affordance = region
            .select(&self.summary)
            .find_map(|s| s.handle())
            .or_else(|| region.select(&self.button).find_map(|b| b.handle()));

        let action = match affordance {
            Some(target) => ActivationAction::Click(target),
            None => ActivationAction::SetOpen,
        };

        Some(Activation {
            kind: ControlKind::CollapsedHost,
            mark,
            action,
        })
    }
}

impl ControlLocator for RuleLocator {
    fn locate(&self, snapshot: &DomSnapshot) -> Vec<Activation> {
        let mut claimed: HashSet<NodeHandle> = HashSet::new();
        let mut activations = Vec::new();

        // Collapsed hosts live in encapsulated subtrees whose layout is not
        // observable, so visibility is not checked for them.
        for selector in &self.collapsed_hosts {
            for host in snapshot.select(selector) {
                if host.within(&self.exclusion_zones) || host.is_marked() {
                    continue;
                }
                if let Some(activation) = self.collapsed_host(&host) {
                    if claim(&mut claimed, &activation) {
                        activations.push(activation);
                    }
                }
            }
        }

        for selector in &self.text_controls {
            for control in snapshot.select(selector) {
                if !self.eligible(&control) || control.within(&self.action_rows) {
                    continue;
                }
                if !self.is_more_label(&control.label()) {
                    continue;
                }
                if let Some(handle) = control.handle() {
                    let activation = Activation::click(ControlKind::MoreLabel, handle);
                    if claim(&mut claimed, &activation) {
                        activations.push(activation);
                    }
                }
            }
        }

        for selector in &self.legacy_controls {
            for control in snapshot.select(selector) {
                if !self.eligible(&control) {
                    continue;
                }
                if let Some(handle) = control.handle() {
                    let activation = Activation::click(ControlKind::Legacy, handle);
                    if claim(&mut claimed, &activation) {
                        activations.push(activation);
                    }
                }
            }
        }

        activations
    }
}

impl RuleLocator {
    /// Exclusion zone, mark and visibility checks, in that order.
    fn eligible(&self, control: &ElementRef<'_>) -> bool {
        !control.within(&self.exclusion_zones) && !control.is_marked() && control.is_rendered()
    }
}

/// Reserve the handles an activation touches; false if one is already taken.
fn claim(claimed: &mut HashSet<NodeHandle>, activation: &Activation) -> bool {
    let target = match activation.action {
        ActivationAction::Click(target) => Some(target),
        ActivationAction::SetOpen => None,
    };
    if claimed.contains(&activation.mark) || target.is_some_and(|t| claimed.contains(&t)) {
        return false;
    }
    claimed.insert(activation.mark);
    claimed.extend(target);
    true
}

fn compile_selector(selector: &str) -> Result<Selector, LocatorError> {
    Selector::parse(selector).map_err(|e| LocatorError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

fn compile_selectors(selectors: &[String]) -> Result<Vec<Selector>, LocatorError> {
    selectors.iter().map(|s| compile_selector(s)).collect()
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, LocatorError> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .map_err(LocatorError::from)
        })
        .collect()
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
