//! Engine and scanner configuration.
//!
//! The round/pass/probe thresholds are empirically tuned; they are kept as
//! named values so a deployment can adjust them without touching the loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bounds and delays for the run loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hard ceiling on rounds per run.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Maximum scroll probes in one scroll sub-loop.
    #[serde(default = "default_max_probe_attempts")]
    pub max_probe_attempts: u32,

    /// Maximum scan passes in one expand sub-loop.
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,

    /// Consecutive zero-activation passes that end an expand sub-loop.
    #[serde(default = "default_idle_pass_limit")]
    pub idle_pass_limit: u32,

    /// Consecutive unproductive rounds that trigger the double-check.
    #[serde(default = "default_idle_round_limit")]
    pub idle_round_limit: u32,

    /// Delay between scrolling to the bottom and re-reading the height.
    #[serde(default = "default_probe_settle_ms")]
    pub probe_settle_ms: u64,

    /// Delay after every scan pass.
    #[serde(default = "default_pass_settle_ms")]
    pub pass_settle_ms: u64,

    /// Upper bound on waiting for new content after a productive pass.
    #[serde(default = "default_content_timeout_ms")]
    pub content_timeout_ms: u64,
}

impl EngineConfig {
    pub fn probe_settle(&self) -> Duration {
        Duration::from_millis(self.probe_settle_ms)
    }

    pub fn pass_settle(&self) -> Duration {
        Duration::from_millis(self.pass_settle_ms)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_millis(self.content_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_probe_attempts: default_max_probe_attempts(),
            max_passes: default_max_passes(),
            idle_pass_limit: default_idle_pass_limit(),
            idle_round_limit: default_idle_round_limit(),
            probe_settle_ms: default_probe_settle_ms(),
            pass_settle_ms: default_pass_settle_ms(),
            content_timeout_ms: default_content_timeout_ms(),
        }
    }
}

fn default_max_rounds() -> u32 {
    100
}

fn default_max_probe_attempts() -> u32 {
    20
}

fn default_max_passes() -> u32 {
    20
}

fn default_idle_pass_limit() -> u32 {
    3
}

fn default_idle_round_limit() -> u32 {
    2
}

fn default_probe_settle_ms() -> u64 {
    400
}

fn default_pass_settle_ms() -> u64 {
    400
}

fn default_content_timeout_ms() -> u64 {
    1500
}

/// Selectors and label patterns that decide which controls get activated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Regions whose descendants are never activated.
    #[serde(default = "default_exclusion_zones")]
    pub exclusion_zones: Vec<String>,

    /// Collapsed composite hosts (shadow-encapsulated comment elements).
    #[serde(default = "default_collapsed_hosts")]
    pub collapsed_hosts: Vec<String>,

    /// Plain clickable controls recognized by their label.
    #[serde(default = "default_text_controls")]
    pub text_controls: Vec<String>,

    /// Label patterns meaning "reveal more replies/comments".
    #[serde(default = "default_more_patterns")]
    pub more_patterns: Vec<String>,

    /// Menus, overflow buttons and action rows.
    #[serde(default = "default_action_row_selectors")]
    pub action_row_selectors: Vec<String>,

    /// Labels of action-row controls that may look like "more" buttons.
    #[serde(default = "default_action_label_patterns")]
    pub action_label_patterns: Vec<String>,

    /// Old-layout controls, eligible regardless of label.
    #[serde(default = "default_legacy_controls")]
    pub legacy_controls: Vec<String>,

    /// Tags of inserted nodes that count as new comments.
    #[serde(default = "default_comment_tags")]
    pub comment_tags: Vec<String>,

    /// Classes of inserted nodes that count as new comments.
    #[serde(default = "default_comment_classes")]
    pub comment_classes: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            exclusion_zones: default_exclusion_zones(),
            collapsed_hosts: default_collapsed_hosts(),
            text_controls: default_text_controls(),
            more_patterns: default_more_patterns(),
            action_row_selectors: default_action_row_selectors(),
            action_label_patterns: default_action_label_patterns(),
            legacy_controls: default_legacy_controls(),
            comment_tags: default_comment_tags(),
            comment_classes: default_comment_classes(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_exclusion_zones() -> Vec<String> {
    strings(&[
        "header",
        "nav",
        "aside",
        "#right-sidebar-container",
        r#"[data-testid="subreddit-sidebar"]"#,
        "pdp-right-rail",
        r#"[slot="right-sidebar"]"#,
        r#"shreddit-async-loader[bundlename="sidebar"]"#,
    ])
}

fn default_collapsed_hosts() -> Vec<String> {
    strings(&["shreddit-comment[collapsed]"])
}

fn default_text_controls() -> Vec<String> {
    strings(&["button", r#"[role="button"]"#])
}

fn default_more_patterns() -> Vec<String> {
    strings(&[
        r"^\d+\s*more\s*repl",
        r"^more\s*comments?$",
        r"^more\s*replies$",
        r"^view\s*more",
        r"^see\s*more",
        r"^load\s*more",
    ])
}

fn default_action_row_selectors() -> Vec<String> {
    strings(&[
        "[aria-haspopup]",
        "shreddit-overflow-menu",
        "shreddit-comment-action-row",
        r#"[slot="actionRow"]"#,
    ])
}

fn default_action_label_patterns() -> Vec<String> {
    strings(&[r"^share", r"^award", r"^reply", r"^more\s*options"])
}

fn default_legacy_controls() -> Vec<String> {
    strings(&[
        ".morecomments a",
        ".morechildren a",
        ".thing.collapsed > .entry .expand",
    ])
}

fn default_comment_tags() -> Vec<String> {
    strings(&["shreddit-comment"])
}

fn default_comment_classes() -> Vec<String> {
    strings(&["comment"])
}
