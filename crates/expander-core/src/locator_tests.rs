use super::*;
use crate::config::ScannerConfig;
use crate::page::{ActivationAction, ControlKind};
use crate::snapshot::{DomSnapshot, NodeHandle};

fn locator() -> RuleLocator {
    RuleLocator::new(&ScannerConfig::default()).unwrap()
}

fn locate(body: &str) -> Vec<Activation> {
    let markup = format!("<html><body>{}</body></html>", body);
    locator().locate(&DomSnapshot::parse(&markup))
}

fn marks(activations: &[Activation]) -> Vec<u64> {
    activations.iter().map(|a| a.mark.0).collect()
}

#[test]
fn test_more_replies_and_view_more_but_not_share() {
    let found = locate(
        r#"
        <button data-expander-node="1">5 more replies</button>
        <button data-expander-node="2">View more comments</button>
        <button data-expander-node="3">Share</button>
        "#,
    );
    assert_eq!(marks(&found), vec![1, 2]);
    assert!(found.iter().all(|a| a.kind == ControlKind::MoreLabel));
}

#[test]
fn test_label_patterns() {
    let l = locator();
    assert!(l.is_more_label("12 more replies"));
    assert!(l.is_more_label("1 more reply"));
    assert!(l.is_more_label("more comments"));
    assert!(l.is_more_label("more comment"));
    assert!(l.is_more_label("more replies"));
    assert!(l.is_more_label("see more"));
    assert!(l.is_more_label("load more comments"));
    assert!(!l.is_more_label("more comments below"));
    assert!(!l.is_more_label("reply"));
    assert!(!l.is_more_label("share"));
    assert!(!l.is_more_label("more options"));
    assert!(!l.is_more_label(""));
}

#[test]
fn test_exclusion_zone_wins_over_label() {
    let found = locate(
        r#"
        <aside><button data-expander-node="1">View more</button></aside>
        <div id="right-sidebar-container"><div><button data-expander-node="2">More comments</button></div></div>
        <shreddit-async-loader bundlename="sidebar"><button data-expander-node="3">See more</button></shreddit-async-loader>
        <header><div class="morecomments"><a data-expander-node="4">load</a></div></header>
        <button data-expander-node="5">More comments</button>
        "#,
    );
    assert_eq!(marks(&found), vec![5]);
}

#[test]
fn test_marked_and_hidden_controls_skipped() {
    let found = locate(
        r#"
        <button data-expander-node="1" data-expander-activated="true">5 more replies</button>
        <button data-expander-node="2" data-expander-hidden="true">5 more replies</button>
        <div class="morechildren"><a data-expander-node="3" data-expander-hidden="true">load more</a></div>
        <button data-expander-node="4">3 more replies</button>
        "#,
    );
    assert_eq!(marks(&found), vec![4]);
}

#[test]
fn test_action_row_controls_excluded() {
    let found = locate(
        r#"
        <shreddit-comment-action-row><button data-expander-node="1">View more</button></shreddit-comment-action-row>
        <button data-expander-node="2" aria-haspopup="true">See more</button>
        <div slot="actionRow"><button data-expander-node="3">Load more</button></div>
        "#,
    );
    assert!(found.is_empty());
}

#[test]
fn test_collapsed_host_prefers_summary() {
    let found = locate(
        r#"
        <shreddit-comment data-expander-node="1" collapsed data-expander-hidden="true">
          <expander-shadow-root data-expander-node="2">
            <button data-expander-node="3">toggle</button>
            <details data-expander-node="4"><summary data-expander-node="5">expand</summary></details>
          </expander-shadow-root>
        </shreddit-comment>
        "#,
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, ControlKind::CollapsedHost);
    assert_eq!(found[0].mark, NodeHandle(1));
    assert_eq!(found[0].action, ActivationAction::Click(NodeHandle(5)));
}

#[test]
fn test_collapsed_host_falls_back_to_button_then_open() {
    let found = locate(
        r#"
        <shreddit-comment data-expander-node="1" collapsed>
          <expander-shadow-root data-expander-node="2"><button data-expander-node="3"></button></expander-shadow-root>
        </shreddit-comment>
        <shreddit-comment data-expander-node="4" collapsed>
          <expander-shadow-root data-expander-node="5"><span data-expander-node="6">x</span></expander-shadow-root>
        </shreddit-comment>
        "#,
    );
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].action, ActivationAction::Click(NodeHandle(3)));
    assert_eq!(found[1].mark, NodeHandle(4));
    assert_eq!(found[1].action, ActivationAction::SetOpen);
}

#[test]
fn test_collapsed_host_without_shadow_root_uses_light_tree() {
    let found = locate(
        r#"
        <shreddit-comment data-expander-node="1" collapsed>
          <button data-expander-node="2">expand</button>
        </shreddit-comment>
        "#,
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].action, ActivationAction::Click(NodeHandle(2)));
}

#[test]
fn test_expanded_or_marked_hosts_ignored() {
    let found = locate(
        r#"
        <shreddit-comment data-expander-node="1"><button data-expander-node="2">x</button></shreddit-comment>
        <shreddit-comment data-expander-node="3" collapsed data-expander-activated="true">
          <button data-expander-node="4">x</button>
        </shreddit-comment>
        <nav><shreddit-comment data-expander-node="5" collapsed></shreddit-comment></nav>
        "#,
    );
    assert!(found.is_empty());
}

#[test]
fn test_host_affordance_not_claimed_twice() {
    let found = locate(
        r#"
        <shreddit-comment data-expander-node="1" collapsed>
          <expander-shadow-root data-expander-node="2"><button data-expander-node="3">2 more replies</button></expander-shadow-root>
        </shreddit-comment>
        "#,
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, ControlKind::CollapsedHost);
}

#[test]
fn test_role_button_label_skips_shadow_text() {
    let found = locate(
        r#"
        <div role="button" data-expander-node="1"><expander-shadow-root><span>icon</span><slot></slot></expander-shadow-root>5 more replies</div>
        "#,
    );
    assert_eq!(marks(&found), vec![1]);
    assert_eq!(found[0].kind, ControlKind::MoreLabel);
}

#[test]
fn test_legacy_controls_ignore_label() {
    let found = locate(
        r#"
        <div class="morecomments"><a data-expander-node="1">load more comments (12 replies)</a></div>
        <div class="morechildren"><a data-expander-node="2">continue</a></div>
        <div class="thing collapsed">
          <div class="entry"><p><a class="expand" data-expander-node="3">[+]</a></p></div>
        </div>
        <div class="thing">
          <div class="entry"><a class="expand" data-expander-node="4">[-]</a></div>
        </div>
        "#,
    );
    assert_eq!(marks(&found), vec![1, 2, 3]);
    assert!(found.iter().all(|a| a.kind == ControlKind::Legacy));
}

#[test]
fn test_invalid_selector_rejected() {
    let config = ScannerConfig {
        exclusion_zones: vec!["div[".to_string()],
        ..ScannerConfig::default()
    };
    let err = RuleLocator::new(&config).unwrap_err();
    assert!(matches!(err, LocatorError::InvalidSelector { .. }));
}

#[test]
fn test_invalid_pattern_rejected() {
    let config = ScannerConfig {
        more_patterns: vec!["(".to_string()],
        ..ScannerConfig::default()
    };
    let err = RuleLocator::new(&config).unwrap_err();
    assert!(matches!(err, LocatorError::InvalidPattern(_)));
}
