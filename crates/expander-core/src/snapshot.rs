//! Parsed view of the page's annotated snapshot markup.
//!
//! A page backend serializes the live document (open shadow roots included)
//! into HTML where:
//!
//! - every element carries [`NODE_ATTR`] with a handle unique to the snapshot,
//! - elements without a rendered box carry [`HIDDEN_ATTR`],
//! - each shadow root becomes a [`SHADOW_ROOT_TAG`] child of its host,
//! - activated elements carry [`MARK_ATTR`].
//!
//! Handles stay valid until the backend takes its next snapshot.

use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Attribute holding the element handle.
pub const NODE_ATTR: &str = "data-expander-node";

/// Attribute present on elements that are not laid out.
pub const HIDDEN_ATTR: &str = "data-expander-hidden";

/// Activation mark. Survives scrolling and re-renders of ancestors.
pub const MARK_ATTR: &str = "data-expander-activated";

/// Wrapper element standing in for a shadow root.
pub const SHADOW_ROOT_TAG: &str = "expander-shadow-root";

/// Identifies one element of the snapshot the backend took last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeHandle(pub u64);

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A parsed snapshot.
pub struct DomSnapshot {
    html: Html,
}

impl DomSnapshot {
    /// Parse snapshot markup.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// All elements matching `selector`, in document order.
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.html.select(selector)
    }

    /// Find an element by handle.
    pub fn element(&self, handle: NodeHandle) -> Option<ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.handle() == Some(handle))
    }
}

impl std::fmt::Debug for DomSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomSnapshot").finish_non_exhaustive()
    }
}

/// Snapshot annotations read off an element.
pub trait SnapshotElement<'a> {
    /// Handle assigned by the backend.
    fn handle(&self) -> Option<NodeHandle>;

    /// Whether the element has a rendered box.
    fn is_rendered(&self) -> bool;

    /// Whether the element carries the activation mark.
    fn is_marked(&self) -> bool;

    /// The serialized shadow root hosted by this element.
    fn shadow_root(&self) -> Option<ElementRef<'a>>;

    /// Trimmed, whitespace-collapsed, lowercased label.
    fn label(&self) -> String;

    /// Whether the element or one of its ancestors matches any selector.
    fn within(&self, selectors: &[Selector]) -> bool;
}

impl<'a> SnapshotElement<'a> for ElementRef<'a> {
    fn handle(&self) -> Option<NodeHandle> {
        self.value()
            .attr(NODE_ATTR)
            .and_then(|v| v.trim().parse().ok())
            .map(NodeHandle)
    }

    fn is_rendered(&self) -> bool {
        self.value().attr(HIDDEN_ATTR).is_none()
    }

    fn is_marked(&self) -> bool {
        self.value().attr(MARK_ATTR).is_some()
    }

    fn shadow_root(&self) -> Option<ElementRef<'a>> {
        self.children()
            .filter_map(ElementRef::wrap)
            .find(|child| child.value().name() == SHADOW_ROOT_TAG)
    }

    fn label(&self) -> String {
        // Light-tree text only, like `textContent`.
        let text = self
            .descendants()
            .filter(|node| {
                !node
                    .ancestors()
                    .take_while(|ancestor| *ancestor != **self)
                    .any(|ancestor| {
                        ancestor
                            .value()
                            .as_element()
                            .is_some_and(|el| el.name() == SHADOW_ROOT_TAG)
                    })
            })
            .filter_map(|node| node.value().as_text())
            .flat_map(|text| text.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            self.value()
                .attr("aria-label")
                .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
                .unwrap_or_default()
                .to_lowercase()
        } else {
            text.to_lowercase()
        }
    }

    fn within(&self, selectors: &[Selector]) -> bool {
        if selectors.iter().any(|s| s.matches(self)) {
            return true;
        }
        self.ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| selectors.iter().any(|s| s.matches(&ancestor)))
    }
}
