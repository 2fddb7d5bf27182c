//! In-page scripts evaluated by [`CdpPage`](crate::CdpPage).
//!
//! The scripts live in `scripts/` next to this file and are embedded at
//! compile time.

use std::time::Duration;

use expander_core::Activation;

const SNAPSHOT_JS: &str = include_str!("scripts/snapshot.js");
const ACTIVATE_JS: &str = include_str!("scripts/activate.js");
const WATCH_JS: &str = include_str!("scripts/watch.js");

pub(crate) const SCROLL_HEIGHT_JS: &str =
    "Math.max(document.body ? document.body.scrollHeight : 0, document.documentElement.scrollHeight)";
pub(crate) const SCROLL_BOTTOM_JS: &str =
    "window.scrollTo(0, document.body ? document.body.scrollHeight : document.documentElement.scrollHeight)";
pub(crate) const SCROLL_TOP_JS: &str = "window.scrollTo(0, 0)";

pub(crate) fn snapshot_expression() -> &'static str {
    SNAPSHOT_JS
}

pub(crate) fn activate_expression(activation: &Activation) -> Result<String, serde_json::Error> {
    let payload = serde_json::to_string(activation)?;
    Ok(format!("({})({})", ACTIVATE_JS, payload))
}

pub(crate) fn watch_start_expression() -> String {
    format!("({}).start()", WATCH_JS)
}

pub(crate) fn watch_next_expression(window: Duration) -> String {
    format!("({}).next({})", WATCH_JS, window.as_millis())
}

pub(crate) fn watch_stop_expression() -> String {
    format!("({}).stop()", WATCH_JS)
}
