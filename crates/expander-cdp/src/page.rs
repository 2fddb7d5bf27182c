//! [`ExpansionPage`] over a CDP page session.

use std::time::Duration;

use async_trait::async_trait;
use expander_core::{Activation, ExpansionPage, InsertedNode, PageError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::trace;

use crate::error::CdpError;
use crate::protocol::PageInfo;
use crate::scripts;
use crate::session::PageSession;

/// A browser tab driven through in-page scripts.
#[derive(Debug)]
pub struct CdpPage {
    session: PageSession,
}

#[derive(Debug, Deserialize)]
struct ActivationReply {
    ok: bool,
    #[serde(default)]
    stale: bool,
    #[serde(default)]
    error: Option<String>,
}

impl ActivationReply {
    fn into_result(self) -> Result<(), PageError> {
        if self.ok {
            return Ok(());
        }
        let message = self.error.unwrap_or_else(|| "activation failed".to_string());
        if self.stale {
            Err(PageError::StaleNode(message))
        } else {
            Err(PageError::Script(message))
        }
    }
}

impl CdpPage {
    pub fn new(session: PageSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    async fn eval<T: DeserializeOwned>(&self, expression: &str) -> Result<T, CdpError> {
        let value = self.session.evaluate(expression).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl ExpansionPage for CdpPage {
    async fn snapshot(&self) -> Result<String, PageError> {
        let markup: String = self.eval(scripts::snapshot_expression()).await?;
        trace!(bytes = markup.len(), "Snapshot taken");
        Ok(markup)
    }

    async fn activate(&self, activation: &Activation) -> Result<(), PageError> {
        let expression = scripts::activate_expression(activation).map_err(CdpError::from)?;
        let reply: ActivationReply = self.eval(&expression).await?;
        reply.into_result()
    }

    async fn scroll_height(&self) -> Result<f64, PageError> {
        Ok(self.eval(scripts::SCROLL_HEIGHT_JS).await?)
    }

    async fn scroll_to_bottom(&self) -> Result<(), PageError> {
        self.session.evaluate(scripts::SCROLL_BOTTOM_JS).await?;
        Ok(())
    }

    async fn scroll_to_top(&self) -> Result<(), PageError> {
        self.session.evaluate(scripts::SCROLL_TOP_JS).await?;
        Ok(())
    }

    async fn start_observing(&self) -> Result<(), PageError> {
        self.session.evaluate(&scripts::watch_start_expression()).await?;
        Ok(())
    }

    async fn observe_insertions(&self, window: Duration) -> Result<Vec<InsertedNode>, PageError> {
        let batch: Vec<InsertedNode> = self.eval(&scripts::watch_next_expression(window)).await?;
        trace!(inserted = batch.len(), "Observation finished");
        Ok(batch)
    }

    async fn stop_observing(&self) -> Result<(), PageError> {
        self.session.evaluate(&scripts::watch_stop_expression()).await?;
        Ok(())
    }
}

/// Which tab to attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSelection<'a> {
    /// A tab that passes the URL filter.
    Found(&'a PageInfo),
    /// The explicitly requested tab exists but fails the URL filter.
    FilterMismatch(&'a PageInfo),
    /// No tab qualifies.
    NoMatch,
}

/// Pick the tab to expand.
///
/// With `target`, the first page tab whose id equals it or whose URL
/// contains it is chosen and then checked against `url_filter`. Without it,
/// the first page tab whose URL contains `url_filter` is chosen.
pub fn select_page<'a>(
    pages: &'a [PageInfo],
    url_filter: &str,
    target: Option<&str>,
) -> PageSelection<'a> {
    let mut tabs = pages.iter().filter(|p| p.is_page());

    match target {
        Some(target) => match tabs.find(|p| p.id == target || p.url.contains(target)) {
            Some(page) if page.url.contains(url_filter) => PageSelection::Found(page),
            Some(page) => PageSelection::FilterMismatch(page),
            None => PageSelection::NoMatch,
        },
        None => tabs
            .find(|p| p.url.contains(url_filter))
            .map_or(PageSelection::NoMatch, PageSelection::Found),
    }
}
