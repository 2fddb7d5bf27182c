//! CDP page session for interacting with a single page.

use serde_json::{json, Value};
use tracing::debug;

use crate::client::Channel;
use crate::error::CdpError;
use crate::protocol::ExceptionDetails;

/// A flattened session attached to a single page target.
pub struct PageSession {
    target_id: String,
    session_id: String,
    channel: Channel,
}

impl PageSession {
    pub(crate) fn new(target_id: String, session_id: String, channel: Channel) -> Self {
        Self {
            target_id,
            session_id,
            channel,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a CDP command to this page session.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.channel.call(method, params, Some(&self.session_id)).await
    }

    /// Enable required CDP domains.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.call("Page.enable", None).await?;
        self.call("Runtime.enable", None).await?;

        debug!("Enabled CDP domains for session {}", self.session_id);
        Ok(())
    }

    /// Evaluate a JavaScript expression, awaiting a returned promise.
    pub async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .call(
                "Runtime.evaluate",
                Some(json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                })),
            )
            .await?;

        evaluation_value(result)
    }
}

impl std::fmt::Debug for PageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSession")
            .field("target_id", &self.target_id)
            .field("session_id", &self.session_id)
            .finish()
    }
}

/// Extract the returned value of a `Runtime.evaluate` result.
fn evaluation_value(mut result: Value) -> Result<Value, CdpError> {
    if let Some(exception) = result.get("exceptionDetails") {
        let details: ExceptionDetails = serde_json::from_value(exception.clone())?;
        return Err(CdpError::JavaScript(details.message().to_string()));
    }

    Ok(result["result"]["value"].take())
}
