//! Progress delivery to an optional caller-supplied sink.

use std::sync::Arc;

/// Receives human-readable phase messages while a run is in progress.
pub type ProgressSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Forwards messages to the sink, if any.
#[derive(Clone, Default)]
pub(crate) struct ProgressReporter {
    sink: Option<ProgressSink>,
}

impl ProgressReporter {
    pub(crate) fn new(sink: Option<ProgressSink>) -> Self {
        Self { sink }
    }

    pub(crate) fn report(&self, message: &str) {
        if let Some(sink) = &self.sink {
            sink(message);
        }
    }
}
