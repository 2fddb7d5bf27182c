//! In-memory page used by the engine's tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use scraper::{ElementRef, Html};
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::error::PageError;
use crate::page::{Activation, ActivationAction, ExpansionPage, InsertedNode};
use crate::snapshot::{MARK_ATTR, NODE_ATTR};

#[derive(Default)]
struct FixtureState {
    body: String,
    marked: HashSet<u64>,
    attempts: HashMap<u64, usize>,
    successes: HashMap<u64, usize>,
    failing: HashSet<u64>,
    stale: HashSet<u64>,
    reveals: HashMap<u64, VecDeque<String>>,
    height: f64,
    growth: VecDeque<f64>,
    pending: Vec<InsertedNode>,
    observing: bool,
    observations: usize,
    fail_snapshots: bool,
    snapshots: usize,
    bottom_scrolls: usize,
    top_scrolls: usize,
}

/// A page whose document is a string of annotated HTML.
pub(crate) struct FixturePage {
    state: Mutex<FixtureState>,
    inserted: Notify,
}

impl FixturePage {
    pub(crate) fn new(body: &str) -> Self {
        Self {
            state: Mutex::new(FixtureState {
                body: body.to_string(),
                height: 1000.0,
                ..Default::default()
            }),
            inserted: Notify::new(),
        }
    }

    /// Make activations marked on `handle` throw after marking.
    pub(crate) fn fail_activation(&self, handle: u64) {
        self.state.lock().failing.insert(handle);
    }

    /// Make the next activation marked on `handle` find its target gone.
    pub(crate) fn stale_once(&self, handle: u64) {
        self.state.lock().stale.insert(handle);
    }

    /// Append `fragment` to the document each time `handle` is activated.
    pub(crate) fn reveal_on_activate(&self, handle: u64, fragment: &str) {
        self.state
            .lock()
            .reveals
            .entry(handle)
            .or_default()
            .push_back(fragment.to_string());
    }

    /// Each scroll to the bottom grows the document by the next amount.
    pub(crate) fn grow_on_scroll(&self, amounts: &[f64]) {
        self.state.lock().growth.extend(amounts.iter().copied());
    }

    pub(crate) fn fail_snapshots(&self, fail: bool) {
        self.state.lock().fail_snapshots = fail;
    }

    /// Append `fragment`, reporting it as inserted while observed.
    pub(crate) fn insert(&self, fragment: &str) {
        let mut state = self.state.lock();
        Self::append(&mut state, fragment);
        drop(state);
        self.inserted.notify_one();
    }

    pub(crate) fn activation_count(&self, handle: u64) -> usize {
        self.state.lock().successes.get(&handle).copied().unwrap_or(0)
    }

    pub(crate) fn activation_attempts(&self, handle: u64) -> usize {
        self.state.lock().attempts.get(&handle).copied().unwrap_or(0)
    }

    pub(crate) fn total_activations(&self) -> usize {
        self.state.lock().successes.values().sum()
    }

    pub(crate) fn is_marked(&self, handle: u64) -> bool {
        self.state.lock().marked.contains(&handle)
    }

    pub(crate) fn bottom_scrolls(&self) -> usize {
        self.state.lock().bottom_scrolls
    }

    pub(crate) fn top_scrolls(&self) -> usize {
        self.state.lock().top_scrolls
    }

    pub(crate) fn is_observing(&self) -> bool {
        self.state.lock().observing
    }

    /// Observations started so far.
    pub(crate) fn observation_count(&self) -> usize {
        self.state.lock().observations
    }

    pub(crate) fn snapshot_count(&self) -> usize {
        self.state.lock().snapshots
    }

    fn append(state: &mut FixtureState, fragment: &str) {
        state.body.push_str(fragment);
        if state.observing {
            state.pending.extend(summarize(fragment));
        }
    }

    fn render(state: &FixtureState) -> String {
        let mut body = state.body.clone();
        for handle in &state.marked {
            let attr = format!(r#"{}="{}""#, NODE_ATTR, handle);
            let marked = format!(r#"{} {}="true""#, attr, MARK_ATTR);
            body = body.replace(&attr, &marked);
        }
        format!("<html><body>{}</body></html>", body)
    }
}

/// Describe the top-level elements of a fragment the way a page backend would.
fn summarize(fragment: &str) -> Vec<InsertedNode> {
    let html = Html::parse_fragment(fragment);
    html.root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .map(|el| {
            let mut nested_tags = Vec::new();
            let mut nested_classes = Vec::new();
            for nested in el.descendants().skip(1).filter_map(ElementRef::wrap) {
                let tag = nested.value().name().to_string();
                if !nested_tags.contains(&tag) {
                    nested_tags.push(tag);
                }
                for class in nested.value().classes() {
                    if !nested_classes.iter().any(|c| c == class) {
                        nested_classes.push(class.to_string());
                    }
                }
            }
            InsertedNode {
                tag: el.value().name().to_string(),
                classes: el.value().classes().map(str::to_string).collect(),
                nested_tags,
                nested_classes,
            }
        })
        .collect()
}

#[async_trait]
impl ExpansionPage for FixturePage {
    async fn snapshot(&self) -> Result<String, PageError> {
        let mut state = self.state.lock();
        if state.fail_snapshots {
            return Err(PageError::Closed);
        }
        state.snapshots += 1;
        Ok(Self::render(&state))
    }

    async fn activate(&self, activation: &Activation) -> Result<(), PageError> {
        let mut state = self.state.lock();
        let handle = activation.mark.0;
        *state.attempts.entry(handle).or_default() += 1;
        if state.stale.remove(&handle) {
            return Err(PageError::StaleNode(format!("#{}", handle)));
        }
        state.marked.insert(handle);

        if state.failing.contains(&handle) {
            return Err(PageError::Script(format!("click on {} threw", handle)));
        }
        if let ActivationAction::Click(target) = activation.action {
            if target != activation.mark {
                state.marked.insert(target.0);
            }
        }
        *state.successes.entry(handle).or_default() += 1;

        let revealed = state.reveals.get_mut(&handle).and_then(|q| q.pop_front());
        if let Some(fragment) = revealed {
            Self::append(&mut state, &fragment);
            drop(state);
            self.inserted.notify_one();
        }
        Ok(())
    }

    async fn scroll_height(&self) -> Result<f64, PageError> {
        Ok(self.state.lock().height)
    }

    async fn scroll_to_bottom(&self) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.bottom_scrolls += 1;
        if let Some(amount) = state.growth.pop_front() {
            state.height += amount;
        }
        Ok(())
    }

    async fn scroll_to_top(&self) -> Result<(), PageError> {
        self.state.lock().top_scrolls += 1;
        Ok(())
    }

    async fn start_observing(&self) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.observing = true;
        state.observations += 1;
        state.pending.clear();
        Ok(())
    }

    async fn observe_insertions(&self, window: Duration) -> Result<Vec<InsertedNode>, PageError> {
        let deadline = Instant::now() + window;
        loop {
            {
                let mut state = self.state.lock();
                if !state.pending.is_empty() {
                    return Ok(std::mem::take(&mut state.pending));
                }
            }
            if tokio::time::timeout_at(deadline, self.inserted.notified())
                .await
                .is_err()
            {
                return Ok(Vec::new());
            }
        }
    }

    async fn stop_observing(&self) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.observing = false;
        state.pending.clear();
        Ok(())
    }
}
