//! Output surfaces the engine writes to.
//!
//! Hosts own the real surfaces (a stylesheet slot, a preview area, a script
//! runner) and hand them to the session at construction. The engine never
//! creates them itself.
//!
//! The `Memory*` and [`RecordingExecutor`] types keep their state behind a
//! shared handle: clone one, give the clone to the session, and inspect the
//! original afterwards.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;

/// Identifier of a committed markup node, in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Where the presentation layer should scroll to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    /// Bring the start of a freshly committed node into view.
    Committed(NodeId),
    /// Keep the bottom of the growing live markup in view.
    LiveEnd,
}

/// Receives the effective stylesheet.
pub trait StyleSurface: Send {
    /// Replaces the applied stylesheet wholesale.
    fn apply(&mut self, stylesheet: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()> {
        self.apply("")
    }
}

/// Live and committed markup.
pub trait PreviewSurface: Send {
    /// Overwrites the live slot with the markup typed so far.
    fn set_live(&mut self, markup: &str) -> Result<()>;

    fn clear_live(&mut self) -> Result<()>;

    /// Appends a finished block after all previously committed ones.
    fn commit(&mut self, markup: &str) -> Result<NodeId>;

    fn scroll_into_view(&mut self, target: ScrollTarget);

    /// Removes every committed node and the live slot.
    fn clear(&mut self) -> Result<()>;
}

/// Runs script regions.
///
/// Scripts run with the host's full privileges; implementations that need
/// isolation must provide it themselves. The engine only guarantees that
/// each script runs at most once per session, in document order.
pub trait EffectExecutor: Send {
    fn execute(&mut self, source: &str) -> Result<()>;
}

/// The injected surfaces, owned by the session.
pub struct Surfaces {
    pub style: Box<dyn StyleSurface>,
    pub preview: Box<dyn PreviewSurface>,
    pub executor: Box<dyn EffectExecutor>,
}

impl Surfaces {
    pub fn new(
        style: impl StyleSurface + 'static,
        preview: impl PreviewSurface + 'static,
        executor: impl EffectExecutor + 'static,
    ) -> Self {
        Self {
            style: Box::new(style),
            preview: Box::new(preview),
            executor: Box::new(executor),
        }
    }
}

impl std::fmt::Debug for Surfaces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surfaces").finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What a [`MemoryStyle`] has seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleLog {
    /// Currently applied stylesheet.
    pub current: String,
    /// Every stylesheet applied, in order.
    pub history: Vec<String>,
}

/// In-memory stylesheet slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStyle {
    inner: Arc<Mutex<StyleLog>>,
}

impl MemoryStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StyleLog {
        lock(&self.inner).clone()
    }

    pub fn current(&self) -> String {
        lock(&self.inner).current.clone()
    }
}

impl StyleSurface for MemoryStyle {
    fn apply(&mut self, stylesheet: &str) -> Result<()> {
        let mut log = lock(&self.inner);
        log.current = stylesheet.to_string();
        log.history.push(stylesheet.to_string());
        Ok(())
    }
}

/// What a [`MemoryPreview`] holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewState {
    /// Committed nodes in commit order; `NodeId(i)` is `committed[i]`.
    pub committed: Vec<String>,
    pub live: String,
    /// Every live write, including clears.
    pub live_history: Vec<String>,
    pub scrolls: Vec<ScrollTarget>,
}

/// In-memory preview area.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreview {
    inner: Arc<Mutex<PreviewState>>,
}

impl MemoryPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PreviewState {
        lock(&self.inner).clone()
    }
}

impl PreviewSurface for MemoryPreview {
    fn set_live(&mut self, markup: &str) -> Result<()> {
        let mut state = lock(&self.inner);
        state.live = markup.to_string();
        state.live_history.push(markup.to_string());
        Ok(())
    }

    fn clear_live(&mut self) -> Result<()> {
        self.set_live("")
    }

    fn commit(&mut self, markup: &str) -> Result<NodeId> {
        let mut state = lock(&self.inner);
        state.committed.push(markup.to_string());
        Ok(NodeId(state.committed.len() - 1))
    }

    fn scroll_into_view(&mut self, target: ScrollTarget) {
        lock(&self.inner).scrolls.push(target);
    }

    fn clear(&mut self) -> Result<()> {
        let mut state = lock(&self.inner);
        state.committed.clear();
        state.live.clear();
        Ok(())
    }
}

type FailWhen = fn(&str) -> bool;

/// Executor that records scripts instead of running them.
///
/// Every invocation is recorded, including those made to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    runs: Arc<Mutex<Vec<String>>>,
    fail_when: Option<FailWhen>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every script for which `predicate` returns true.
    pub fn failing_when(predicate: FailWhen) -> Self {
        Self {
            runs: Arc::default(),
            fail_when: Some(predicate),
        }
    }

    pub fn runs(&self) -> Vec<String> {
        lock(&self.runs).clone()
    }
}

impl EffectExecutor for RecordingExecutor {
    fn execute(&mut self, source: &str) -> Result<()> {
        lock(&self.runs).push(source.to_string());
        match self.fail_when {
            Some(fail) if fail(source) => anyhow::bail!("script failed: {source}"),
            _ => Ok(()),
        }
    }
}
