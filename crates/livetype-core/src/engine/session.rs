//! Playback session: document, reveal cursor, projector and surfaces.
//!
//! The session is synchronous. It knows how long the next tick should wait
//! but never waits itself; the runtime owns the timer.

use std::time::Duration;

use tracing::{error, info};

use super::projector::Projector;
use super::surfaces::Surfaces;
use super::timing::{self, Pause};
use crate::config::TypingConfig;
use crate::document::{Document, Region};

/// Snapshot of playback progress for the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStatus {
    /// Revealed bytes.
    pub cursor: usize,
    /// Document length in bytes.
    pub total: usize,
    /// Whether the typing cursor should be shown.
    pub typing: bool,
    /// Whether the final message should be shown.
    pub complete: bool,
    /// Number of restarts so far. Observers that may miss intermediate
    /// statuses compare this instead of watching the cursor go backwards.
    pub restarts: u64,
}

#[derive(Debug)]
pub struct Session {
    document: Document,
    cursor: usize,
    projector: Projector,
    surfaces: Surfaces,
    typing: TypingConfig,
    restarts: u64,
}

impl Session {
    pub fn new(document: Document, surfaces: Surfaces, typing: TypingConfig) -> Self {
        Self {
            document,
            cursor: 0,
            projector: Projector::new(),
            surfaces,
            typing,
            restarts: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn regions(&self) -> &[Region] {
        self.document.regions()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The typed prefix of the document.
    pub fn revealed(&self) -> &str {
        &self.document.text()[..self.cursor]
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.document.len()
    }

    /// True while there is something left to type.
    pub fn is_typing(&self) -> bool {
        !self.document.is_empty() && !self.is_complete()
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            cursor: self.cursor,
            total: self.document.len(),
            typing: self.is_typing(),
            complete: self.is_complete(),
            restarts: self.restarts,
        }
    }

    /// Region indices in commit order.
    pub fn committed(&self) -> &[usize] {
        self.projector.committed()
    }

    /// The effective stylesheet built so far.
    pub fn stylesheet(&self) -> String {
        self.projector.styles().stylesheet()
    }

    pub fn next_pause(&self) -> Option<Pause> {
        timing::pause_at(&self.document, self.cursor)
    }

    /// Delay before the next tick, or `None` when nothing is left to type.
    pub fn next_delay(&self) -> Option<Duration> {
        self.next_pause().map(|pause| pause.duration(&self.typing))
    }

    /// Reveals one more character and projects the new cursor.
    ///
    /// Returns `false` if the document was already fully revealed.
    pub fn tick(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.cursor = self.document.next_boundary(self.cursor);
        self.project();
        if self.is_complete() {
            info!(regions = self.regions().len(), "typing complete");
        }
        true
    }

    /// Jumps straight to the end, committing every region in order.
    pub fn skip(&mut self) {
        info!(from = self.cursor, "skipping to end");
        self.cursor = self.document.len();
        self.project();
    }

    /// Clears every surface and cache and rewinds to the start.
    pub fn restart(&mut self) {
        info!(from = self.cursor, "restarting");
        if let Err(e) = self.surfaces.style.clear() {
            error!("clearing stylesheet failed: {e:#}");
        }
        if let Err(e) = self.surfaces.preview.clear() {
            error!("clearing preview failed: {e:#}");
        }
        self.projector.reset();
        self.cursor = 0;
        self.restarts += 1;
    }

    fn project(&mut self) {
        self.projector
            .project(&self.document, self.cursor, &mut self.surfaces);
    }
}
