//! Source document and its executable regions.
//!
//! A [`Document`] is immutable once loaded. Regions are extracted exactly once,
//! when the document is built, and every offset (region bounds and the reveal
//! cursor) is a byte offset into the original text that always lands on a
//! char boundary.

mod region;

use std::sync::Arc;

pub use region::{FENCE, Region, RegionKind, extract};

/// An immutable source document with its extracted regions.
#[derive(Debug, Clone)]
pub struct Document {
    text: Arc<str>,
    regions: Arc<[Region]>,
}

impl Document {
    /// Builds a document and scans it for regions.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let regions = extract(&text).into();
        Self { text, regions }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Shared handle to the text, for hosts that slice the revealed prefix.
    pub fn shared_text(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Returns the character about to be revealed at `cursor`.
    pub fn char_at(&self, cursor: usize) -> Option<char> {
        self.text.get(cursor..)?.chars().next()
    }

    /// Returns the last revealed character before `cursor`.
    pub fn char_before(&self, cursor: usize) -> Option<char> {
        self.text.get(..cursor)?.chars().next_back()
    }

    /// Byte offset one character past `cursor`, clamped to the document length.
    pub fn next_boundary(&self, cursor: usize) -> usize {
        match self.char_at(cursor) {
            Some(ch) => cursor + ch.len_utf8(),
            None => self.len(),
        }
    }

    /// Returns the region whose `[start, end)` span contains `cursor`.
    pub fn region_at(&self, cursor: usize) -> Option<&Region> {
        // Regions are sorted and non-overlapping: the only candidate is the
        // last one starting at or before the cursor.
        let idx = self.regions.partition_point(|r| r.start <= cursor);
        let region = self.regions.get(idx.checked_sub(1)?)?;
        (cursor < region.end).then_some(region)
    }

    /// Whether some region's closing fence ends exactly at `end`.
    pub fn has_region_ending_at(&self, end: usize) -> bool {
        self.regions
            .binary_search_by_key(&end, |r| r.end)
            .is_ok()
    }
}
