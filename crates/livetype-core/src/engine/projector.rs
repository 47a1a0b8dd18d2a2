//! Maps the reveal cursor onto the surfaces.
//!
//! Region state is a pure function of the cursor:
//!
//! | cursor                   | state       |
//! |--------------------------|-------------|
//! | `c <= start`             | untouched   |
//! | `start < c < end`        | in progress |
//! | `c >= end`               | complete    |
//!
//! The committed set is the only memory kept between passes. It exists so
//! that commits (and script runs) happen at most once per region.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, error};

use super::surfaces::{ScrollTarget, Surfaces};
use crate::document::{Document, Region, RegionKind};

/// Style text per region index; the effective stylesheet is their
/// concatenation in region order.
#[derive(Debug, Default)]
pub struct StyleAccumulator {
    slots: BTreeMap<usize, String>,
    applied: String,
}

impl StyleAccumulator {
    pub fn set(&mut self, index: usize, content: &str) {
        if self.slots.get(&index).map(String::as_str) != Some(content) {
            self.slots.insert(index, content.to_string());
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(&index).map(String::as_str)
    }

    /// Non-empty slots joined by newlines, in region order.
    pub fn stylesheet(&self) -> String {
        self.slots
            .values()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns the stylesheet if it differs from the last one taken.
    fn take_changed(&mut self) -> Option<String> {
        let sheet = self.stylesheet();
        if sheet == self.applied {
            return None;
        }
        self.applied.clone_from(&sheet);
        Some(sheet)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.applied.clear();
    }
}

#[derive(Debug, Default)]
pub struct Projector {
    committed: BTreeSet<usize>,
    /// Region indices in the order they were committed.
    history: Vec<usize>,
    styles: StyleAccumulator,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings every region in line with `cursor`, in region order.
    ///
    /// Safe to call any number of times at the same cursor: already
    /// committed regions are skipped and live updates overwrite.
    pub fn project(&mut self, document: &Document, cursor: usize, surfaces: &mut Surfaces) {
        for (index, region) in document.regions().iter().enumerate() {
            if cursor >= region.end {
                if self.committed.insert(index) {
                    self.history.push(index);
                    self.commit(index, region, surfaces);
                }
            } else if cursor > region.start {
                let partial = region.live_content(document.text(), cursor);
                self.update_live(index, region.kind, &partial, surfaces);
            }
        }
    }

    fn update_live(
        &mut self,
        index: usize,
        kind: RegionKind,
        partial: &str,
        surfaces: &mut Surfaces,
    ) {
        match kind {
            RegionKind::Style => {
                self.styles.set(index, partial);
                self.apply_styles(surfaces);
            }
            RegionKind::Markup => {
                if let Err(e) = surfaces.preview.set_live(partial) {
                    error!(region = index, "live markup update failed: {e:#}");
                    return;
                }
                if !partial.is_empty() {
                    surfaces.preview.scroll_into_view(ScrollTarget::LiveEnd);
                }
            }
            RegionKind::Script => {}
        }
    }

    fn commit(&mut self, index: usize, region: &Region, surfaces: &mut Surfaces) {
        debug!(region = index, kind = %region.kind, "committing region");
        match region.kind {
            RegionKind::Style => {
                self.styles.set(index, &region.content);
                self.apply_styles(surfaces);
            }
            RegionKind::Markup => {
                match surfaces.preview.commit(&region.content) {
                    Ok(node) => surfaces
                        .preview
                        .scroll_into_view(ScrollTarget::Committed(node)),
                    Err(e) => error!(region = index, "markup commit failed: {e:#}"),
                }
                if let Err(e) = surfaces.preview.clear_live() {
                    error!(region = index, "clearing live markup failed: {e:#}");
                }
            }
            RegionKind::Script => {
                if let Err(e) = surfaces.executor.execute(&region.content) {
                    error!(region = index, "script execution failed: {e:#}");
                }
            }
        }
    }

    fn apply_styles(&mut self, surfaces: &mut Surfaces) {
        if let Some(sheet) = self.styles.take_changed()
            && let Err(e) = surfaces.style.apply(&sheet)
        {
            error!("applying stylesheet failed: {e:#}");
        }
    }

    /// Forgets all commits and style slots.
    pub fn reset(&mut self) {
        self.committed.clear();
        self.history.clear();
        self.styles.clear();
    }

    pub fn is_committed(&self, index: usize) -> bool {
        self.committed.contains(&index)
    }

    /// Region indices in commit order.
    pub fn committed(&self) -> &[usize] {
        &self.history
    }

    pub fn styles(&self) -> &StyleAccumulator {
        &self.styles
    }
}
