//! Region extraction.
//!
//! A region is a fenced block whose opening fence carries one of the
//! recognized kind tags:
//!
//! ```text
//! ```css         -> Style
//! ```html        -> Markup
//! ```javascript  -> Script
//! ```
//!
//! The block runs to the next closing fence (non-greedy). Fences with any
//! other tag are plain text and are left to the document renderer.

use std::fmt;

/// Three backticks, used both to open and to close a region.
pub const FENCE: &str = "```";

/// What a region does once it is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Style rules, accumulated into the applied stylesheet.
    Style,
    /// Markup rendered into the preview surface.
    Markup,
    /// Script executed once on commit.
    Script,
}

impl RegionKind {
    const ALL: [RegionKind; 3] = [RegionKind::Style, RegionKind::Markup, RegionKind::Script];

    /// The fence tag that declares this kind.
    pub fn tag(self) -> &'static str {
        match self {
            RegionKind::Style => "css",
            RegionKind::Markup => "html",
            RegionKind::Script => "javascript",
        }
    }

    /// Parses a kind tag at the start of `rest` (the text right after an
    /// opening fence). The tag must not run into further alphanumerics.
    fn parse_tag(rest: &str) -> Option<RegionKind> {
        Self::ALL.into_iter().find(|kind| {
            rest.strip_prefix(kind.tag())
                .is_some_and(|after| after.chars().next().is_none_or(|c| !c.is_alphanumeric()))
        })
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionKind::Style => "style",
            RegionKind::Markup => "markup",
            RegionKind::Script => "script",
        };
        f.write_str(name)
    }
}

/// A typed, executable span of the document.
///
/// `start` is the offset of the opening fence and `end` the offset just past
/// the closing fence, so the reveal cursor compares directly against them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    /// Fence-stripped, trimmed body.
    pub content: String,
    pub start: usize,
    pub end: usize,
}

impl Region {
    /// Body typed so far when the cursor sits at `cursor`.
    ///
    /// Strips the opening fence, the tag (or the part of it typed so far),
    /// a complete closing fence, and any stray backticks left by a partially
    /// typed fence on either side.
    pub fn live_content(&self, text: &str, cursor: usize) -> String {
        let upto = cursor.min(self.end);
        if upto <= self.start {
            return String::new();
        }

        let typed = &text[self.start..upto];
        let mut body = typed.strip_prefix(FENCE).unwrap_or(typed);

        let tag = self.kind.tag();
        if let Some(rest) = body.strip_prefix(tag) {
            body = rest;
        } else if tag.starts_with(body) {
            // Tag is still being typed.
            body = "";
        }

        let body = body.strip_suffix(FENCE).unwrap_or(body);
        body.trim_matches('`').trim().to_string()
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Scanning,
    InFence {
        kind: RegionKind,
        start: usize,
        body_start: usize,
    },
}

/// Scans `text` once, left to right, and returns its regions in order.
///
/// Regions never overlap: each closing fence is consumed before scanning
/// resumes. An opening fence without a close yields no region.
pub fn extract(text: &str) -> Vec<Region> {
    let mut regions = Vec::new();
    let mut state = ScanState::Scanning;
    let mut pos = 0;

    loop {
        match state {
            ScanState::Scanning => {
                let Some(found) = text[pos..].find(FENCE) else {
                    break;
                };
                let fence = pos + found;
                let after = fence + FENCE.len();
                match RegionKind::parse_tag(&text[after..]) {
                    Some(kind) => {
                        let body_start = after + kind.tag().len();
                        state = ScanState::InFence {
                            kind,
                            start: fence,
                            body_start,
                        };
                        pos = body_start;
                    }
                    // Backticks are ASCII, so one byte on is still a boundary.
                    None => pos = fence + 1,
                }
            }
            ScanState::InFence {
                kind,
                start,
                body_start,
            } => {
                let Some(found) = text[body_start..].find(FENCE) else {
                    // Unterminated: nothing after this point can close either.
                    break;
                };
                let close = body_start + found;
                let end = close + FENCE.len();
                regions.push(Region {
                    kind,
                    content: text[body_start..close].trim().to_string(),
                    start,
                    end,
                });
                pos = end;
                state = ScanState::Scanning;
            }
        }
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Hi\n\n```css\nbody{color:red}\n```\nBye";

    #[test]
    fn test_extract_single_style_region() {
        let regions = extract(SAMPLE);
        assert_eq!(regions.len(), 1);

        let region = &regions[0];
        assert_eq!(region.kind, RegionKind::Style);
        assert_eq!(region.content, "body{color:red}");
        assert_eq!(region.start, 4);
        assert_eq!(&SAMPLE[region.start..region.end], "```css\nbody{color:red}\n```");
    }

    #[test]
    fn test_extract_all_kinds_in_order() {
        let text = "```html\n<h1>Hi</h1>\n```\ntext\n```css\nh1{}\n```\n```javascript\nrun();\n```";
        let kinds: Vec<_> = extract(text).iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RegionKind::Markup, RegionKind::Style, RegionKind::Script]
        );
    }

    #[test]
    fn test_extract_regions_sorted_and_disjoint() {
        let text = "a ```css\nx\n``` b ```html\n<i>\n```\n```rust\nfn f(){}\n```\n```javascript\n1\n```";
        let regions = extract(text);
        assert_eq!(regions.len(), 3);
        for pair in regions.windows(2) {
            assert!(pair[0].end <= pair[1].start, "regions overlap: {pair:?}");
        }
        for region in &regions {
            assert!(region.start <= region.end && region.end <= text.len());
        }
    }

    #[test]
    fn test_unrecognized_fence_is_plain_text() {
        let regions = extract("```rust\nfn main() {}\n```\n");
        assert!(regions.is_empty());
    }

    #[test]
    fn test_tag_must_end_at_word_boundary() {
        assert!(extract("```cssx\na\n```").is_empty());
        assert!(extract("```htmlish\na\n```").is_empty());
        assert_eq!(extract("```css```").len(), 1);
    }

    #[test]
    fn test_unterminated_fence_yields_nothing() {
        let regions = extract("intro\n```css\nbody{}\n");
        assert!(regions.is_empty());
    }

    #[test]
    fn test_unterminated_after_complete_region_keeps_first() {
        let regions = extract("```css\na{}\n```\n```html\n<p>");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].content, "a{}");
    }

    #[test]
    fn test_closing_fence_is_non_greedy() {
        let text = "```css\na{}\n```\nmiddle\n```\n";
        let regions = extract(text);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].end, text.find("```\nmiddle").unwrap() + 3);
    }

    #[test]
    fn test_four_backticks_open_at_second() {
        let regions = extract("````css\na{}\n```");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].start, 1);
    }

    #[test]
    fn test_live_content_hides_partial_tag() {
        let region = &extract(SAMPLE)[0];
        let s = region.start;
        for cursor in s..=s + "```css\n".len() {
            assert_eq!(region.live_content(SAMPLE, cursor), "", "cursor {cursor}");
        }
        assert_eq!(region.live_content(SAMPLE, s + 8), "b");
        assert_eq!(region.live_content(SAMPLE, s + 9), "bo");
    }

    #[test]
    fn test_live_content_strips_partial_closing_fence() {
        let region = &extract(SAMPLE)[0];
        for back in 1..=3 {
            let cursor = region.end - back;
            assert_eq!(region.live_content(SAMPLE, cursor), "body{color:red}");
        }
        assert_eq!(region.live_content(SAMPLE, region.end), "body{color:red}");
        assert_eq!(region.live_content(SAMPLE, SAMPLE.len()), "body{color:red}");
    }

    #[test]
    fn test_kind_display_names() {
        assert_eq!(RegionKind::Style.to_string(), "style");
        assert_eq!(RegionKind::Markup.to_string(), "markup");
        assert_eq!(RegionKind::Script.to_string(), "script");
    }
}
