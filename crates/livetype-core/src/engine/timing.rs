//! Per-tick delay selection.
//!
//! The delay before revealing the character at the cursor is picked by an
//! ordered rule list; the first rule that matches wins.

use std::time::Duration;

use crate::config::TypingConfig;
use crate::document::{Document, FENCE};

/// Why the clock waits before the next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Last backtick of a region's closing fence.
    Block,
    /// Second newline of a blank line.
    Paragraph,
    /// Newline ending a heading line.
    Heading,
    /// Any other newline.
    Line,
    /// Ordinary character inside a region.
    Code,
    /// Ordinary character outside every region.
    Prose,
}

impl Pause {
    pub fn duration(self, typing: &TypingConfig) -> Duration {
        let millis = match self {
            Pause::Block => typing.block_pause_ms,
            Pause::Paragraph => typing.paragraph_pause_ms,
            Pause::Heading => typing.heading_pause_ms,
            Pause::Line => typing.line_pause_ms,
            Pause::Code => typing.code_char_ms,
            Pause::Prose => typing.text_char_ms,
        };
        typing.scaled(millis)
    }
}

struct TickContext<'a> {
    document: &'a Document,
    cursor: usize,
    next: char,
}

type DelayRule = fn(&TickContext<'_>) -> Option<Pause>;

/// Highest precedence first.
const RULES: [DelayRule; 4] = [block_pause, paragraph_pause, newline_pause, base_rate];

/// Picks the pause for revealing the character at `cursor`.
///
/// Returns `None` once the whole document is revealed.
pub fn pause_at(document: &Document, cursor: usize) -> Option<Pause> {
    let next = document.char_at(cursor)?;
    let ctx = TickContext {
        document,
        cursor,
        next,
    };
    RULES.iter().find_map(|rule| rule(&ctx))
}

fn block_pause(ctx: &TickContext<'_>) -> Option<Pause> {
    if ctx.next != '`' || ctx.cursor < 2 {
        return None;
    }
    let closes_fence = ctx.document.text().get(ctx.cursor - 2..=ctx.cursor) == Some(FENCE);
    (closes_fence && ctx.document.has_region_ending_at(ctx.cursor + 1)).then_some(Pause::Block)
}

fn paragraph_pause(ctx: &TickContext<'_>) -> Option<Pause> {
    (ctx.next == '\n' && ctx.document.char_before(ctx.cursor) == Some('\n'))
        .then_some(Pause::Paragraph)
}

fn newline_pause(ctx: &TickContext<'_>) -> Option<Pause> {
    if ctx.next != '\n' {
        return None;
    }
    let before = &ctx.document.text()[..ctx.cursor];
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    if before[line_start..].trim().starts_with('#') {
        Some(Pause::Heading)
    } else {
        Some(Pause::Line)
    }
}

fn base_rate(ctx: &TickContext<'_>) -> Option<Pause> {
    if ctx.document.region_at(ctx.cursor).is_some() {
        Some(Pause::Code)
    } else {
        Some(Pause::Prose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pauses(text: &str) -> Vec<Pause> {
        let doc = Document::new(text);
        let mut cursor = 0;
        let mut out = Vec::new();
        while let Some(pause) = pause_at(&doc, cursor) {
            out.push(pause);
            cursor = doc.next_boundary(cursor);
        }
        out
    }

    #[test]
    fn test_second_newline_of_blank_line_is_paragraph_pause() {
        let text = "Hi\n\n```css\nbody{color:red}\n```\nBye";
        let doc = Document::new(text);

        assert_eq!(pause_at(&doc, 2), Some(Pause::Line));
        assert_eq!(pause_at(&doc, 3), Some(Pause::Paragraph));

        let count = pauses(text)
            .into_iter()
            .filter(|p| *p == Pause::Paragraph)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_heading_newline_uses_heading_pause() {
        let doc = Document::new("# Title\nbody\n");
        assert_eq!(pause_at(&doc, 7), Some(Pause::Heading));
        assert_eq!(pause_at(&doc, 12), Some(Pause::Line));
    }

    #[test]
    fn test_indented_heading_still_counts() {
        let doc = Document::new("intro\n  ## Sub\n");
        assert_eq!(pause_at(&doc, 14), Some(Pause::Heading));
    }

    #[test]
    fn test_closing_backtick_uses_block_pause() {
        let text = "Hi\n\n```css\nbody{color:red}\n```\nBye";
        let doc = Document::new(text);
        let end = doc.regions()[0].end;

        assert_eq!(pause_at(&doc, end - 1), Some(Pause::Block));
        assert_eq!(pause_at(&doc, end - 2), Some(Pause::Code));
        assert_eq!(pause_at(&doc, end - 3), Some(Pause::Code));
        // The opening fence never coincides with a region end.
        assert_eq!(pause_at(&doc, doc.regions()[0].start + 2), Some(Pause::Code));
    }

    #[test]
    fn test_unrecognized_fence_close_is_not_block_pause() {
        let doc = Document::new("```rust\nx\n```");
        assert_eq!(pause_at(&doc, 12), Some(Pause::Prose));
    }

    #[test]
    fn test_base_rate_follows_region_membership() {
        let text = "ab```css\nx\n```cd";
        let doc = Document::new(text);
        let region = doc.regions()[0].clone();

        assert_eq!(pause_at(&doc, 0), Some(Pause::Prose));
        assert_eq!(pause_at(&doc, region.start), Some(Pause::Code));
        assert_eq!(pause_at(&doc, region.end), Some(Pause::Prose));
    }

    #[test]
    fn test_newline_inside_region_uses_line_pause() {
        let doc = Document::new("```css\na{}\nb{}\n```");
        assert_eq!(pause_at(&doc, 6), Some(Pause::Line));
        assert_eq!(pause_at(&doc, 10), Some(Pause::Line));
    }

    #[test]
    fn test_end_of_document_has_no_pause() {
        let doc = Document::new("ab");
        assert_eq!(pause_at(&doc, 2), None);
        assert_eq!(pause_at(&Document::new(""), 0), None);
    }

    #[test]
    fn test_one_pause_per_character() {
        let text = "# T\n\nsome `code` here\n```html\n<p>é</p>\n```\n";
        assert_eq!(pauses(text).len(), text.chars().count());
    }

    #[test]
    fn test_pause_durations_follow_config() {
        let typing = TypingConfig::default();
        assert_eq!(Pause::Block.duration(&typing), Duration::from_millis(1000));
        assert_eq!(Pause::Paragraph.duration(&typing), Duration::from_millis(500));
        assert_eq!(Pause::Heading.duration(&typing), Duration::from_millis(800));
        assert_eq!(Pause::Line.duration(&typing), Duration::from_millis(100));
        assert_eq!(Pause::Code.duration(&typing), Duration::from_millis(10));
        assert_eq!(Pause::Prose.duration(&typing), Duration::from_millis(25));
    }
}
