//! Echoes the typed text to a terminal.

use std::io::{self, Write};

use livetype_core::engine::PlaybackStatus;

/// Prints newly revealed text as the cursor moves.
///
/// Statuses arrive through a channel that keeps only the latest value, so a
/// restart is detected from `PlaybackStatus::restarts` rather than from the
/// cursor moving backwards: a restart followed at once by a skip shows up as
/// a single complete status with a higher restart count.
#[derive(Debug)]
pub struct TypedEcho<W: Write> {
    out: W,
    printed: usize,
    restarts: u64,
    finished: bool,
}

impl<W: Write> TypedEcho<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: 0,
            restarts: 0,
            finished: false,
        }
    }

    /// Writes whatever `status` has revealed beyond what is already printed.
    /// `text` is the full document; `status.cursor` is always a char boundary.
    pub fn update(
        &mut self,
        text: &str,
        status: &PlaybackStatus,
        final_message: &str,
    ) -> io::Result<()> {
        if status.restarts != self.restarts {
            writeln!(self.out, "\n--- restart ---")?;
            self.restarts = status.restarts;
            self.printed = 0;
            self.finished = false;
        }

        if status.cursor > self.printed {
            self.out.write_all(text[self.printed..status.cursor].as_bytes())?;
            self.printed = status.cursor;
        }

        if status.complete && !self.finished {
            self.finished = true;
            if !text.ends_with('\n') && !text.is_empty() {
                writeln!(self.out)?;
            }
            writeln!(self.out, "{final_message}")?;
        }
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FINAL: &str = "Done.";

    fn status(cursor: usize, total: usize) -> PlaybackStatus {
        status_after(0, cursor, total)
    }

    fn status_after(restarts: u64, cursor: usize, total: usize) -> PlaybackStatus {
        PlaybackStatus {
            cursor,
            total,
            typing: cursor < total,
            complete: cursor >= total,
            restarts,
        }
    }

    fn output(echo: TypedEcho<Vec<u8>>) -> String {
        String::from_utf8(echo.into_inner()).unwrap()
    }

    #[test]
    fn test_prints_only_new_text() {
        let text = "héllo";
        let mut echo = TypedEcho::new(Vec::new());
        echo.update(text, &status(1, text.len()), FINAL).unwrap();
        echo.update(text, &status(3, text.len()), FINAL).unwrap();
        echo.update(text, &status(3, text.len()), FINAL).unwrap();
        assert_eq!(output(echo), "hé");
    }

    #[test]
    fn test_final_message_printed_once() {
        let text = "hi\n";
        let mut echo = TypedEcho::new(Vec::new());
        echo.update(text, &status(3, 3), FINAL).unwrap();
        echo.update(text, &status(3, 3), FINAL).unwrap();
        assert_eq!(output(echo), "hi\nDone.\n");
    }

    #[test]
    fn test_final_message_starts_on_new_line() {
        let text = "hi";
        let mut echo = TypedEcho::new(Vec::new());
        echo.update(text, &status(2, 2), FINAL).unwrap();
        assert_eq!(output(echo), "hi\nDone.\n");
    }

    #[test]
    fn test_restart_prints_separator_and_replays() {
        let text = "abc";
        let mut echo = TypedEcho::new(Vec::new());
        echo.update(text, &status(3, 3), FINAL).unwrap();
        echo.update(text, &status_after(1, 0, 3), FINAL).unwrap();
        echo.update(text, &status_after(1, 1, 3), FINAL).unwrap();
        assert_eq!(output(echo), "abc\nDone.\n\n--- restart ---\na");
    }

    #[test]
    fn test_restart_then_skip_seen_as_one_status_replays() {
        let text = "abc";
        let mut echo = TypedEcho::new(Vec::new());
        echo.update(text, &status(3, 3), FINAL).unwrap();
        // The zero-cursor status in between was never observed.
        echo.update(text, &status_after(1, 3, 3), FINAL).unwrap();
        assert_eq!(
            output(echo),
            "abc\nDone.\n\n--- restart ---\nabc\nDone.\n"
        );
    }
}
