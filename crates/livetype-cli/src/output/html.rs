//! File-backed style and preview surfaces.
//!
//! Every change rewrites the whole file. Both files live in the same output
//! directory so that `preview.html` can link `style.css` relatively.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use livetype_core::engine::{NodeId, PreviewSurface, ScrollTarget, StyleSurface};
use tracing::warn;

pub const STYLE_FILE: &str = "style.css";
pub const PREVIEW_FILE: &str = "preview.html";

/// Writes `path` via a temp file + rename.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, content).with_context(|| format!("write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("rename {} to {}", tmp_path.display(), path.display()))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))
}

/// Stylesheet slot backed by `<dir>/style.css`.
#[derive(Debug)]
pub struct CssFile {
    path: PathBuf,
}

impl CssFile {
    /// Creates the directory and an empty stylesheet.
    pub fn create(dir: &Path) -> Result<Self> {
        ensure_dir(dir)?;
        let mut file = Self {
            path: dir.join(STYLE_FILE),
        };
        file.apply("")?;
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StyleSurface for CssFile {
    fn apply(&mut self, stylesheet: &str) -> Result<()> {
        write_atomic(&self.path, stylesheet)
    }
}

/// Preview area backed by `<dir>/preview.html`.
#[derive(Debug)]
pub struct HtmlPreview {
    path: PathBuf,
    committed: Vec<String>,
    live: String,
    scroll: Option<ScrollTarget>,
}

impl HtmlPreview {
    /// Creates the directory and an empty preview page.
    pub fn create(dir: &Path) -> Result<Self> {
        ensure_dir(dir)?;
        let preview = Self {
            path: dir.join(PREVIEW_FILE),
            committed: Vec::new(),
            live: String::new(),
            scroll: None,
        };
        preview.flush()?;
        Ok(preview)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        write_atomic(&self.path, &self.render())
    }

    pub fn render(&self) -> String {
        let scroll = match self.scroll {
            Some(ScrollTarget::Committed(NodeId(n))) => {
                format!(" data-scroll-target=\"block-{n}\"")
            }
            Some(ScrollTarget::LiveEnd) => " data-scroll-target=\"live-end\"".to_string(),
            None => String::new(),
        };

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        writeln!(html, "<link rel=\"stylesheet\" href=\"{STYLE_FILE}\">").expect("write");
        html.push_str("</head>\n");
        writeln!(html, "<body{scroll}>").expect("write");
        html.push_str("<div class=\"preview-content-wrapper\">\n");
        html.push_str("<div id=\"preview-container\">\n");
        for (n, block) in self.committed.iter().enumerate() {
            writeln!(
                html,
                "<div class=\"committed-block\" id=\"block-{n}\">{block}</div>"
            )
            .expect("write");
        }
        html.push_str("</div>\n");
        writeln!(html, "<div id=\"live-construction-zone\">{}</div>", self.live).expect("write");
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

impl PreviewSurface for HtmlPreview {
    fn set_live(&mut self, markup: &str) -> Result<()> {
        markup.clone_into(&mut self.live);
        self.flush()
    }

    fn clear_live(&mut self) -> Result<()> {
        self.live.clear();
        self.flush()
    }

    fn commit(&mut self, markup: &str) -> Result<NodeId> {
        self.committed.push(markup.to_string());
        self.flush()?;
        Ok(NodeId(self.committed.len() - 1))
    }

    fn scroll_into_view(&mut self, target: ScrollTarget) {
        if self.scroll == Some(target) {
            return;
        }
        self.scroll = Some(target);
        if let Err(e) = self.flush() {
            warn!("recording scroll target failed: {e:#}");
        }
    }

    fn clear(&mut self) -> Result<()> {
        self.committed.clear();
        self.live.clear();
        self.scroll = None;
        self.flush()
    }
}
