//! Region listing.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use livetype_core::document::{Document, Region};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RegionRow<'a> {
    index: usize,
    kind: String,
    tag: &'static str,
    start: usize,
    end: usize,
    content: &'a str,
}

impl<'a> RegionRow<'a> {
    fn new(index: usize, region: &'a Region) -> Self {
        Self {
            index,
            kind: region.kind.to_string(),
            tag: region.kind.tag(),
            start: region.start,
            end: region.end,
            content: &region.content,
        }
    }
}

pub fn list(file: &Path, json: bool) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("read document {}", file.display()))?;
    let document = Document::new(text);
    let rows: Vec<_> = document
        .regions()
        .iter()
        .enumerate()
        .map(|(index, region)| RegionRow::new(index, region))
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&rows).context("serialize regions")?;
        println!("{out}");
        return Ok(());
    }

    if rows.is_empty() {
        println!("No regions found.");
        return Ok(());
    }
    for row in rows {
        println!(
            "{:>3}  {:<6}  {:>6}..{:<6}  {} bytes",
            row.index,
            row.kind,
            row.start,
            row.end,
            row.content.len()
        );
    }
    Ok(())
}
