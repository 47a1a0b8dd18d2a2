//! `livetype play`: types a document in real time.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::{fs, thread};

use anyhow::{Context, Result};
use livetype_core::config::Config;
use livetype_core::document::Document;
use livetype_core::engine::{Session, Surfaces};
use livetype_core::runtime::{Player, PlayerHandle, PlayerOptions};
use tracing::{debug, info, warn};

use crate::output::{CommandExecutor, CssFile, HtmlPreview, TypedEcho};

pub struct PlayOptions<'a> {
    pub config: &'a Config,
    pub file: Option<PathBuf>,
    pub out: PathBuf,
    pub skip: bool,
    pub speed: Option<f64>,
}

/// A line typed on stdin while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Restart,
    Skip,
    Quit,
}

fn parse_control(line: &str) -> Option<Control> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "restart" => Some(Control::Restart),
        "s" | "skip" => Some(Control::Skip),
        "q" | "quit" => Some(Control::Quit),
        _ => None,
    }
}

/// Forwards stdin controls to the player.
///
/// Runs on a plain thread: a blocking stdin read must not hold up runtime
/// shutdown once playback ends.
fn spawn_controls(handle: PlayerHandle) {
    let spawned = thread::Builder::new()
        .name("livetype-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                match parse_control(&line) {
                    Some(Control::Restart) => handle.restart(),
                    Some(Control::Skip) => handle.skip(),
                    Some(Control::Quit) => {
                        handle.quit();
                        break;
                    }
                    None => debug!(input = %line, "ignoring unknown control"),
                }
            }
        });
    if let Err(e) = spawned {
        warn!("stdin controls unavailable: {e}");
    }
}

pub async fn run(opts: PlayOptions<'_>) -> Result<()> {
    let mut config = opts.config.clone();
    if let Some(speed) = opts.speed {
        config.typing.speed = speed;
        config.validate().context("invalid --speed")?;
    }

    let path = opts.file.unwrap_or_else(|| config.document.clone());
    let text = fs::read_to_string(&path)
        .with_context(|| format!("read document {}", path.display()))?;
    let document = Document::new(text);
    info!(
        path = %path.display(),
        regions = document.regions().len(),
        "loaded document"
    );

    let css = CssFile::create(&opts.out)?;
    let preview = HtmlPreview::create(&opts.out)?;
    let preview_path = preview.path().to_path_buf();
    debug!(style = %css.path().display(), preview = %preview_path.display(), "surfaces ready");
    let surfaces = Surfaces::new(css, preview, CommandExecutor::new(&config.script.command)?);
    let session = Session::new(document.clone(), surfaces, config.typing.clone());
    let player = Player::new(
        session,
        PlayerOptions {
            exit_on_complete: true,
        },
    );
    let handle = player.handle();
    let mut status = player.subscribe();

    if opts.skip {
        handle.skip();
    }
    spawn_controls(handle.clone());
    let task = tokio::spawn(player.run());

    let mut echo = TypedEcho::new(io::stdout());
    loop {
        let current = *status.borrow_and_update();
        echo.update(document.text(), &current, &config.final_message)
            .context("write to stdout")?;

        tokio::select! {
            changed = status.changed() => {
                // The player dropped its sender: playback is over.
                if changed.is_err() {
                    break;
                }
            }
            Ok(()) = tokio::signal::ctrl_c() => handle.quit(),
        }
    }

    let session = task.await.context("player task failed")?;
    info!(
        cursor = session.cursor(),
        committed = session.committed().len(),
        "playback finished"
    );
    eprintln!("Preview written to {}", preview_path.display());
    Ok(())
}
