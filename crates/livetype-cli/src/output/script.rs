//! Runs script regions through an external interpreter.

use std::fmt;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use livetype_core::engine::EffectExecutor;
use tracing::{debug, info, warn};

/// A script ran but exited unsuccessfully.
#[derive(Debug)]
pub struct ScriptError {
    pub status: ExitStatus,
    pub stderr: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script exited with {}", self.status)?;
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, ": {stderr}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ScriptError {}

/// Runs `program args... <source>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    program: String,
    args: Vec<String>,
}

impl CommandExecutor {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .context("script command is empty")?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl EffectExecutor for CommandExecutor {
    fn execute(&mut self, source: &str) -> Result<()> {
        debug!(program = %self.program, bytes = source.len(), "running script");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(source)
            .output()
            .with_context(|| format!("spawn {}", self.program))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            info!(target: "livetype::script", "{line}");
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(ScriptError {
                status: output.status,
                stderr: stderr.into_owned(),
            }
            .into());
        }
        for line in stderr.lines() {
            warn!(target: "livetype::script", "{line}");
        }
        Ok(())
    }
}
