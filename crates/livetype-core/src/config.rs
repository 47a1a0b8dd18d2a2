//! Configuration management for livetype.
//!
//! Loads configuration from ${LIVETYPE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for livetype configuration.
    //!
    //! LIVETYPE_HOME resolution order:
    //! 1. LIVETYPE_HOME environment variable (if set)
    //! 2. ~/.config/livetype (default)
    //! 3. ./.livetype when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the livetype home directory.
    pub fn livetype_home() -> PathBuf {
        if let Ok(home) = std::env::var("LIVETYPE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".livetype"),
            |h| h.join(".config").join("livetype"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        livetype_home().join("config.toml")
    }
}

/// Per-character delays and pauses of the reveal clock, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    /// Delay per character of narrative text.
    pub text_char_ms: u64,
    /// Delay per character inside a region (code types faster).
    pub code_char_ms: u64,
    /// Pause on the newline that ends a heading line.
    pub heading_pause_ms: u64,
    /// Pause on the second newline of a blank line.
    pub paragraph_pause_ms: u64,
    /// Pause on the last backtick of a region's closing fence.
    pub block_pause_ms: u64,
    /// Pause on any other newline.
    pub line_pause_ms: u64,
    /// Playback speed multiplier; every delay is divided by it.
    pub speed: f64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            text_char_ms: 25,
            code_char_ms: 10,
            heading_pause_ms: 800,
            paragraph_pause_ms: 500,
            block_pause_ms: 1000,
            line_pause_ms: 100,
            speed: 1.0,
        }
    }
}

impl TypingConfig {
    /// Scales a millisecond delay by the playback speed.
    ///
    /// A non-positive or non-finite speed is treated as 1.0; [`Config::validate`]
    /// rejects such values at load time. A speed so small that the delay no
    /// longer fits a `Duration` saturates to `Duration::MAX`.
    pub fn scaled(&self, millis: u64) -> Duration {
        let base = Duration::from_millis(millis);
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return base;
        }
        Duration::try_from_secs_f64(base.as_secs_f64() / self.speed).unwrap_or(Duration::MAX)
    }
}

/// Command used to run script regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Program and leading arguments; the region body is appended last.
    pub command: Vec<String>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            command: vec!["node".to_string(), "-e".to_string()],
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
    /// Log file path. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Document played when none is given on the command line
    pub document: PathBuf,

    /// Message shown once the whole document has been typed
    pub final_message: String,

    /// Reveal clock timing
    pub typing: TypingConfig,

    /// Script region execution
    pub script: ScriptConfig,

    /// Logging
    pub log: LogConfig,
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    const DEFAULT_DOCUMENT: &str = "portfolio.md";
    const DEFAULT_FINAL_MESSAGE: &str =
        "The build is complete. Welcome to the future of digital portfolios.";

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };

        config
            .validate()
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        Ok(config)
    }

    /// Checks values serde cannot constrain.
    pub fn validate(&self) -> Result<()> {
        let speed = self.typing.speed;
        if !speed.is_finite() || speed <= 0.0 {
            anyhow::bail!("typing.speed must be a positive number, got {speed}");
        }
        if self.script.command.is_empty() {
            anyhow::bail!("script.command must name a program");
        }
        Ok(())
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: PathBuf::from(Self::DEFAULT_DOCUMENT),
            final_message: Self::DEFAULT_FINAL_MESSAGE.to_string(),
            typing: TypingConfig::default(),
            script: ScriptConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.typing.code_char_ms, 10);
        assert_eq!(config.typing.text_char_ms, 25);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "[typing]\nblock_pause_ms = 50\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.typing.block_pause_ms, 50);
        assert_eq!(config.typing.heading_pause_ms, 800);
        assert_eq!(config.script, ScriptConfig::default());
    }

    #[test]
    fn test_load_rejects_non_positive_speed() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "[typing]\nspeed = 0.0\n").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("typing.speed"));
    }

    #[test]
    fn test_load_rejects_empty_script_command() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "[script]\ncommand = []\n").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_load_malformed_toml_reports_path() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "typing = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "# existing").unwrap();

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_scaled_divides_by_speed() {
        let typing = TypingConfig {
            speed: 2.0,
            ..TypingConfig::default()
        };
        assert_eq!(typing.scaled(100), Duration::from_millis(50));

        let broken = TypingConfig {
            speed: 0.0,
            ..TypingConfig::default()
        };
        assert_eq!(broken.scaled(100), Duration::from_millis(100));
    }

    #[test]
    fn test_scaled_saturates_on_tiny_speed() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[typing]\nspeed = 1e-300\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.typing.scaled(25), Duration::MAX);
        assert_eq!(config.typing.scaled(0), Duration::ZERO);

        let fast = TypingConfig {
            speed: 1e300,
            ..TypingConfig::default()
        };
        assert_eq!(fast.scaled(25), Duration::ZERO);
    }
}
