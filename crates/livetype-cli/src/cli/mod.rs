//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use livetype_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "livetype")]
#[command(version = "0.1")]
#[command(about = "Types a document and renders its css/html/javascript blocks as they are written")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Type a document, updating the live preview as blocks are written
    Play {
        /// Markdown document to play (default: `document` from config)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Directory receiving style.css and preview.html
        #[arg(long, value_name = "DIR", default_value = "livetype-out")]
        out: PathBuf,

        /// Jump straight to the end
        #[arg(long)]
        skip: bool,

        /// Override the playback speed multiplier from config
        #[arg(long, value_name = "X")]
        speed: Option<f64>,
    },

    /// List the css/html/javascript blocks of a document
    Regions {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = config::Config::load().context("load config")?;
    let _log_guard = logging::init(&config.log).context("init logging")?;

    match cli.command {
        Commands::Play {
            file,
            out,
            skip,
            speed,
        } => {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(commands::play::run(commands::play::PlayOptions {
                config: &config,
                file,
                out,
                skip,
                speed,
            }))
        }
        Commands::Regions { file, json } => commands::regions::list(&file, json),
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
