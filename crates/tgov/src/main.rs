//! tgov - Entry Point
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tgov run [--config PATH]` | Run the cache engine and governor until Ctrl-C |
//! | `tgov config [--config PATH]` | Print the effective configuration as TOML |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command line interface for tgov
#[derive(Parser, Debug)]
#[command(name = "tgov")]
#[command(about = "Tenant-aware cache engine and resource governor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the governance core until interrupted
    Run {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run { config } => tgov::app::run(config.as_deref()).await?,
        Command::Config { config } => print!("{}", tgov::app::render_config(config.as_deref())?),
    }
    Ok(())
}
