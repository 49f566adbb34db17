//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use liftoff_core::{load_config, load_config_from_dir, ReleaseConfig};

use commands::{CompletionsCommand, InitCommand, PlanCommand, ShowCommand, ValidateCommand};

/// Liftoff - Release pipeline configuration CLI
#[derive(Debug, Parser)]
#[command(name = "liftoff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Release configuration file (searched for when omitted)
    #[arg(long, global = true, env = "LIFTOFF_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scaffold a release configuration
    Init(InitCommand),

    /// Validate the release configuration and repository state
    Validate(ValidateCommand),

    /// Print the loaded release configuration
    Show(ShowCommand),

    /// Show which plugin runs at each release step
    Plan(PlanCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("cannot change to {}", dir.display()))?;
        }

        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Show(ref cmd) => cmd.execute(&self),
            Commands::Plan(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }

    /// Load the configuration named by `--config`, or search from `cwd`
    pub fn load_release_config(&self, cwd: &Path) -> liftoff_core::Result<(ReleaseConfig, PathBuf)> {
        match &self.config {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    cwd.join(path)
                };
                let config = load_config(&path)?;
                Ok((config, path))
            }
            None => load_config_from_dir(cwd),
        }
    }
}
