//! Shell completions generation command

use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory};
use clap_complete::{generate, generate_to, Shell};
use tracing::info;

use crate::cli::output;
use crate::cli::Cli;

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for (defaults to $SHELL)
    #[arg(value_enum)]
    pub shell: Option<Shell>,

    /// Write to this file, or into this directory as `liftoff.<ext>`
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let shell = self
            .shell
            .or_else(Shell::from_env)
            .ok_or_else(|| anyhow::anyhow!("Cannot detect the shell from $SHELL; pass one explicitly"))?;
        info!(%shell, "executing completions command");

        let Some(target) = &self.output else {
            generate(shell, &mut Cli::command(), bin_name(), &mut std::io::stdout());
            return Ok(());
        };

        let written = write_completions(shell, target)?;
        if !cli.quiet {
            output::success(&format!("Completions written to {}", written.display()));
        }
        Ok(())
    }
}

fn bin_name() -> String {
    Cli::command().get_name().to_string()
}

/// Write the script to `target`; a directory gets the shell's conventional file name
fn write_completions(shell: Shell, target: &Path) -> std::io::Result<PathBuf> {
    let mut cmd = Cli::command();
    if target.is_dir() {
        return generate_to(shell, &mut cmd, bin_name(), target);
    }

    let mut file = std::fs::File::create(target)?;
    generate(shell, &mut cmd, bin_name(), &mut file);
    Ok(target.to_path_buf())
}
