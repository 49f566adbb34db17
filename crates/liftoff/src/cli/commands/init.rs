//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use dialoguer::Confirm;
use tracing::{info, warn};

use liftoff_core::config::defaults::{
    default_config_value, DEFAULT_BRANCH, DEFAULT_CONFIG_JSON, DEFAULT_CONFIG_YAML,
};
use liftoff_core::{find_config, ReleaseConfig};
use liftoff_git::{GitRepo, DEFAULT_REMOTE};

use crate::cli::output;
use crate::cli::Cli;

/// Scaffold a release configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Use defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Upstream repository URL (defaults to the origin remote)
    #[arg(long)]
    pub repository_url: Option<String>,

    /// Release branch
    #[arg(long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// Write YAML instead of JSON
    #[arg(long)]
    pub yaml: bool,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, yes = self.yes, "executing init command");
        let cwd = std::env::current_dir()?;
        let default_name = if self.yaml {
            DEFAULT_CONFIG_YAML
        } else {
            DEFAULT_CONFIG_JSON
        };
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| cwd.join(default_name));

        // Check if config already exists
        if config_path.exists() && !self.force {
            if self.yes {
                anyhow::bail!(
                    "Configuration file already exists at {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            let overwrite = Confirm::new()
                .with_prompt(format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ))
                .default(false)
                .interact()?;

            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        if let Some(existing) = find_config(&cwd).filter(|p| p != &config_path) {
            warn!(path = %existing.display(), "another release configuration exists");
            if !cli.quiet {
                output::warning(&format!(
                    "Found existing configuration at {}; the release engine reads only one file",
                    existing.display()
                ));
            }
        }

        let repository_url = match &self.repository_url {
            Some(url) => url.clone(),
            None => detect_repository_url(&cwd).ok_or_else(|| {
                anyhow::anyhow!(
                    "No '{}' remote found. Pass --repository-url to set the upstream repository.",
                    DEFAULT_REMOTE
                )
            })?,
        };

        let content = render(&self.branch, &repository_url, self.yaml)?;
        std::fs::write(&config_path, &content)?;
        info!(path = %config_path.display(), "wrote release configuration");

        if !cli.quiet {
            output::success(&format!(
                "Created configuration at {}",
                style(config_path.display()).cyan()
            ));
            println!();
            println!("Next steps:");
            println!("  1. Edit {} to adjust the plugin pipeline", config_path.display());
            println!("  2. Run {} to verify your setup", style("liftoff validate").cyan());
            println!("  3. Run {} to review the release steps", style("liftoff plan").cyan());
        }

        Ok(())
    }
}

/// Build and validate the default declaration, then serialize it
fn render(branch: &str, repository_url: &str, yaml: bool) -> anyhow::Result<String> {
    let config = ReleaseConfig::from_value(&default_config_value(branch, repository_url))?;
    let content = if yaml {
        serde_yaml::to_string(&config)?
    } else {
        let mut json = serde_json::to_string_pretty(&config)?;
        json.push('\n');
        json
    };
    Ok(content)
}

fn detect_repository_url(cwd: &Path) -> Option<String> {
    let repo = GitRepo::discover(cwd).ok()?;
    repo.remote_url(DEFAULT_REMOTE).ok().flatten()
}
