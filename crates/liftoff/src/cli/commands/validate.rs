//! Validate command

use std::path::Path;

use clap::Args;
use console::style;
use tracing::info;

use liftoff_core::{lint, GitError, PluginCatalog, ReleaseConfig};
use liftoff_git::{GitRepo, DEFAULT_REMOTE};

use crate::cli::{Cli, OutputFormat};
use crate::exit_codes;

/// Validate the release configuration and repository state
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Only validate the configuration file
    #[arg(long)]
    pub config_only: bool,

    /// Strict mode - treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Findings of a validation run
#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            config_only = self.config_only,
            strict = self.strict,
            "executing validate command"
        );
        let cwd = std::env::current_dir()?;
        let mut report = Report::default();

        let (config, config_path) = match cli.load_release_config(&cwd) {
            Ok((c, p)) => (Some(c), Some(p)),
            Err(e) => {
                report.errors.push(format!("Configuration: {}", e));
                (None, None)
            }
        };
        let config_failed = config.is_none();

        if let Some(ref cfg) = config {
            for warning in lint(cfg, &PluginCatalog::builtin()) {
                report.warnings.push(warning.to_string());
            }

            if !self.config_only {
                check_repository(cfg, &cwd, &mut report);
            }
        }

        // If strict, promote warnings to errors
        if self.strict {
            let mut warnings = std::mem::take(&mut report.warnings);
            report.errors.append(&mut warnings);
        }

        let passed = report.errors.is_empty();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "valid": passed,
                    "config_path": config_path.as_ref().map(|p| p.to_string_lossy().to_string()),
                    "errors": report.errors,
                    "warnings": report.warnings
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    print_report(&report, config_path.as_deref(), passed);
                }
            }
        }

        if !passed {
            std::process::exit(if config_failed {
                exit_codes::CONFIG_ERROR
            } else {
                exit_codes::VALIDATION_ERROR
            });
        }

        Ok(())
    }
}

/// Compare the declaration with the checked-out repository
fn check_repository(config: &ReleaseConfig, cwd: &Path, report: &mut Report) {
    let repo = match GitRepo::discover(cwd) {
        Ok(repo) => repo,
        Err(e) => {
            report.errors.push(format!("Git repository: {}", e));
            return;
        }
    };

    match repo.current_branch() {
        Ok(Some(branch)) => {
            if config.channel_for(&branch).is_none() {
                report.warnings.push(format!(
                    "Branch '{}' is not a release branch ({})",
                    branch,
                    config.branches().join(", ")
                ));
            }
        }
        Ok(None) => {
            report.warnings.push("HEAD is detached".to_string());
        }
        Err(e) => {
            report.errors.push(format!("Branch check: {}", e));
        }
    }

    match repo.is_clean() {
        Ok(false) => {
            report
                .warnings
                .push("Working directory has uncommitted changes".to_string());
        }
        Err(e) => {
            report.errors.push(format!("Git status check: {}", e));
        }
        _ => {}
    }

    match repo.remote_address(DEFAULT_REMOTE) {
        Ok(Some(origin)) => {
            if !origin.same_repository(config.remote()) {
                report.warnings.push(format!(
                    "repositoryUrl '{}' does not match remote '{}' ({})",
                    config.repository_url(),
                    DEFAULT_REMOTE,
                    origin
                ));
            }
        }
        Ok(None) => {
            report.warnings.push(format!(
                "Remote '{}' has no URL a release can push to",
                DEFAULT_REMOTE
            ));
        }
        Err(GitError::RemoteNotFound(name)) => {
            report.warnings.push(format!("Remote '{}' not found", name));
        }
        Err(e) => {
            report.errors.push(format!("Remote check: {}", e));
        }
    }
}

fn print_report(report: &Report, config_path: Option<&Path>, passed: bool) {
    println!("{}", style("Validation Results").bold());
    println!();

    if let Some(path) = config_path {
        println!("Config: {}", style(path.display()).cyan());
        println!();
    }

    if !report.errors.is_empty() {
        println!("{}", style("Errors:").red().bold());
        for error in &report.errors {
            println!("  {} {}", style("✗").red(), error);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("{}", style("Warnings:").yellow().bold());
        for warning in &report.warnings {
            println!("  {} {}", style("!").yellow(), warning);
        }
        println!();
    }

    if passed {
        if report.warnings.is_empty() {
            println!("{}", style("✓ All checks passed").green().bold());
        } else {
            println!(
                "{} with {} warning(s)",
                style("✓ Validation passed").green().bold(),
                report.warnings.len()
            );
        }
    } else {
        println!(
            "{} with {} error(s)",
            style("✗ Validation failed").red().bold(),
            report.errors.len()
        );
    }
}
