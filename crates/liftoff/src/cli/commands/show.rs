//! Show command

use clap::Args;
use tracing::info;

use liftoff_core::{PluginSpec, ReleaseConfig};

use crate::cli::output::{self, branch_style, header, key_value, path_style, plugin_style};
use crate::cli::{Cli, OutputFormat};

/// Print the loaded release configuration
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Print the declaration as YAML instead of a summary
    #[arg(long, conflicts_with = "raw")]
    pub yaml: bool,

    /// Print the declaration as JSON (same as `--format json`)
    #[arg(long)]
    pub raw: bool,
}

impl ShowCommand {
    /// Execute the show command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(yaml = self.yaml, raw = self.raw, "executing show command");
        let cwd = std::env::current_dir()?;
        let (config, path) = cli.load_release_config(&cwd)?;

        if self.yaml {
            print!("{}", serde_yaml::to_string(&config)?);
            return Ok(());
        }
        if self.raw || cli.format == OutputFormat::Json {
            return output::json(&config);
        }

        println!("{}", header("Release configuration"));
        println!(
            "{}",
            key_value("Config", &path_style().apply_to(path.display()).to_string())
        );
        print_summary(&config, cli.verbose);
        Ok(())
    }
}

fn print_summary(config: &ReleaseConfig, verbose: bool) {
    let remote = config.remote();
    println!(
        "{}",
        key_value(
            "Repository",
            &format!("{} ({})", config.repository_url(), remote.transport().as_str())
        )
    );
    println!("{}", key_value("Tag format", config.tag_format()));
    if let Some(dry_run) = config.dry_run() {
        println!("{}", key_value("Dry run", &dry_run.to_string()));
    }
    if let Some(ci) = config.ci() {
        println!("{}", key_value("CI", &ci.to_string()));
    }
    println!();

    println!("{}", header("Branches"));
    for (i, branch) in config.branches().iter().enumerate() {
        println!("  {}. {}", i + 1, branch_style().apply_to(branch));
    }
    println!();

    println!("{}", header("Plugins"));
    for (i, plugin) in config.plugins().iter().enumerate() {
        println!("  {}. {}", i + 1, plugin_line(plugin, verbose));
    }

    if !config.shared_options().is_empty() {
        println!();
        println!("{}", header("Shared plugin options"));
        for (key, value) in config.shared_options() {
            println!("{}", key_value(key, &value.to_string()));
        }
    }
}

fn plugin_line(plugin: &PluginSpec, verbose: bool) -> String {
    let name = plugin_style().apply_to(plugin.name()).to_string();
    match plugin.options() {
        Some(options) if verbose => format!(
            "{} {}",
            name,
            serde_json::to_string(options).unwrap_or_default()
        ),
        Some(options) => format!("{} ({} option(s))", name, options.len()),
        None => name,
    }
}
