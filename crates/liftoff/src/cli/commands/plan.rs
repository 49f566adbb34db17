//! Plan command

use clap::Args;
use console::style;
use tracing::info;

use liftoff_core::{PluginCatalog, ReleasePlan};

use crate::cli::output::{self, header, plugin_style};
use crate::cli::{Cli, OutputFormat};

/// Show which plugin runs at each release step
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Hide steps no plugin implements
    #[arg(long)]
    pub skip_empty: bool,
}

impl PlanCommand {
    /// Execute the plan command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(skip_empty = self.skip_empty, "executing plan command");
        let cwd = std::env::current_dir()?;
        let (config, _) = cli.load_release_config(&cwd)?;

        let catalog = PluginCatalog::builtin();
        let plan = ReleasePlan::build(&config, &catalog);

        if cli.format == OutputFormat::Json {
            return output::json(&plan);
        }

        println!("{}", header("Release plan"));
        for stage in &plan.stages {
            if stage.plugins.is_empty() {
                if !self.skip_empty {
                    println!("  {} {}", style(stage.step.as_str()).dim(), style("-").dim());
                }
                continue;
            }

            let names: Vec<String> = stage
                .plugins
                .iter()
                .map(|p| plugin_style().apply_to(&p.name).to_string())
                .collect();
            println!("  {} {}", style(stage.step.as_str()).bold(), names.join(" → "));
        }

        if !plan.opaque.is_empty() {
            println!();
            println!("{}", header("Plugins with steps decided at runtime"));
            for plugin in &plan.opaque {
                println!("  {}. {}", plugin.index + 1, plugin_style().apply_to(&plugin.name));
            }
        }

        if cli.verbose {
            println!();
            println!("{}", header("Known plugins"));
            for info in catalog.iter() {
                println!("  {} - {}", plugin_style().apply_to(&info.name), info.description);
            }
        }

        Ok(())
    }
}
