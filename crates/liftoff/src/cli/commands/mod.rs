//! CLI commands

mod completions;
mod init;
mod plan;
mod show;
mod validate;

pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use plan::PlanCommand;
pub use show::ShowCommand;
pub use validate::ValidateCommand;
