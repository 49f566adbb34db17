//! Liftoff Core - Release pipeline configuration
//!
//! This crate provides the validated model of a release declaration (branches,
//! upstream repository, ordered plugin pipeline), the readers for the file
//! formats it is written in, and read-only inspection of the resulting pipeline.

pub mod config;
pub mod error;
pub mod lint;
pub mod pipeline;
pub mod plugins;
pub mod remote;

pub use config::{
    find_config, load_config, load_config_from_dir, load_str, ConfigFormat, PluginOptions,
    PluginSpec, ReleaseChannel, ReleaseConfig,
};
pub use error::{ConfigError, GitError, LiftoffError, Result, SchemaError};
pub use lint::{lint, LintCode, LintWarning};
pub use pipeline::{LifecycleStep, PlanStage, PlannedPlugin, ReleasePlan};
pub use plugins::{PluginCatalog, PluginInfo};
pub use remote::{RemoteUrl, RemoteUrlError, Transport};
