//! Release configuration: model, readers, loader and schema validation

pub mod defaults;
pub mod formats;
mod loader;
mod types;
pub mod validation;

pub use defaults::*;
pub use formats::ConfigFormat;
pub use loader::*;
pub use types::*;
pub use validation::{decode_config, validate_branch_name, validate_plugin_name};
