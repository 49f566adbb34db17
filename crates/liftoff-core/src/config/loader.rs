//! Configuration loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::formats::ConfigFormat;
use super::types::ReleaseConfig;
use super::validation::decode_config;

/// Load and validate a declaration file
pub fn load_config(path: &Path) -> Result<ReleaseConfig> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::Parse {
        path: path.to_path_buf(),
        message: "unrecognised configuration file name".to_string(),
    })?;
    info!(path = %path.display(), format = format.as_str(), "loading config");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(&content, format, path)?;

    debug!(path = %path.display(), "config loaded and validated");
    Ok(config)
}

/// Load and validate a declaration held in memory
pub fn load_str(content: &str, format: ConfigFormat) -> Result<ReleaseConfig> {
    parse_config(content, format, Path::new("<memory>"))
}

fn parse_config(content: &str, format: ConfigFormat, path: &Path) -> Result<ReleaseConfig> {
    let document = format.parse(content, path)?;
    let config = decode_config(&document).map_err(ConfigError::Schema)?;
    Ok(config)
}

/// Find a declaration in a directory or its parents
///
/// At each level the names from [`config_file_names`] are tried in order;
/// `package.json` only counts when its `release` key is set and not null. The
/// first match wins.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for config file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in config_file_names() {
            let candidate = current.join(name);
            if !candidate.is_file() {
                continue;
            }
            if *name == "package.json" && !has_release_key(&candidate) {
                debug!(path = %candidate.display(), "package.json has no release key");
                continue;
            }
            info!(path = %candidate.display(), "found config file");
            return Some(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no config file found");
    None
}

fn has_release_key(package_json: &Path) -> bool {
    std::fs::read_to_string(package_json)
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .and_then(|package| package.get("release").cloned())
        .is_some_and(|release| !release.is_null())
}

/// Load the declaration found from a directory (searching parent directories)
pub fn load_config_from_dir(dir: &Path) -> Result<(ReleaseConfig, PathBuf)> {
    let config_path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;

    let config = load_config(&config_path)?;
    Ok((config, config_path))
}
