//! Default configuration values

/// File name `init` writes by default
pub const DEFAULT_CONFIG_JSON: &str = ".releaserc.json";

/// File name `init --yaml` writes
pub const DEFAULT_CONFIG_YAML: &str = ".releaserc.yaml";

/// Default release branch
pub const DEFAULT_BRANCH: &str = "main";

/// Get list of config file names to search for, in precedence order
pub fn config_file_names() -> &'static [&'static str] {
    &[
        "package.json",
        ".releaserc",
        ".releaserc.json",
        ".releaserc.yaml",
        ".releaserc.yml",
        ".releaserc.js",
        ".releaserc.cjs",
        ".releaserc.mjs",
        "release.config.js",
        "release.config.cjs",
        "release.config.mjs",
    ]
}

/// Plugin pipeline `init` scaffolds: analyze, export, notes, changelog,
/// GitHub release, then commit the changelog back
pub fn default_plugins() -> serde_json::Value {
    serde_json::json!([
        "@semantic-release/commit-analyzer",
        "semantic-release-export-data",
        "@semantic-release/release-notes-generator",
        "@semantic-release/changelog",
        "@semantic-release/github",
        ["@semantic-release/git", { "assets": ["CHANGELOG.md"] }]
    ])
}

/// Default declaration document for a repository
pub fn default_config_value(branch: &str, repository_url: &str) -> serde_json::Value {
    serde_json::json!({
        "branches": [branch],
        "repositoryUrl": repository_url,
        "plugins": default_plugins(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReleaseConfig;

    #[test]
    fn test_default_config_is_valid() {
        let value = default_config_value(DEFAULT_BRANCH, "git@github.com:org/repo.git");
        let config = ReleaseConfig::from_value(&value).unwrap();
        assert_eq!(config.branches(), [DEFAULT_BRANCH.to_string()]);
        assert_eq!(config.plugins().len(), 6);
        assert_eq!(config.plugins()[5].name(), "@semantic-release/git");
    }

    #[test]
    fn test_package_json_searched_first() {
        assert_eq!(config_file_names()[0], "package.json");
        assert!(config_file_names().contains(&"release.config.js"));
    }
}
