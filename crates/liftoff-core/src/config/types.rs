//! Release configuration types

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::remote::RemoteUrl;

use super::validation::decode_config;

/// Tag format used when the declaration does not set one
pub const DEFAULT_TAG_FORMAT: &str = "v${version}";

/// Free-form plugin options (option name to JSON-like value)
pub type PluginOptions = BTreeMap<String, serde_json::Value>;

/// One entry of the `plugins` list
///
/// Serializes back to the declaration shape: a bare string for [`PluginSpec::Named`]
/// and a two-element `[name, {options}]` array for [`PluginSpec::Configured`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PluginSpec {
    /// Plugin identifier with default options
    Named(String),
    /// Plugin identifier with its own options
    Configured(String, PluginOptions),
}

impl PluginSpec {
    /// Create a plugin entry with default options
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Create a plugin entry with options
    pub fn configured(name: impl Into<String>, options: PluginOptions) -> Self {
        Self::Configured(name.into(), options)
    }

    /// Plugin identifier
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) | Self::Configured(name, _) => name,
        }
    }

    /// Options declared for this plugin, if any
    pub fn options(&self) -> Option<&PluginOptions> {
        match self {
            Self::Named(_) => None,
            Self::Configured(_, options) => Some(options),
        }
    }

    /// Whether the identifier is a local module path rather than a package name
    pub fn is_local(&self) -> bool {
        is_local_module(self.name())
    }
}

pub(crate) fn is_local_module(name: &str) -> bool {
    name.starts_with("./") || name.starts_with("../") || name.starts_with('/')
}

/// A branch entry that matched a checked-out branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseChannel<'a> {
    /// Position in `branches`; lower means higher precedence
    pub precedence: usize,
    /// The matching entry
    pub name: &'a str,
}

/// Validated release pipeline declaration
///
/// Built only through the validating decoder ([`ReleaseConfig::from_value`], the
/// loader functions, or `Deserialize`), so every value upholds the schema
/// invariants. There are no setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "serde_json::Value")]
pub struct ReleaseConfig {
    pub(crate) branches: Vec<String>,

    pub(crate) repository_url: String,

    #[serde(skip)]
    pub(crate) remote: RemoteUrl,

    pub(crate) plugins: Vec<PluginSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tag_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) dry_run: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ci: Option<bool>,

    /// Top-level keys the schema does not name; handed to every plugin
    #[serde(flatten)]
    pub(crate) shared_options: PluginOptions,
}

impl ReleaseConfig {
    /// Load and validate a declaration file
    pub fn load(path: &Path) -> Result<Self> {
        super::loader::load_config(path)
    }

    /// Validate a parsed document
    pub fn from_value(value: &serde_json::Value) -> std::result::Result<Self, SchemaError> {
        decode_config(value)
    }

    /// Release branches in precedence order
    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    /// Upstream repository address as declared
    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    /// Parsed upstream repository address
    pub fn remote(&self) -> &RemoteUrl {
        &self.remote
    }

    /// Plugins in execution order
    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    /// Tag format template, defaulting to `v${version}`
    pub fn tag_format(&self) -> &str {
        self.tag_format.as_deref().unwrap_or(DEFAULT_TAG_FORMAT)
    }

    /// Explicit dry-run setting
    pub fn dry_run(&self) -> Option<bool> {
        self.dry_run
    }

    /// Explicit CI-detection setting
    pub fn ci(&self) -> Option<bool> {
        self.ci
    }

    /// Unrecognised top-level keys
    pub fn shared_options(&self) -> &PluginOptions {
        &self.shared_options
    }

    /// The release channel a branch belongs to; names are compared exactly
    pub fn channel_for(&self, branch: &str) -> Option<ReleaseChannel<'_>> {
        self.branches
            .iter()
            .position(|b| b == branch)
            .map(|precedence| ReleaseChannel {
                precedence,
                name: &self.branches[precedence],
            })
    }

    /// First plugin with the given identifier and its position
    pub fn find_plugin(&self, name: &str) -> Option<(usize, &PluginSpec)> {
        self.plugins.iter().enumerate().find(|(_, p)| p.name() == name)
    }

    /// Options a plugin receives: shared options overlaid by its own
    pub fn plugin_options(&self, index: usize) -> Option<PluginOptions> {
        let plugin = self.plugins.get(index)?;
        let mut options = self.shared_options.clone();
        if let Some(own) = plugin.options() {
            options.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        Some(options)
    }

    /// Serialize back to a JSON document
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl TryFrom<serde_json::Value> for ReleaseConfig {
    type Error = SchemaError;

    fn try_from(value: serde_json::Value) -> std::result::Result<Self, Self::Error> {
        decode_config(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ReleaseConfig {
        ReleaseConfig::from_value(&json!({
            "branches": ["main", "next"],
            "repositoryUrl": "git@host:org/repo.git",
            "plugins": [
                "pluginA",
                ["pluginB", {"assets": ["CHANGELOG.md"]}]
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_plugin_spec_accessors() {
        let config = sample();
        assert_eq!(config.plugins()[0], PluginSpec::named("pluginA"));
        assert_eq!(config.plugins()[0].options(), None);

        let second = &config.plugins()[1];
        assert_eq!(second.name(), "pluginB");
        assert_eq!(
            second.options().unwrap().get("assets"),
            Some(&json!(["CHANGELOG.md"]))
        );
    }

    #[test]
    fn test_is_local() {
        assert!(PluginSpec::named("./plugins/notify.js").is_local());
        assert!(PluginSpec::named("../shared/plugin").is_local());
        assert!(!PluginSpec::named("@semantic-release/git").is_local());
    }

    #[test]
    fn test_tag_format_default() {
        assert_eq!(sample().tag_format(), DEFAULT_TAG_FORMAT);
    }

    #[test]
    fn test_channel_for() {
        let config = sample();
        let channel = config.channel_for("next").unwrap();
        assert_eq!(channel.precedence, 1);
        assert_eq!(channel.name, "next");
        assert!(config.channel_for("feature/x").is_none());
    }

    #[test]
    fn test_find_plugin() {
        let config = sample();
        let (index, plugin) = config.find_plugin("pluginB").unwrap();
        assert_eq!(index, 1);
        assert_eq!(plugin.name(), "pluginB");
        assert!(config.find_plugin("missing").is_none());
    }

    #[test]
    fn test_plugin_options_overlay_shared() {
        let config = ReleaseConfig::from_value(&json!({
            "branches": ["main"],
            "repositoryUrl": "https://github.com/org/repo",
            "plugins": [
                "@semantic-release/commit-analyzer",
                ["@semantic-release/release-notes-generator", {"preset": "conventionalcommits"}]
            ],
            "preset": "angular",
            "releaseRules": [{"type": "docs", "release": "patch"}]
        }))
        .unwrap();

        let analyzer = config.plugin_options(0).unwrap();
        assert_eq!(analyzer.get("preset"), Some(&json!("angular")));
        assert!(analyzer.contains_key("releaseRules"));

        let notes = config.plugin_options(1).unwrap();
        assert_eq!(notes.get("preset"), Some(&json!("conventionalcommits")));

        assert!(config.plugin_options(5).is_none());
    }

    #[test]
    fn test_serialize_declaration_shape() {
        let value = sample().to_value().unwrap();
        assert_eq!(
            value,
            json!({
                "branches": ["main", "next"],
                "repositoryUrl": "git@host:org/repo.git",
                "plugins": ["pluginA", ["pluginB", {"assets": ["CHANGELOG.md"]}]]
            })
        );
    }

    #[test]
    fn test_serialize_then_load_is_identity() {
        let config = ReleaseConfig::from_value(&json!({
            "branches": ["main"],
            "repositoryUrl": "https://github.com/org/repo.git",
            "plugins": ["a", ["b", {"x": 1}], "c"],
            "tagFormat": "release-${version}",
            "dryRun": true,
            "preset": "angular"
        }))
        .unwrap();

        let reloaded = ReleaseConfig::from_value(&config.to_value().unwrap()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_deserialize_validates() {
        let err = serde_json::from_str::<ReleaseConfig>(
            r#"{"branches": [], "repositoryUrl": "git@host:org/repo.git", "plugins": ["a"]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("branches must not be empty"));

        let ok: ReleaseConfig = serde_json::from_str(
            r#"{"branches": ["main"], "repositoryUrl": "git@host:org/repo.git", "plugins": ["a"]}"#,
        )
        .unwrap();
        assert_eq!(ok.branches(), ["main".to_string()]);
    }
}
